pub mod assets;
pub mod evasion;
pub mod fireworks;
pub mod media;
pub mod stage;
pub mod upload;

use assets::{Asset, is_production_build};
use evasion::{
    Approach, EVASION_PADDING, PointerKind, Size, next_position, should_evade, step_range_for,
};
use fireworks::{FireworksLayer, spawn_particles};
use gloo_timers::callback::Timeout;
use media::{AudioBank, MediaController, PlaybackCommand};
use stage::{
    BUTTONS_REVEAL_MS, CAPTURE_FLASH_MS, CardEvent, CardState, Effect, Position, Stage,
    TEXT_REVEAL_MS, Visibility,
};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use upload::{read_as_data_url, validate_file};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    Document, Event, EventTarget, HtmlButtonElement, HtmlCanvasElement, HtmlElement,
    HtmlImageElement, HtmlInputElement, PointerEvent, Window,
};

struct App {
    document: Document,
    root: HtmlElement,
    sections: Vec<(Stage, HtmlElement)>,
    photo_input: HtmlInputElement,
    upload_error: HtmlElement,
    captured_photo: HtmlImageElement,
    decline_button: HtmlButtonElement,
    camera_flash: HtmlElement,
    diagnostics: HtmlElement,
    diagnostics_open: bool,
    card: CardState,
    media: MediaController,
    audio: AudioBank,
    fireworks: FireworksLayer,
    reveal_timers: Vec<Timeout>,
    capture_timer: Option<Timeout>,
    production: bool,
    last_event: String,
}

type SharedApp = Rc<RefCell<App>>;

fn js_value_to_string(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

fn log_event(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

fn flag(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}

fn element_by_id<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing #{}", id)))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("#{} has an unexpected element type", id)))
}

fn viewport_size(win: &Window) -> Size {
    let dimension = |value: Result<JsValue, JsValue>| {
        value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
    };
    Size {
        width: dimension(win.inner_width()),
        height: dimension(win.inner_height()),
    }
}

fn event_label(event: &CardEvent) -> String {
    match event {
        CardEvent::Primary => "primary".to_string(),
        CardEvent::UploadRejected(err) => format!("upload_rejected ({})", err.label()),
        CardEvent::CaptureStarted(_) => "capture_started".to_string(),
        CardEvent::CaptureCompleted => "capture_completed".to_string(),
        CardEvent::Accept => "accept".to_string(),
        CardEvent::DeclineApproached(pos) => format!("decline_evade {},{}", pos.left, pos.top),
        CardEvent::RevealText(generation) => format!("reveal_text gen={}", generation),
        CardEvent::RevealButtons(generation) => format!("reveal_buttons gen={}", generation),
    }
}

fn set_status(root: &HtmlElement, status: &str) {
    let _ = root.set_attribute("data-card-status", status);
}

fn render_visibility(root: &HtmlElement, visibility: Visibility) {
    let _ = root.set_attribute("data-text-visible", flag(visibility.text));
    let _ = root.set_attribute("data-buttons-visible", flag(visibility.buttons));
}

fn render_stage(app: &App) {
    let current = app.card.stage();
    let _ = app.root.set_attribute("data-stage", current.name());
    for (stage, section) in &app.sections {
        section.set_hidden(*stage != current);
    }
    render_visibility(&app.root, app.card.visibility());
}

fn render_decline(button: &HtmlButtonElement, position: Position) {
    let _ = button.class_list().add_1("evaded");
    let style = button.style();
    let _ = style.set_property("left", &format!("{}px", position.left));
    let _ = style.set_property("top", &format!("{}px", position.top));
}

fn position_name(pos: Option<Position>) -> String {
    match pos {
        Some(pos) => format!("{},{}", pos.left, pos.top),
        None => "(natural)".to_string(),
    }
}

fn update_diagnostics(app: &App) {
    app.diagnostics.set_hidden(!app.diagnostics_open);
    if !app.diagnostics_open {
        return;
    }

    let visibility = app.card.visibility();
    let lines = [
        format!("stage: {}", app.card.stage().name()),
        format!(
            "reveal: text={} buttons={} gen={}",
            visibility.text,
            visibility.buttons,
            app.card.generation()
        ),
        format!("audio_enabled: {}", app.card.audio_enabled()),
        format!("ambient: {:?}", app.media.ambient()),
        format!("celebration_started: {}", app.media.celebration_started()),
        format!("photo: {}", app.card.photo().is_some()),
        format!("capture_pending: {}", app.card.capture_pending()),
        format!("decline: {}", position_name(app.card.decline_position())),
        format!(
            "fireworks: active={} ctx={}",
            app.fireworks.is_active(),
            app.fireworks.has_context()
        ),
        format!("production: {}", app.production),
        format!("last_event: {}", app.last_event),
    ];
    app.diagnostics.set_text_content(Some(&lines.join("\n")));
}

fn play(app: &App, commands: Vec<PlaybackCommand>) {
    app.audio.execute_all(commands);
}

fn schedule_reveals(shared: &SharedApp, generation: u64) -> Vec<Timeout> {
    let text = {
        let weak = Rc::downgrade(shared);
        Timeout::new(TEXT_REVEAL_MS, move || {
            dispatch_weak(&weak, CardEvent::RevealText(generation));
        })
    };
    let buttons = {
        let weak = Rc::downgrade(shared);
        Timeout::new(BUTTONS_REVEAL_MS, move || {
            dispatch_weak(&weak, CardEvent::RevealButtons(generation));
        })
    };
    vec![text, buttons]
}

fn dispatch_weak(weak: &Weak<RefCell<App>>, event: CardEvent) {
    if let Some(shared) = weak.upgrade() {
        dispatch(&shared, event);
    }
}

fn dispatch(shared: &SharedApp, event: CardEvent) {
    let label = event_label(&event);
    let effects = {
        let mut app = shared.borrow_mut();
        let card = std::mem::take(&mut app.card);
        let (card, effects) = card.reduce(event);
        app.card = card;
        app.last_event = label;
        effects
    };

    if !effects.is_empty() {
        log_event(&shared.borrow().last_event);
    }
    run_effects(shared, effects);
    update_diagnostics(&shared.borrow());
}

fn run_effects(shared: &SharedApp, effects: Vec<Effect>) {
    for effect in effects {
        match effect {
            Effect::EnterStage { stage, generation } => {
                let timers = schedule_reveals(shared, generation);
                let mut app = shared.borrow_mut();
                // Dropping the previous stage's timeouts cancels them.
                app.reveal_timers = timers;
                render_stage(&app);
                let commands = app.media.stage_entered(stage);
                play(&app, commands);
                app.fireworks.set_active(stage == Stage::Accepted);
                app.last_event = format!("stage_enter {}", stage.name());
                log_event(&app.last_event);
            }
            Effect::EnableAudio => {
                let mut app = shared.borrow_mut();
                let commands = app.media.enable();
                play(&app, commands);
            }
            Effect::ShowUploadError(err) => {
                let app = shared.borrow();
                app.upload_error.set_text_content(Some(&err.to_string()));
                app.upload_error.set_hidden(false);
                web_sys::console::warn_1(&JsValue::from_str(&format!(
                    "upload rejected: {:?}",
                    err
                )));
            }
            Effect::ClearFileInput => {
                shared.borrow().photo_input.set_value("");
            }
            Effect::BeginCapture => {
                let mut app = shared.borrow_mut();
                app.upload_error.set_hidden(true);
                let _ = app.camera_flash.class_list().add_1("active");
                let commands = app.media.capture();
                play(&app, commands);
            }
            Effect::ScheduleCaptureCommit => {
                let weak = Rc::downgrade(shared);
                let timer = Timeout::new(CAPTURE_FLASH_MS, move || {
                    dispatch_weak(&weak, CardEvent::CaptureCompleted);
                });
                shared.borrow_mut().capture_timer = Some(timer);
            }
            Effect::EndCapture => {
                let app = shared.borrow();
                let _ = app.camera_flash.class_list().remove_1("active");
                if let Some(photo) = app.card.photo() {
                    app.captured_photo.set_src(photo.data_url());
                }
            }
            Effect::MoveDecline(position) => {
                render_decline(&shared.borrow().decline_button, position);
            }
            Effect::PlayDeclineCue => {
                let mut app = shared.borrow_mut();
                let commands = app.media.decline_approach();
                play(&app, commands);
            }
            Effect::Reveal(visibility) => {
                render_visibility(&shared.borrow().root, visibility);
            }
        }
    }
}

fn listen(
    target: &EventTarget,
    kind: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn on_photo_selected(shared: &SharedApp) {
    let file = {
        let app = shared.borrow();
        if app.card.stage() != Stage::PhotoRequest || app.card.capture_pending() {
            app.photo_input.set_value("");
            return;
        }
        let file = app.photo_input.files().and_then(|files| files.get(0));
        if file.is_none() {
            app.photo_input.set_value("");
        }
        file
    };
    let Some(file) = file else {
        return;
    };

    if let Err(err) = validate_file(&file) {
        dispatch(shared, CardEvent::UploadRejected(err));
        return;
    }

    let weak = Rc::downgrade(shared);
    spawn_local(async move {
        let event = match read_as_data_url(&file).await {
            Ok(photo) => CardEvent::CaptureStarted(photo),
            Err(err) => CardEvent::UploadRejected(err),
        };
        dispatch_weak(&weak, event);
    });
}

fn on_decline_approach(shared: &SharedApp, event: &Event) {
    let Some(pointer) = event.dyn_ref::<PointerEvent>() else {
        return;
    };
    let Some(approach) = Approach::from_event_type(&event.type_()) else {
        return;
    };
    if !should_evade(approach, PointerKind::from_pointer_type(&pointer.pointer_type())) {
        return;
    }

    event.prevent_default();
    event.stop_propagation();

    let Some(win) = web_sys::window() else {
        return;
    };
    let target = {
        let app = shared.borrow();
        if app.card.stage() != Stage::Valentine {
            return;
        }
        let rect = app.decline_button.get_bounding_client_rect();
        let current = app
            .card
            .decline_position()
            .map(|pos| (pos.left as f64, pos.top as f64))
            .unwrap_or((rect.left(), rect.top()));
        let viewport = viewport_size(&win);
        let control = Size {
            width: rect.width(),
            height: rect.height(),
        };
        next_position(
            current,
            viewport,
            control,
            EVASION_PADDING,
            step_range_for(viewport.width),
            &mut || js_sys::Math::random(),
        )
    };

    dispatch(shared, CardEvent::DeclineApproached(target));
}

fn resolve_page_assets(document: &Document, production: bool) -> Result<(), JsValue> {
    let images = document.query_selector_all("img[data-asset]")?;
    for i in 0..images.length() {
        let Some(node) = images.get(i) else {
            continue;
        };
        let Ok(img) = node.dyn_into::<HtmlImageElement>() else {
            continue;
        };
        let key = img.get_attribute("data-asset").unwrap_or_default();
        match Asset::from_key(&key) {
            Some(asset) => img.set_src(&asset.url(production)),
            None => web_sys::console::warn_1(&JsValue::from_str(&format!(
                "unknown data-asset \"{}\"",
                key
            ))),
        }
    }
    Ok(())
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    if let Err(err) = start_impl() {
        if let Some(win) = web_sys::window() {
            if let Some(doc) = win.document() {
                if let Some(el) = doc.document_element() {
                    let _ = el.set_attribute("data-card-status", "error");
                }
                if let Some(diag) = doc.get_element_by_id("diagnostics") {
                    diag.set_text_content(Some(&format!("fatal: {}", js_value_to_string(&err))));
                    let _ = diag.remove_attribute("hidden");
                }
            }
        }

        web_sys::console::error_1(&err);
    }
}

fn start_impl() -> Result<(), JsValue> {
    let win = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = win
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;
    mount(&win, &document)?;
    Ok(())
}

/// Handle on a mounted card. The page's listeners keep the card alive, so
/// dropping the handle does not unmount anything.
#[derive(Clone)]
pub struct Card {
    shared: SharedApp,
}

impl Card {
    pub fn stage(&self) -> Stage {
        self.shared.borrow().card.stage()
    }

    pub fn visibility(&self) -> Visibility {
        self.shared.borrow().card.visibility()
    }

    pub fn decline_position(&self) -> Option<Position> {
        self.shared.borrow().card.decline_position()
    }

    pub fn pending_reveals(&self) -> usize {
        self.shared.borrow().reveal_timers.len()
    }

    pub fn last_event(&self) -> String {
        self.shared.borrow().last_event.clone()
    }

    pub fn dispatch(&self, event: CardEvent) {
        dispatch(&self.shared, event);
    }
}

/// Wires the card into `document`, which must contain the markup from
/// `index.html`.
pub fn mount(win: &Window, document: &Document) -> Result<Card, JsValue> {
    let root = document
        .document_element()
        .ok_or_else(|| JsValue::from_str("Missing document element"))?
        .dyn_into::<HtmlElement>()?;
    set_status(&root, "loading");

    let production = is_production_build();
    let diagnostics_open = win
        .location()
        .search()
        .unwrap_or_default()
        .contains("debug=1");

    let mut sections = Vec::with_capacity(Stage::ALL.len());
    for stage in Stage::ALL {
        let section = document
            .query_selector(&format!("section[data-stage=\"{}\"]", stage.name()))?
            .ok_or_else(|| JsValue::from_str(&format!("Missing section for {}", stage.name())))?
            .dyn_into::<HtmlElement>()?;
        sections.push((stage, section));
    }

    let greeting_next: HtmlButtonElement = element_by_id(document, "greeting-next")?;
    let photo_next: HtmlButtonElement = element_by_id(document, "photo-next")?;
    let accept_button: HtmlButtonElement = element_by_id(document, "accept-button")?;
    let decline_button: HtmlButtonElement = element_by_id(document, "decline-button")?;
    let photo_input: HtmlInputElement = element_by_id(document, "photo-input")?;
    let upload_error: HtmlElement = element_by_id(document, "upload-error")?;
    let captured_photo: HtmlImageElement = element_by_id(document, "captured-photo")?;
    let camera_flash: HtmlElement = element_by_id(document, "camera-flash")?;
    let fireworks_canvas: HtmlCanvasElement = element_by_id(document, "fireworks-canvas")?;
    let diagnostics: HtmlElement = element_by_id(document, "diagnostics")?;

    resolve_page_assets(document, production)?;

    let audio = AudioBank::new(production)?;
    let fireworks = FireworksLayer::new(
        fireworks_canvas,
        spawn_particles(&mut || js_sys::Math::random()),
    );

    let card = CardState::new();
    let boot = card.boot();

    let shared: SharedApp = Rc::new(RefCell::new(App {
        document: document.clone(),
        root: root.clone(),
        sections,
        photo_input: photo_input.clone(),
        upload_error,
        captured_photo,
        decline_button: decline_button.clone(),
        camera_flash,
        diagnostics,
        diagnostics_open,
        card,
        media: MediaController::new(),
        audio,
        fireworks,
        reveal_timers: Vec::new(),
        capture_timer: None,
        production,
        last_event: "init".to_string(),
    }));

    {
        let shared = Rc::clone(&shared);
        listen(&greeting_next, "click", move |_event| {
            dispatch(&shared, CardEvent::Primary);
        })?;
    }
    {
        let shared = Rc::clone(&shared);
        listen(&photo_next, "click", move |_event| {
            dispatch(&shared, CardEvent::Primary);
        })?;
    }
    {
        let shared = Rc::clone(&shared);
        listen(&accept_button, "click", move |_event| {
            dispatch(&shared, CardEvent::Accept);
        })?;
    }
    {
        let shared = Rc::clone(&shared);
        listen(&photo_input, "change", move |_event| {
            on_photo_selected(&shared);
        })?;
    }
    for kind in ["pointerenter", "pointerdown"] {
        let shared = Rc::clone(&shared);
        listen(&decline_button, kind, move |event| {
            on_decline_approach(&shared, &event);
        })?;
    }
    listen(&decline_button, "click", |event| {
        event.prevent_default();
        event.stop_propagation();
    })?;

    run_effects(&shared, boot);
    set_status(&root, "ready");
    {
        let mut app = shared.borrow_mut();
        app.last_event = "ready".to_string();
        log_event(&format!(
            "card ready (stage={}, production={}, base={})",
            app.card.stage().name(),
            production,
            app.document.base_uri().ok().flatten().unwrap_or_default()
        ));
        update_diagnostics(&app);
    }

    Ok(Card { shared })
}

