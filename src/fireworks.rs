use std::cell::RefCell;
use std::f64::consts::PI;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

pub const PARTICLE_COUNT: usize = 20;
pub const MIN_DISTANCE: f64 = 200.0;
pub const DISTANCE_SPREAD: f64 = 100.0;
pub const MAX_DELAY_S: f64 = 2.0;
pub const CYCLE_S: f64 = 2.0;
const HEART_FONT_PX: f64 = 32.0;
const HEART_GLYPH: &str = "\u{2764}\u{fe0f}";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub angle_deg: f64,
    pub distance: f64,
    pub delay_s: f64,
}

impl Particle {
    pub fn target(&self) -> (f64, f64) {
        let radians = self.angle_deg * PI / 180.0;
        (radians.cos() * self.distance, radians.sin() * self.distance)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleFrame {
    pub dx: f64,
    pub dy: f64,
    pub scale: f64,
    pub opacity: f64,
}

pub fn spawn_particles(unit: &mut impl FnMut() -> f64) -> Vec<Particle> {
    (0..PARTICLE_COUNT)
        .map(|i| Particle {
            angle_deg: (i as f64 * 360.0) / PARTICLE_COUNT as f64,
            distance: MIN_DISTANCE + unit() * DISTANCE_SPREAD,
            delay_s: unit() * MAX_DELAY_S,
        })
        .collect()
}

#[inline]
fn ease_out(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

/// Pose of `particle` at `elapsed_s` after the layer started; `None` while the
/// particle is still waiting out its delay.
pub fn particle_frame(particle: &Particle, elapsed_s: f64) -> Option<ParticleFrame> {
    let local = elapsed_s - particle.delay_s;
    if local < 0.0 {
        return None;
    }

    let progress = (local % CYCLE_S) / CYCLE_S;
    let eased = ease_out(progress);
    let (tx, ty) = particle.target();
    let opacity = if progress <= 0.5 {
        1.0
    } else {
        1.0 - ease_out((progress - 0.5) * 2.0)
    };

    Some(ParticleFrame {
        dx: tx * eased,
        dy: ty * eased,
        scale: eased,
        opacity: opacity.clamp(0.0, 1.0),
    })
}

struct LayerInner {
    canvas: HtmlCanvasElement,
    ctx: Option<CanvasRenderingContext2d>,
    particles: Vec<Particle>,
    active: bool,
    started_at_ms: Option<f64>,
    frame_pending: bool,
    frame: Option<Closure<dyn FnMut(f64)>>,
}

/// Heart burst drawn on a full-viewport canvas. Knows nothing about stages.
#[derive(Clone)]
pub struct FireworksLayer {
    inner: Rc<RefCell<LayerInner>>,
}

impl FireworksLayer {
    pub fn new(canvas: HtmlCanvasElement, particles: Vec<Particle>) -> Self {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok());

        Self {
            inner: Rc::new(RefCell::new(LayerInner {
                canvas,
                ctx,
                particles,
                active: false,
                started_at_ms: None,
                frame_pending: false,
                frame: None,
            })),
        }
    }

    pub fn is_active(&self) -> bool {
        self.inner.borrow().active
    }

    pub fn has_context(&self) -> bool {
        self.inner.borrow().ctx.is_some()
    }

    pub fn set_active(&self, active: bool) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.active == active {
                return;
            }
            inner.active = active;
            inner.started_at_ms = None;
            if !active {
                if let Some(ctx) = &inner.ctx {
                    let (w, h) = (inner.canvas.width() as f64, inner.canvas.height() as f64);
                    ctx.clear_rect(0.0, 0.0, w, h);
                }
                return;
            }
        }
        self.request_frame();
    }

    fn request_frame(&self) {
        if self.inner.borrow().frame_pending {
            return;
        }
        let Some(win) = web_sys::window() else {
            return;
        };

        let layer = self.clone();
        let cb = Closure::wrap(Box::new(move |ts: f64| {
            layer.inner.borrow_mut().frame_pending = false;
            layer.draw(ts);
            if layer.is_active() {
                layer.request_frame();
            }
        }) as Box<dyn FnMut(f64)>);

        if win
            .request_animation_frame(cb.as_ref().unchecked_ref())
            .is_ok()
        {
            let mut inner = self.inner.borrow_mut();
            inner.frame_pending = true;
            inner.frame = Some(cb);
        }
    }

    fn draw(&self, ts: f64) {
        let mut inner = self.inner.borrow_mut();
        if !inner.active {
            return;
        }
        let started = *inner.started_at_ms.get_or_insert(ts);
        let elapsed_s = (ts - started) / 1000.0;

        fit_canvas_to_viewport(&inner.canvas);
        let Some(ctx) = &inner.ctx else {
            return;
        };

        let (w, h) = (inner.canvas.width() as f64, inner.canvas.height() as f64);
        let dpr = web_sys::window()
            .map(|win| win.device_pixel_ratio())
            .unwrap_or(1.0)
            .max(1.0);
        ctx.clear_rect(0.0, 0.0, w, h);
        ctx.set_font(&format!("{}px sans-serif", HEART_FONT_PX));
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");

        for particle in &inner.particles {
            let Some(frame) = particle_frame(particle, elapsed_s) else {
                continue;
            };
            if frame.scale <= 0.0 || frame.opacity <= 0.0 {
                continue;
            }
            ctx.save();
            ctx.set_global_alpha(frame.opacity);
            let _ = ctx.translate(w * 0.5 + frame.dx * dpr, h * 0.5 + frame.dy * dpr);
            let _ = ctx.scale(frame.scale * dpr, frame.scale * dpr);
            let _ = ctx.fill_text(HEART_GLYPH, 0.0, 0.0);
            ctx.restore();
        }
    }
}

fn fit_canvas_to_viewport(canvas: &HtmlCanvasElement) {
    let Some(win) = web_sys::window() else {
        return;
    };
    let dpr = win.device_pixel_ratio().max(1.0);
    let css_w = win
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    let css_h = win
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);

    let width = (css_w * dpr).round().max(1.0) as u32;
    let height = (css_h * dpr).round().max(1.0) as u32;
    if canvas.width() != width || canvas.height() != height {
        canvas.set_width(width);
        canvas.set_height(height);
    }
}
