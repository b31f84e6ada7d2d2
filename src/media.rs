use crate::assets::Asset;
use crate::stage::Stage;
use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::HtmlAudioElement;

pub const AMBIENT_VOLUME: f64 = 0.5;
/// Seconds into the ambient track where playback begins.
pub const AMBIENT_START_AT: f64 = 8.0;
pub const CELEBRATION_VOLUME: f64 = 0.5;
pub const SHUTTER_VOLUME: f64 = 1.0;
pub const CAPTURE_REACTION_VOLUME: f64 = 0.8;
pub const DECLINE_REACTION_VOLUME: f64 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Ambient,
    Celebration,
    Shutter,
    CaptureReaction,
    DeclineReaction,
}

impl Cue {
    pub const ALL: [Cue; 5] = [
        Cue::Ambient,
        Cue::Celebration,
        Cue::Shutter,
        Cue::CaptureReaction,
        Cue::DeclineReaction,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Cue::Ambient => "ambient",
            Cue::Celebration => "celebration",
            Cue::Shutter => "shutter",
            Cue::CaptureReaction => "capture_reaction",
            Cue::DeclineReaction => "decline_reaction",
        }
    }

    pub fn asset(self) -> Asset {
        match self {
            Cue::Ambient => Asset::AmbientLoop,
            Cue::Celebration => Asset::CelebrationLoop,
            Cue::Shutter => Asset::ShutterCue,
            Cue::CaptureReaction => Asset::CaptureReactionCue,
            Cue::DeclineReaction => Asset::DeclineReactionCue,
        }
    }

    pub fn looping(self) -> bool {
        matches!(self, Cue::Ambient | Cue::Celebration)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlaybackCommand {
    /// `start_at` of `None` resumes from the element's current time.
    Play {
        cue: Cue,
        volume: f64,
        start_at: Option<f64>,
    },
    Pause(Cue),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AmbientState {
    #[default]
    NotEnabled,
    Playing,
    Stopped,
}

/// Decides which cues play in response to card events. Holds no DOM handles.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MediaController {
    ambient: AmbientState,
    celebration_started: bool,
}

impl MediaController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ambient(&self) -> AmbientState {
        self.ambient
    }

    pub fn celebration_started(&self) -> bool {
        self.celebration_started
    }

    /// First user gesture. Only a not-yet-enabled ambient track is started.
    pub fn enable(&mut self) -> Vec<PlaybackCommand> {
        if self.ambient != AmbientState::NotEnabled || self.celebration_started {
            return Vec::new();
        }
        self.ambient = AmbientState::Playing;
        vec![PlaybackCommand::Play {
            cue: Cue::Ambient,
            volume: AMBIENT_VOLUME,
            start_at: Some(AMBIENT_START_AT),
        }]
    }

    pub fn stage_entered(&mut self, stage: Stage) -> Vec<PlaybackCommand> {
        if stage != Stage::Accepted || self.celebration_started {
            return Vec::new();
        }
        self.celebration_started = true;

        let mut commands = Vec::with_capacity(2);
        if self.ambient == AmbientState::Playing {
            commands.push(PlaybackCommand::Pause(Cue::Ambient));
        }
        self.ambient = AmbientState::Stopped;
        commands.push(PlaybackCommand::Play {
            cue: Cue::Celebration,
            volume: CELEBRATION_VOLUME,
            start_at: None,
        });
        commands
    }

    pub fn capture(&mut self) -> Vec<PlaybackCommand> {
        vec![
            PlaybackCommand::Play {
                cue: Cue::Shutter,
                volume: SHUTTER_VOLUME,
                start_at: Some(0.0),
            },
            PlaybackCommand::Play {
                cue: Cue::CaptureReaction,
                volume: CAPTURE_REACTION_VOLUME,
                start_at: Some(0.0),
            },
        ]
    }

    pub fn decline_approach(&mut self) -> Vec<PlaybackCommand> {
        vec![PlaybackCommand::Play {
            cue: Cue::DeclineReaction,
            volume: DECLINE_REACTION_VOLUME,
            start_at: Some(0.0),
        }]
    }
}

/// One `<audio>` element per cue, created off-document.
pub struct AudioBank {
    elements: Vec<(Cue, HtmlAudioElement)>,
}

impl AudioBank {
    pub fn new(production: bool) -> Result<Self, JsValue> {
        let mut elements = Vec::with_capacity(Cue::ALL.len());
        for cue in Cue::ALL {
            let audio = HtmlAudioElement::new_with_src(&cue.asset().url(production))?;
            audio.set_loop(cue.looping());
            audio.set_preload("auto");
            elements.push((cue, audio));
        }
        Ok(Self { elements })
    }

    fn element(&self, cue: Cue) -> Option<&HtmlAudioElement> {
        self.elements
            .iter()
            .find(|(c, _)| *c == cue)
            .map(|(_, audio)| audio)
    }

    pub fn execute(&self, command: PlaybackCommand) {
        match command {
            PlaybackCommand::Play {
                cue,
                volume,
                start_at,
            } => {
                let Some(audio) = self.element(cue) else {
                    return;
                };
                audio.set_volume(volume);
                if let Some(at) = start_at {
                    audio.set_current_time(at);
                }
                match audio.play() {
                    Ok(promise) => watch_play(cue, promise),
                    Err(err) => log_play_failure(cue, &err),
                }
            }
            PlaybackCommand::Pause(cue) => {
                if let Some(audio) = self.element(cue) {
                    if let Err(err) = audio.pause() {
                        log_play_failure(cue, &err);
                    }
                }
            }
        }
    }

    pub fn execute_all(&self, commands: Vec<PlaybackCommand>) {
        for command in commands {
            self.execute(command);
        }
    }
}

fn watch_play(cue: Cue, promise: Promise) {
    spawn_local(async move {
        if let Err(err) = JsFuture::from(promise).await {
            log_play_failure(cue, &err);
        }
    });
}

fn log_play_failure(cue: Cue, err: &JsValue) {
    let detail = err.as_string().unwrap_or_else(|| format!("{:?}", err));
    web_sys::console::warn_1(&JsValue::from_str(&format!(
        "{} playback failed: {}",
        cue.name(),
        detail
    )));
}
