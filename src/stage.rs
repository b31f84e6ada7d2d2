use crate::upload::{UploadError, UploadedPhoto};

/// Delay after stage entry before the headline and artwork fade in.
pub const TEXT_REVEAL_MS: u32 = 100;
/// Delay after stage entry before the stage's controls fade in.
pub const BUTTONS_REVEAL_MS: u32 = 800;
/// Length of the camera-flash capture effect.
pub const CAPTURE_FLASH_MS: u32 = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Greeting,
    PhotoRequest,
    PhotoDisplay,
    Valentine,
    Accepted,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Greeting,
        Stage::PhotoRequest,
        Stage::PhotoDisplay,
        Stage::Valentine,
        Stage::Accepted,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Greeting => "greeting",
            Stage::PhotoRequest => "photo-request",
            Stage::PhotoDisplay => "photo-display",
            Stage::Valentine => "valentine",
            Stage::Accepted => "accepted",
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Stage::Accepted
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Visibility {
    pub text: bool,
    pub buttons: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Position {
    pub left: i32,
    pub top: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CardEvent {
    /// The stage's single forward control (greeting and photo display).
    Primary,
    UploadRejected(UploadError),
    CaptureStarted(UploadedPhoto),
    CaptureCompleted,
    Accept,
    DeclineApproached(Position),
    RevealText(u64),
    RevealButtons(u64),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    EnterStage { stage: Stage, generation: u64 },
    EnableAudio,
    ShowUploadError(UploadError),
    ClearFileInput,
    BeginCapture,
    ScheduleCaptureCommit,
    EndCapture,
    MoveDecline(Position),
    PlayDeclineCue,
    Reveal(Visibility),
}

#[derive(Clone, Debug, PartialEq)]
pub struct CardState {
    stage: Stage,
    visibility: Visibility,
    generation: u64,
    photo: Option<UploadedPhoto>,
    pending_capture: Option<UploadedPhoto>,
    decline_position: Option<Position>,
    audio_enabled: bool,
}

impl Default for CardState {
    fn default() -> Self {
        Self::new()
    }
}

impl CardState {
    pub fn new() -> Self {
        Self {
            stage: Stage::Greeting,
            visibility: Visibility::default(),
            generation: 0,
            photo: None,
            pending_capture: None,
            decline_position: None,
            audio_enabled: false,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn photo(&self) -> Option<&UploadedPhoto> {
        self.photo.as_ref()
    }

    pub fn capture_pending(&self) -> bool {
        self.pending_capture.is_some()
    }

    pub fn decline_position(&self) -> Option<Position> {
        self.decline_position
    }

    pub fn audio_enabled(&self) -> bool {
        self.audio_enabled
    }

    /// Effects for the initial stage, before any user input.
    pub fn boot(&self) -> Vec<Effect> {
        vec![Effect::EnterStage {
            stage: self.stage,
            generation: self.generation,
        }]
    }

    fn enter(&mut self, stage: Stage, effects: &mut Vec<Effect>) {
        self.stage = stage;
        self.visibility = Visibility::default();
        self.generation += 1;
        effects.push(Effect::EnterStage {
            stage,
            generation: self.generation,
        });
    }

    pub fn reduce(mut self, event: CardEvent) -> (CardState, Vec<Effect>) {
        let mut effects = Vec::new();

        match (self.stage, event) {
            (_, CardEvent::RevealText(generation)) => {
                if generation == self.generation && !self.visibility.text {
                    self.visibility.text = true;
                    effects.push(Effect::Reveal(self.visibility));
                }
            }
            (_, CardEvent::RevealButtons(generation)) => {
                if generation == self.generation && !self.visibility.buttons {
                    self.visibility.buttons = true;
                    effects.push(Effect::Reveal(self.visibility));
                }
            }
            (Stage::Accepted, _) => {}
            (Stage::Greeting, CardEvent::Primary) => {
                if !self.audio_enabled {
                    self.audio_enabled = true;
                    effects.push(Effect::EnableAudio);
                }
                self.enter(Stage::PhotoRequest, &mut effects);
            }
            (Stage::PhotoRequest, CardEvent::UploadRejected(err)) => {
                effects.push(Effect::ShowUploadError(err));
                effects.push(Effect::ClearFileInput);
            }
            (Stage::PhotoRequest, CardEvent::CaptureStarted(photo)) => {
                if self.pending_capture.is_none() {
                    self.pending_capture = Some(photo);
                    effects.push(Effect::BeginCapture);
                    effects.push(Effect::ScheduleCaptureCommit);
                }
            }
            (Stage::PhotoRequest, CardEvent::CaptureCompleted) => {
                if let Some(photo) = self.pending_capture.take() {
                    self.photo = Some(photo);
                    effects.push(Effect::EndCapture);
                    effects.push(Effect::ClearFileInput);
                    self.enter(Stage::PhotoDisplay, &mut effects);
                }
            }
            (Stage::PhotoDisplay, CardEvent::Primary) => {
                if self.photo.is_some() {
                    self.enter(Stage::Valentine, &mut effects);
                }
            }
            (Stage::Valentine, CardEvent::Accept) => {
                self.enter(Stage::Accepted, &mut effects);
            }
            (Stage::Valentine, CardEvent::DeclineApproached(position)) => {
                self.decline_position = Some(position);
                effects.push(Effect::PlayDeclineCue);
                effects.push(Effect::MoveDecline(position));
            }
            _ => {}
        }

        (self, effects)
    }
}
