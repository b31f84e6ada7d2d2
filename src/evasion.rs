use crate::stage::Position;
use std::f64::consts::TAU;

/// Gap kept between the decline control and every viewport edge.
pub const EVASION_PADDING: f64 = 16.0;
/// Viewports narrower than this use the short step range.
pub const MOBILE_BREAKPOINT: f64 = 768.0;
pub const MOBILE_STEP: StepRange = StepRange {
    min: 64.0,
    max: 130.0,
};
pub const DESKTOP_STEP: StepRange = StepRange {
    min: 100.0,
    max: 220.0,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepRange {
    pub min: f64,
    pub max: f64,
}

pub fn step_range_for(viewport_width: f64) -> StepRange {
    if viewport_width < MOBILE_BREAKPOINT {
        MOBILE_STEP
    } else {
        DESKTOP_STEP
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Pen,
    Touch,
}

impl PointerKind {
    /// Unknown pointer types are treated as coarse.
    pub fn from_pointer_type(pointer_type: &str) -> Self {
        match pointer_type {
            "mouse" => PointerKind::Mouse,
            "pen" => PointerKind::Pen,
            _ => PointerKind::Touch,
        }
    }

    pub fn is_precise(self) -> bool {
        self == PointerKind::Mouse
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Approach {
    Enter,
    Press,
}

impl Approach {
    pub fn from_event_type(event_type: &str) -> Option<Self> {
        match event_type {
            "pointerenter" => Some(Approach::Enter),
            "pointerdown" => Some(Approach::Press),
            _ => None,
        }
    }
}

/// Mouse pointers evade on hover, everything else on press.
pub fn should_evade(approach: Approach, pointer: PointerKind) -> bool {
    match approach {
        Approach::Enter => pointer.is_precise(),
        Approach::Press => !pointer.is_precise(),
    }
}

/// Falls back to `min` when the range is empty or not a number.
fn clamp_axis(value: f64, min: f64, max: f64) -> f64 {
    if !(max > min) {
        return min;
    }
    value.max(min).min(max)
}

/// `current` is the control's top-left in viewport pixels. `unit` must yield
/// samples in `[0, 1)`; the first draws the angle, the second the distance.
pub fn next_position(
    current: (f64, f64),
    viewport: Size,
    control: Size,
    padding: f64,
    step: StepRange,
    unit: &mut impl FnMut() -> f64,
) -> Position {
    let angle = unit() * TAU;
    let distance = step.min + unit() * (step.max - step.min);

    let candidate_left = current.0 + angle.cos() * distance;
    let candidate_top = current.1 + angle.sin() * distance;

    let left = clamp_axis(
        candidate_left,
        padding,
        viewport.width - control.width - padding,
    );
    let top = clamp_axis(
        candidate_top,
        padding,
        viewport.height - control.height - padding,
    );

    Position {
        left: left.round() as i32,
        top: top.round() as i32,
    }
}
