use gpui::{Bounds, Modifiers, MouseButton, Pixels, Point};

/// Events emitted by [`NumberFieldState`](super::NumberFieldState).
#[derive(Debug, Clone, PartialEq)]
pub enum NumberFieldEvent {
    /// The committed value changed. Emitted once per distinct value, so an
    /// auto-repeating stepper produces one event per tick.
    ValueChanged {
        value: Option<f64>,
        reason: ChangeReason,
    },
    /// An interaction finished: blur, Enter, paste, a key or wheel step, or
    /// the release of a stepper or scrub gesture that changed the value.
    ValueCommitted {
        value: Option<f64>,
        reason: ChangeReason,
    },
    /// The field wants keyboard focus moved to its input, e.g. when a scrub starts.
    FocusRequested,
}

/// What caused a value change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeReason {
    InputChange,
    InputBlur,
    InputPaste,
    Keyboard,
    IncrementPress,
    DecrementPress,
    Wheel,
    Scrub,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepDirection {
    Increment,
    Decrement,
}

impl StepDirection {
    /// `1.0` for increments, `-1.0` for decrements.
    pub fn sign(self) -> f64 {
        match self {
            StepDirection::Increment => 1.0,
            StepDirection::Decrement => -1.0,
        }
    }

    pub(crate) fn press_reason(self) -> ChangeReason {
        match self {
            StepDirection::Increment => ChangeReason::IncrementPress,
            StepDirection::Decrement => ChangeReason::DecrementPress,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PointerKind {
    #[default]
    Mouse,
    Touch,
    Pen,
}

/// A pointer press forwarded by the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerDown {
    pub position: Point<Pixels>,
    pub button: MouseButton,
    pub kind: PointerKind,
    pub modifiers: Modifiers,
}

impl PointerDown {
    /// A primary-button press of `kind` at `position`.
    pub fn primary(kind: PointerKind, position: Point<Pixels>) -> Self {
        Self {
            position,
            button: MouseButton::Left,
            kind,
            modifiers: Modifiers::default(),
        }
    }
}

/// Relative pointer motion. While the pointer is locked only the delta is
/// meaningful.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerMove {
    pub delta: Point<Pixels>,
    pub kind: PointerKind,
    pub modifiers: Modifiers,
}

/// Layout the renderer measured when a scrub starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrubGeometry {
    /// Bounds of the scrub area element.
    pub surface: Bounds<Pixels>,
    /// Bounds of the window's visible viewport.
    pub viewport: Bounds<Pixels>,
}
