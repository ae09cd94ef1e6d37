//! Headless number field: a text input bound to a numeric value, with
//! increment and decrement steppers and a scrub area.
//!
//! [`NumberFieldState`] owns all behavior. A renderer forwards raw input to
//! it, registers the key actions below on the input's key context and maps
//! the prop records onto its elements.

use gpui::{App, KeyBinding};

mod config;
mod events;
mod filter;
mod props;
mod scrub;
mod state;
mod stepper;

#[cfg(all(test, feature = "test-support"))]
pub(crate) mod test_util;

pub use config::{AutoRepeatTiming, NumberFieldConfig, ScrubConfig, ScrubDirection};
pub use events::{
    ChangeReason, NumberFieldEvent, PointerDown, PointerKind, PointerMove, ScrubGeometry,
    StepDirection,
};
pub use props::{InputMode, InputProps, ScrubAreaProps, StepperProps, VirtualCursorProps};
pub use state::{NumberFieldState, NumberFieldValidity};

mod actions {
    #![allow(missing_docs)]
    use gpui::actions;

    actions!(
        number_field,
        [
            Increment,
            Decrement,
            IncrementSmall,
            IncrementLarge,
            DecrementSmall,
            DecrementLarge,
            MoveToMin,
            MoveToMax,
            CommitInput,
        ]
    );
}

pub use actions::*;

/// Key context the bindings from [`init`] are scoped to.
pub const KEY_CONTEXT: &str = "NumberField";

pub fn init(cx: &mut App) {
    let context = Some(KEY_CONTEXT);
    cx.bind_keys([
        KeyBinding::new("up", Increment, context),
        KeyBinding::new("down", Decrement, context),
        KeyBinding::new("alt-up", IncrementSmall, context),
        KeyBinding::new("alt-down", DecrementSmall, context),
        KeyBinding::new("shift-up", IncrementLarge, context),
        KeyBinding::new("shift-down", DecrementLarge, context),
        KeyBinding::new("pageup", IncrementLarge, context),
        KeyBinding::new("pagedown", DecrementLarge, context),
        KeyBinding::new("home", MoveToMin, context),
        KeyBinding::new("end", MoveToMax, context),
        KeyBinding::new("enter", CommitInput, context),
    ]);
}
