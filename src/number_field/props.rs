//! Plain records describing what each part of a number field should expose.
//! The renderer maps them onto its elements; nothing here touches GPUI styling.

use gpui::SharedString;

/// Virtual keyboard hint for the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Digits only.
    Numeric,
    /// Digits and a decimal separator.
    Decimal,
    /// Full keyboard, needed for a minus sign on most touch keyboards.
    Text,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputProps {
    pub id: Option<SharedString>,
    pub name: Option<SharedString>,
    pub role: &'static str,
    pub aria_roledescription: &'static str,
    pub aria_invalid: bool,
    pub aria_required: bool,
    pub aria_readonly: bool,
    pub disabled: bool,
    pub input_mode: InputMode,
    pub tab_index: i32,
    pub autocomplete: &'static str,
    pub spell_check: bool,
    pub value: SharedString,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepperProps {
    pub role: &'static str,
    pub aria_label: &'static str,
    /// Id of the input the stepper changes.
    pub aria_controls: Option<SharedString>,
    pub disabled: bool,
    /// Steppers are reachable by pointer only; the input handles arrow keys.
    pub tab_index: i32,
    /// Whether a press on this stepper is currently held.
    pub pressed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScrubAreaProps {
    pub role: &'static str,
    pub disabled: bool,
    pub scrubbing: bool,
    /// The OS cursor should be hidden and the pointer locked.
    pub pointer_locked: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VirtualCursorProps {
    pub aria_hidden: bool,
    pub visible: bool,
    /// CSS-style transform positioning the cursor, present while scrubbing.
    pub transform: Option<SharedString>,
}
