use std::ops::Range;

use gpui::{
    App, Context, Entity, EventEmitter, FocusHandle, Focusable, Modifiers, ScrollDelta,
    SharedString, Subscription, Window,
};
use number_format::{
    DEFAULT_STEP, LocaleSymbols, StepConfig, format_number, parse_number, validate_value,
};

use super::{
    ChangeReason, CommitInput, Decrement, DecrementLarge, DecrementSmall, Increment,
    IncrementLarge, IncrementSmall, InputMode, InputProps, MoveToMax, MoveToMin,
    NumberFieldConfig, NumberFieldEvent, ScrubAreaProps, StepDirection, StepperProps,
    VirtualCursorProps, filter::InsertionFilter, scrub::ScrubSession, stepper::AutoRepeatSession,
};

/// Tolerance, in steps, when deciding whether a value already sits on the lattice.
const LATTICE_TOLERANCE: f64 = 1e-7;

/// The pointer gesture currently driving the value, if any.
///
/// A single slot keeps auto-repeat and scrubbing mutually exclusive. Dropping
/// a session drops its timer tasks.
#[derive(Default)]
pub(crate) enum Gesture {
    #[default]
    None,
    AutoRepeat(AutoRepeatSession),
    Scrub(ScrubSession),
}

enum ValueSource {
    /// The value lives in an entity owned by someone else.
    Controlled {
        value: Entity<Option<f64>>,
        _observer: Subscription,
    },
    Uncontrolled(Option<f64>),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NumberFieldValidity {
    /// The field is required but empty.
    pub value_missing: bool,
    /// The input holds text that doesn't parse as a number.
    pub bad_input: bool,
}

impl NumberFieldValidity {
    pub fn is_valid(&self) -> bool {
        !self.value_missing && !self.bad_input
    }
}

/// Headless state of a number field.
///
/// Owns the committed value (or observes an external one), the text shown in
/// the input and any running pointer gesture. The renderer forwards raw input
/// to the `handle_*`, `stepper_*` and `scrub_*` methods and reads back the
/// display value and prop records.
pub struct NumberFieldState {
    pub(super) config: NumberFieldConfig,
    value_source: ValueSource,
    /// Value the display text was last formatted from or committed as.
    synced_value: Option<f64>,
    display: SharedString,
    /// False while the user is typing, so commits don't reformat their text.
    allow_input_sync: bool,
    focused: bool,
    pub(super) modifiers: Modifiers,
    pub(super) gesture: Gesture,
    /// Set when a pointer press already stepped, so the click that follows doesn't step again.
    pub(super) ignore_click: bool,
    pub(super) visual_scale: f32,
    focus_handle: FocusHandle,
}

impl EventEmitter<NumberFieldEvent> for NumberFieldState {}

impl Focusable for NumberFieldState {
    fn focus_handle(&self, _cx: &App) -> FocusHandle {
        self.focus_handle.clone()
    }
}

impl NumberFieldState {
    /// Creates an uncontrolled field starting at `config.default_value`.
    ///
    /// Invalid configs are not rejected: offending fields fall back to their
    /// defaults and a warning is logged.
    pub fn new(config: NumberFieldConfig, cx: &mut Context<Self>) -> Self {
        let config = config.sanitize();
        let value = validate_value(config.default_value, &config.step_config(), &config.format);
        Self::build(config, ValueSource::Uncontrolled(value), value, cx)
    }

    /// Creates a field whose value is owned by `value`. Commits are written
    /// into the entity and external updates to it are reflected in the display.
    pub fn controlled(
        config: NumberFieldConfig,
        value: Entity<Option<f64>>,
        cx: &mut Context<Self>,
    ) -> Self {
        let config = config.sanitize();
        let observer = cx.observe(&value, |this, value, cx| {
            let external = *value.read(cx);
            this.sync_external_value(external, cx);
        });
        let initial = *value.read(cx);

        Self::build(
            config,
            ValueSource::Controlled {
                value,
                _observer: observer,
            },
            initial,
            cx,
        )
    }

    fn build(
        config: NumberFieldConfig,
        value_source: ValueSource,
        value: Option<f64>,
        cx: &mut Context<Self>,
    ) -> Self {
        let display = format_number(value, &config.locale, &config.format).into();

        Self {
            config,
            value_source,
            synced_value: value,
            display,
            allow_input_sync: true,
            focused: false,
            modifiers: Modifiers::default(),
            gesture: Gesture::None,
            ignore_click: false,
            visual_scale: 1.0,
            focus_handle: cx.focus_handle().tab_stop(true),
        }
    }

    pub fn config(&self) -> &NumberFieldConfig {
        &self.config
    }

    pub fn value(&self, cx: &App) -> Option<f64> {
        match &self.value_source {
            ValueSource::Controlled { value, .. } => *value.read(cx),
            ValueSource::Uncontrolled(value) => *value,
        }
    }

    pub fn is_controlled(&self) -> bool {
        matches!(self.value_source, ValueSource::Controlled { .. })
    }

    /// The text the input should show.
    pub fn display_value(&self) -> SharedString {
        self.display.clone()
    }

    /// The value submitted with a form, under [`NumberFieldConfig::name`].
    pub fn form_value(&self, cx: &App) -> SharedString {
        match self.value(cx) {
            Some(_) => self.display.clone(),
            None => SharedString::default(),
        }
    }

    pub fn validity(&self, cx: &App) -> NumberFieldValidity {
        let text = self.display.trim();
        NumberFieldValidity {
            value_missing: self.config.required && self.value(cx).is_none(),
            bad_input: !text.is_empty() && self.parse(text).is_none(),
        }
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_disabled(&self) -> bool {
        self.config.disabled
    }

    pub fn is_read_only(&self) -> bool {
        self.config.read_only
    }

    pub(super) fn is_interactive(&self) -> bool {
        !self.config.disabled && !self.config.read_only
    }

    pub fn set_disabled(&mut self, disabled: bool, cx: &mut Context<Self>) {
        self.config.disabled = disabled;
        if disabled {
            self.end_gesture(cx);
        }
        cx.notify();
    }

    pub fn set_read_only(&mut self, read_only: bool, cx: &mut Context<Self>) {
        self.config.read_only = read_only;
        if read_only {
            self.end_gesture(cx);
        }
        cx.notify();
    }

    /// Records the currently held modifiers. They pick the step size of the
    /// next step, including the next tick of a held stepper.
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    fn parse(&self, text: &str) -> Option<f64> {
        parse_number(text, &self.config.locale, &self.config.format)
    }

    fn sync_display(&mut self, value: Option<f64>) {
        self.display = format_number(value, &self.config.locale, &self.config.format).into();
        self.synced_value = value;
    }

    fn sync_external_value(&mut self, value: Option<f64>, cx: &mut Context<Self>) {
        if value == self.synced_value {
            return;
        }
        self.allow_input_sync = true;
        self.sync_display(value);
        cx.notify();
    }

    fn write_value(&mut self, value: Option<f64>, cx: &mut Context<Self>) {
        self.synced_value = value;
        match &self.value_source {
            ValueSource::Controlled { value: entity, .. } => {
                let entity = entity.clone();
                entity.update(cx, |external, cx| {
                    *external = value;
                    cx.notify();
                });
            }
            ValueSource::Uncontrolled(_) => self.value_source = ValueSource::Uncontrolled(value),
        }
    }

    /// Validates `value` and makes it the committed value. Returns whether it changed.
    fn commit_value(
        &mut self,
        value: Option<f64>,
        step_config: &StepConfig,
        reason: ChangeReason,
        cx: &mut Context<Self>,
    ) -> bool {
        let validated = validate_value(value, step_config, &self.config.format);
        let previous = self.value(cx);
        let changed = validated != previous;

        if changed {
            log::trace!("number field value {previous:?} -> {validated:?} ({reason:?})");
            self.write_value(validated, cx);
            cx.emit(NumberFieldEvent::ValueChanged {
                value: validated,
                reason,
            });
        }

        if self.allow_input_sync {
            self.sync_display(validated);
        }

        cx.notify();
        changed
    }

    pub(super) fn emit_committed(&mut self, reason: ChangeReason, cx: &mut Context<Self>) {
        let value = self.value(cx);
        cx.emit(NumberFieldEvent::ValueCommitted { value, reason });
    }

    /// Step size for the held modifiers: alt picks the small step, shift the large one.
    pub fn step_amount(&self) -> f64 {
        if self.modifiers.alt {
            self.config.small_step
        } else if self.modifiers.shift {
            self.config.large_step
        } else {
            self.base_step()
        }
    }

    fn base_step(&self) -> f64 {
        self.config.step.unwrap_or(DEFAULT_STEP)
    }

    /// Moves the value one step of `amount` (or [`Self::step_amount`]) in `direction`.
    ///
    /// The value lands on the next point of the `amount` lattice in the
    /// direction of travel, so `5` incremented by a large step of `10` becomes
    /// `10`. An empty field starts at `max(0, min)`. Returns whether the value
    /// changed.
    pub fn step(
        &mut self,
        direction: StepDirection,
        amount: Option<f64>,
        reason: ChangeReason,
        cx: &mut Context<Self>,
    ) -> bool {
        if !self.is_interactive() {
            return false;
        }

        let amount = amount
            .filter(|amount| amount.is_finite() && *amount > 0.0)
            .unwrap_or_else(|| self.step_amount());
        let step_config = self.config.step_config().with_step(Some(amount));
        let origin = step_config.origin();

        let next = match self.value(cx) {
            Some(current) => {
                let steps = (current - origin) / amount;
                let target = match direction {
                    StepDirection::Increment => (steps + LATTICE_TOLERANCE).floor() + 1.0,
                    StepDirection::Decrement => (steps - LATTICE_TOLERANCE).ceil() - 1.0,
                };
                origin + target * amount
            }
            None => self.config.min.unwrap_or(0.0).max(0.0),
        };

        self.allow_input_sync = true;
        self.commit_value(Some(next), &step_config, reason, cx)
    }

    /// Steps up by `step`, as the up arrow does. Held modifiers are ignored:
    /// the small and large steps have actions of their own.
    pub fn increment(&mut self, cx: &mut Context<Self>) -> bool {
        self.key_step(StepDirection::Increment, Some(self.base_step()), cx)
    }

    /// Steps down by `step`, as the down arrow does.
    pub fn decrement(&mut self, cx: &mut Context<Self>) -> bool {
        self.key_step(StepDirection::Decrement, Some(self.base_step()), cx)
    }

    /// Jumps to `min`, if the field has one.
    pub fn move_to_min(&mut self, cx: &mut Context<Self>) -> bool {
        self.move_to_bound(self.config.min, cx)
    }

    /// Jumps to `max`, if the field has one.
    pub fn move_to_max(&mut self, cx: &mut Context<Self>) -> bool {
        self.move_to_bound(self.config.max, cx)
    }

    fn move_to_bound(&mut self, bound: Option<f64>, cx: &mut Context<Self>) -> bool {
        let Some(bound) = bound.filter(|_| self.is_interactive()) else {
            return false;
        };

        self.allow_input_sync = true;
        let step_config = self.config.step_config();
        let changed = self.commit_value(Some(bound), &step_config, ChangeReason::Keyboard, cx);
        if changed {
            self.emit_committed(ChangeReason::Keyboard, cx);
        }
        changed
    }

    /// Commits the typed text, as pressing Enter does.
    pub fn commit_input(&mut self, cx: &mut Context<Self>) {
        self.commit_text(ChangeReason::Keyboard, cx);
    }

    fn commit_text(&mut self, reason: ChangeReason, cx: &mut Context<Self>) {
        self.allow_input_sync = true;
        let step_config = self.config.step_config();
        let text = self.display.clone();

        if text.trim().is_empty() {
            self.commit_value(None, &step_config, reason, cx);
        } else if let Some(parsed) = self.parse(&text) {
            self.commit_value(Some(parsed), &step_config, reason, cx);
        } else {
            let value = self.value(cx);
            self.sync_display(value);
            cx.notify();
        }

        self.emit_committed(reason, cx);
    }

    /// Whether `text` may replace the byte range `selection` of the current input text.
    pub fn accepts_text(&self, text: &str, selection: Range<usize>) -> bool {
        if !self.is_interactive() {
            return false;
        }

        let symbols = LocaleSymbols::resolve(&self.config.locale, &self.config.format);
        InsertionFilter {
            symbols: &symbols,
            allow_negative: self.allows_negative(),
            allow_fraction: self.config.format.allows_fraction(),
        }
        .accepts(text, &self.display, selection)
    }

    fn allows_negative(&self) -> bool {
        self.config.min.is_none_or(|min| min < 0.0)
    }

    /// Tracks the input text as the user edits it. Parseable text is
    /// committed right away, but the text itself is left as typed.
    pub fn handle_input_change(&mut self, text: impl Into<SharedString>, cx: &mut Context<Self>) {
        if !self.is_interactive() {
            return;
        }

        let text = text.into();
        self.allow_input_sync = false;
        self.display = text.clone();

        let step_config = self.config.step_config();
        if text.trim().is_empty() {
            self.commit_value(None, &step_config, ChangeReason::InputChange, cx);
        } else if let Some(parsed) = self.parse(&text) {
            self.commit_value(Some(parsed), &step_config, ChangeReason::InputChange, cx);
        } else {
            cx.notify();
        }
    }

    pub fn handle_focus(&mut self, cx: &mut Context<Self>) {
        self.focused = true;
        cx.notify();
    }

    /// Commits and reformats the typed text. Text that doesn't parse is
    /// discarded in favour of the last committed value.
    pub fn handle_blur(&mut self, cx: &mut Context<Self>) {
        self.focused = false;
        self.commit_text(ChangeReason::InputBlur, cx);
    }

    /// Replaces the value with pasted text. The input keeps showing the
    /// text as pasted until blur reformats it. Returns `false`, leaving the
    /// field untouched, when the text isn't a number.
    pub fn handle_paste(&mut self, text: &str, cx: &mut Context<Self>) -> bool {
        if !self.is_interactive() {
            return false;
        }

        let Some(parsed) = self.parse(text) else {
            return false;
        };

        self.allow_input_sync = false;
        self.display = SharedString::from(text.to_string());
        let step_config = self.config.step_config();
        self.commit_value(Some(parsed), &step_config, ChangeReason::InputPaste, cx);
        self.emit_committed(ChangeReason::InputPaste, cx);
        true
    }

    /// Steps the value once per wheel event while focused. Scrolling up
    /// increments. Returns whether the event was consumed.
    pub fn handle_scroll_wheel(
        &mut self,
        delta: &ScrollDelta,
        modifiers: &Modifiers,
        cx: &mut Context<Self>,
    ) -> bool {
        if !self.config.allow_wheel_scrub || !self.focused || !self.is_interactive() {
            return false;
        }

        let y = match delta {
            ScrollDelta::Pixels(delta) => delta.y.to_f64(),
            ScrollDelta::Lines(delta) => f64::from(delta.y),
        };
        if y == 0.0 {
            return false;
        }

        self.modifiers = *modifiers;
        let direction = if y > 0.0 {
            StepDirection::Increment
        } else {
            StepDirection::Decrement
        };

        if self.step(direction, None, ChangeReason::Wheel, cx) {
            self.emit_committed(ChangeReason::Wheel, cx);
        }
        true
    }

    /// Ends the running gesture, cancelling its timers.
    pub(super) fn end_gesture(&mut self, cx: &mut Context<Self>) {
        match std::mem::take(&mut self.gesture) {
            Gesture::None => return,
            Gesture::AutoRepeat(session) => {
                log::debug!(
                    "number field stepper released after {} steps",
                    session.steps
                );
                if session.steps > 0 {
                    self.emit_committed(session.direction.press_reason(), cx);
                }
            }
            Gesture::Scrub(session) => {
                log::debug!(
                    "number field {:?} scrub ended after {} steps",
                    session.kind,
                    session.steps
                );
                if session.steps > 0 {
                    self.emit_committed(ChangeReason::Scrub, cx);
                }
            }
        }
        cx.notify();
    }

    fn key_step(
        &mut self,
        direction: StepDirection,
        amount: Option<f64>,
        cx: &mut Context<Self>,
    ) -> bool {
        let changed = self.step(direction, amount, ChangeReason::Keyboard, cx);
        if changed {
            self.emit_committed(ChangeReason::Keyboard, cx);
        }
        changed
    }

    pub fn on_increment(&mut self, _: &Increment, _: &mut Window, cx: &mut Context<Self>) {
        self.increment(cx);
    }

    pub fn on_decrement(&mut self, _: &Decrement, _: &mut Window, cx: &mut Context<Self>) {
        self.decrement(cx);
    }

    pub fn on_increment_small(
        &mut self,
        _: &IncrementSmall,
        _: &mut Window,
        cx: &mut Context<Self>,
    ) {
        self.key_step(StepDirection::Increment, Some(self.config.small_step), cx);
    }

    pub fn on_increment_large(
        &mut self,
        _: &IncrementLarge,
        _: &mut Window,
        cx: &mut Context<Self>,
    ) {
        self.key_step(StepDirection::Increment, Some(self.config.large_step), cx);
    }

    pub fn on_decrement_small(
        &mut self,
        _: &DecrementSmall,
        _: &mut Window,
        cx: &mut Context<Self>,
    ) {
        self.key_step(StepDirection::Decrement, Some(self.config.small_step), cx);
    }

    pub fn on_decrement_large(
        &mut self,
        _: &DecrementLarge,
        _: &mut Window,
        cx: &mut Context<Self>,
    ) {
        self.key_step(StepDirection::Decrement, Some(self.config.large_step), cx);
    }

    pub fn on_move_to_min(&mut self, _: &MoveToMin, _: &mut Window, cx: &mut Context<Self>) {
        self.move_to_min(cx);
    }

    pub fn on_move_to_max(&mut self, _: &MoveToMax, _: &mut Window, cx: &mut Context<Self>) {
        self.move_to_max(cx);
    }

    pub fn on_commit_input(&mut self, _: &CommitInput, _: &mut Window, cx: &mut Context<Self>) {
        self.commit_input(cx);
    }

    pub fn input_props(&self, cx: &App) -> InputProps {
        let input_mode = if self.allows_negative() {
            InputMode::Text
        } else if self.config.format.allows_fraction() {
            InputMode::Decimal
        } else {
            InputMode::Numeric
        };

        InputProps {
            id: self.config.id.clone(),
            name: self.config.name.clone(),
            role: "textbox",
            aria_roledescription: "Number field",
            aria_invalid: !self.validity(cx).is_valid(),
            aria_required: self.config.required,
            aria_readonly: self.config.read_only,
            disabled: self.config.disabled,
            input_mode,
            tab_index: 0,
            autocomplete: "off",
            spell_check: false,
            value: self.display.clone(),
        }
    }

    pub fn stepper_props(&self, direction: StepDirection, cx: &App) -> StepperProps {
        let pressed = matches!(
            &self.gesture,
            Gesture::AutoRepeat(session) if session.direction == direction
        );

        StepperProps {
            role: "button",
            aria_label: match direction {
                StepDirection::Increment => "Increase",
                StepDirection::Decrement => "Decrease",
            },
            aria_controls: self.config.id.clone(),
            disabled: self.is_stepper_disabled(direction, cx),
            tab_index: -1,
            pressed,
        }
    }

    pub fn scrub_area_props(&self) -> ScrubAreaProps {
        let pointer_locked = matches!(
            &self.gesture,
            Gesture::Scrub(session) if session.pointer_locked
        );

        ScrubAreaProps {
            role: "presentation",
            disabled: !self.is_interactive(),
            scrubbing: self.is_scrubbing(),
            pointer_locked,
        }
    }

    pub fn virtual_cursor_props(&self) -> VirtualCursorProps {
        VirtualCursorProps {
            aria_hidden: true,
            visible: self.is_scrubbing(),
            transform: self.virtual_cursor_transform(),
        }
    }
}
