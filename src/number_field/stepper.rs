use gpui::{App, Context, MouseButton, Task};

use super::{
    NumberFieldState, PointerDown, PointerKind, PointerMove, StepDirection, state::Gesture,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RepeatPhase {
    /// Held, but the start delay hasn't elapsed (or a touch press isn't confirmed yet).
    Pressed,
    Repeating,
}

/// A held increment or decrement button.
pub(crate) struct AutoRepeatSession {
    pub direction: StepDirection,
    pub kind: PointerKind,
    pub phase: RepeatPhase,
    /// Pointer moves seen while a touch press waits for confirmation.
    pub touch_moves: u32,
    /// Steps that changed the value.
    pub steps: usize,
    _touch_confirm: Option<Task<anyhow::Result<()>>>,
    _repeat: Option<Task<anyhow::Result<()>>>,
}

impl AutoRepeatSession {
    fn new(direction: StepDirection, kind: PointerKind) -> Self {
        Self {
            direction,
            kind,
            phase: RepeatPhase::Pressed,
            touch_moves: 0,
            steps: 0,
            _touch_confirm: None,
            _repeat: None,
        }
    }
}

impl NumberFieldState {
    /// Whether the stepper for `direction` can act: the field is writable
    /// and the value isn't already at the bound it moves toward.
    pub fn is_stepper_disabled(&self, direction: StepDirection, cx: &App) -> bool {
        if !self.is_interactive() {
            return true;
        }

        let Some(value) = self.value(cx) else {
            return false;
        };

        let step_config = self.config.step_config();
        match direction {
            StepDirection::Increment => value >= step_config.max_or_default(),
            StepDirection::Decrement => value <= step_config.min_or_default(),
        }
    }

    /// Starts a press on a stepper.
    ///
    /// Mouse and pen presses step at once and then auto-repeat. Touch presses
    /// wait a moment first, so a finger that starts scrolling the page doesn't
    /// change the value.
    pub fn stepper_pointer_down(
        &mut self,
        direction: StepDirection,
        event: &PointerDown,
        cx: &mut Context<Self>,
    ) {
        if event.button != MouseButton::Left || self.is_stepper_disabled(direction, cx) {
            return;
        }

        self.end_gesture(cx);
        self.modifiers = event.modifiers;
        log::debug!(
            "number field stepper pressed: {direction:?} with {:?}",
            event.kind
        );

        let mut session = AutoRepeatSession::new(direction, event.kind);
        match event.kind {
            PointerKind::Touch => {
                let confirm_after = self.config.auto_repeat.touch_confirm();
                session._touch_confirm = Some(cx.spawn(async move |this, cx| {
                    cx.background_executor().timer(confirm_after).await;
                    this.update(cx, |state, cx| state.confirm_touch_press(cx))
                }));
                self.gesture = Gesture::AutoRepeat(session);
            }
            PointerKind::Mouse | PointerKind::Pen => {
                self.ignore_click = true;
                self.gesture = Gesture::AutoRepeat(session);
                self.start_auto_change(cx);
            }
        }

        cx.notify();
    }

    pub fn stepper_pointer_move(&mut self, event: &PointerMove, _cx: &mut Context<Self>) {
        self.modifiers = event.modifiers;
        if let Gesture::AutoRepeat(session) = &mut self.gesture
            && session.kind == PointerKind::Touch
            && session.phase == RepeatPhase::Pressed
        {
            session.touch_moves += 1;
        }
    }

    pub fn stepper_pointer_up(&mut self, cx: &mut Context<Self>) {
        self.end_auto_repeat(cx);
    }

    /// A cancelled press produces no click, so nothing is left to swallow.
    pub fn stepper_pointer_cancel(&mut self, cx: &mut Context<Self>) {
        self.ignore_click = false;
        self.end_auto_repeat(cx);
    }

    /// Leaving the button ends a mouse or pen press, and the release lands
    /// elsewhere without a click. Touch presses keep going, since a finger
    /// routinely drifts off small targets.
    pub fn stepper_pointer_leave(&mut self, kind: PointerKind, cx: &mut Context<Self>) {
        if kind != PointerKind::Touch && matches!(self.gesture, Gesture::AutoRepeat(_)) {
            self.ignore_click = false;
            self.end_gesture(cx);
        }
    }

    /// A click without a preceding press, e.g. from the keyboard or
    /// assistive technology. Clicks that trail a press which already stepped
    /// are swallowed.
    pub fn stepper_click(&mut self, direction: StepDirection, cx: &mut Context<Self>) {
        if std::mem::take(&mut self.ignore_click) || self.is_stepper_disabled(direction, cx) {
            return;
        }

        let reason = direction.press_reason();
        if self.step(direction, None, reason, cx) {
            self.emit_committed(reason, cx);
        }
    }

    fn end_auto_repeat(&mut self, cx: &mut Context<Self>) {
        if matches!(self.gesture, Gesture::AutoRepeat(_)) {
            self.end_gesture(cx);
        }
    }

    fn confirm_touch_press(&mut self, cx: &mut Context<Self>) {
        let max_moves = self.config.auto_repeat.max_touch_moves;
        let scrolled = match &self.gesture {
            Gesture::AutoRepeat(session)
                if session.kind == PointerKind::Touch && session.phase == RepeatPhase::Pressed =>
            {
                session.touch_moves >= max_moves
            }
            _ => return,
        };

        if scrolled {
            log::debug!("number field stepper touch treated as a scroll");
            self.end_gesture(cx);
            return;
        }

        self.ignore_click = true;
        self.start_auto_change(cx);
    }

    /// Steps once now, then once per tick after the start delay until the
    /// session ends or the bound is reached.
    fn start_auto_change(&mut self, cx: &mut Context<Self>) {
        if !self.repeat_step(cx) {
            return;
        }

        let timing = self.config.auto_repeat;
        let task = cx.spawn(async move |this, cx| {
            cx.background_executor().timer(timing.start_delay()).await;
            this.update(cx, |state, _| {
                if let Gesture::AutoRepeat(session) = &mut state.gesture {
                    session.phase = RepeatPhase::Repeating;
                }
            })?;

            loop {
                cx.background_executor().timer(timing.tick_interval()).await;
                if !this.update(cx, |state, cx| state.repeat_step(cx))? {
                    break;
                }
            }

            Ok(())
        });

        if let Gesture::AutoRepeat(session) = &mut self.gesture {
            session._repeat = Some(task);
        }
    }

    /// Applies one step of the held stepper. Returns whether repeating should continue.
    fn repeat_step(&mut self, cx: &mut Context<Self>) -> bool {
        let Gesture::AutoRepeat(session) = &self.gesture else {
            return false;
        };
        let direction = session.direction;
        if self.is_stepper_disabled(direction, cx) {
            return false;
        }

        if self.step(direction, None, direction.press_reason(), cx)
            && let Gesture::AutoRepeat(session) = &mut self.gesture
        {
            session.steps += 1;
        }

        !self.is_stepper_disabled(direction, cx)
    }
}
