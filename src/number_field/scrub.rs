use gpui::{Bounds, Context, MouseButton, Pixels, Point, SharedString, Size, point, size};

use super::{
    ChangeReason, NumberFieldEvent, NumberFieldState, PointerDown, PointerKind, PointerMove,
    ScrubDirection, ScrubGeometry, StepDirection, state::Gesture,
};

/// A drag on the scrub area.
///
/// The OS pointer is locked while scrubbing, so the session tracks a virtual
/// cursor of its own that wraps around `viewport` instead of stopping at its edge.
pub(crate) struct ScrubSession {
    pub kind: PointerKind,
    /// Travel along the scrub axis since the last step.
    pub cumulative_delta: f32,
    pub cursor: Point<f32>,
    pub viewport: Bounds<f32>,
    pub cursor_size: Size<f32>,
    pub pointer_locked: bool,
    /// Steps that changed the value.
    pub steps: usize,
}

impl ScrubSession {
    fn move_cursor(&mut self, dx: f32, dy: f32) {
        let half_width = self.cursor_size.width / 2.0;
        let half_height = self.cursor_size.height / 2.0;
        let left = self.viewport.origin.x;
        let top = self.viewport.origin.y;
        let right = left + self.viewport.size.width;
        let bottom = top + self.viewport.size.height;

        self.cursor = point(
            wrap(self.cursor.x + dx, left, right, half_width),
            wrap(self.cursor.y + dy, top, bottom, half_height),
        );
    }
}

fn wrap(position: f32, start: f32, end: f32, half_extent: f32) -> f32 {
    if position + half_extent > end {
        start + half_extent
    } else if position - half_extent < start {
        end - half_extent
    } else {
        position
    }
}

fn to_f32_point(point_px: Point<Pixels>) -> Point<f32> {
    point(point_px.x.to_f64() as f32, point_px.y.to_f64() as f32)
}

fn to_f32_bounds(bounds: Bounds<Pixels>) -> Bounds<f32> {
    Bounds {
        origin: to_f32_point(bounds.origin),
        size: size(
            bounds.size.width.to_f64() as f32,
            bounds.size.height.to_f64() as f32,
        ),
    }
}

fn inflate(bounds: Bounds<f32>, amount: f32) -> Bounds<f32> {
    Bounds {
        origin: point(bounds.origin.x - amount, bounds.origin.y - amount),
        size: size(
            bounds.size.width + amount * 2.0,
            bounds.size.height + amount * 2.0,
        ),
    }
}

impl NumberFieldState {
    pub fn is_scrubbing(&self) -> bool {
        matches!(self.gesture, Gesture::Scrub(_))
    }

    /// Starts scrubbing from a press on the scrub area. Requests focus for the
    /// input and, for mouse and pen, asks the renderer to lock the pointer.
    pub fn scrub_pointer_down(
        &mut self,
        event: &PointerDown,
        geometry: ScrubGeometry,
        cx: &mut Context<Self>,
    ) {
        if event.button != MouseButton::Left || !self.is_interactive() {
            return;
        }

        self.end_gesture(cx);
        self.modifiers = event.modifiers;
        cx.emit(NumberFieldEvent::FocusRequested);

        let scrub = self.config.scrub;
        let viewport = match scrub.teleport_distance {
            Some(distance) => inflate(to_f32_bounds(geometry.surface), distance / 2.0),
            None => to_f32_bounds(geometry.viewport),
        };

        log::debug!("number field scrub started with {:?}", event.kind);
        self.gesture = Gesture::Scrub(ScrubSession {
            kind: event.kind,
            cumulative_delta: 0.0,
            cursor: to_f32_point(event.position),
            viewport,
            cursor_size: size(scrub.cursor_width, scrub.cursor_height),
            pointer_locked: event.kind != PointerKind::Touch,
            steps: 0,
        });
        cx.notify();
    }

    /// Moves the virtual cursor and steps once each time the travel along the
    /// scrub axis reaches the pixel sensitivity.
    pub fn scrub_pointer_move(&mut self, event: &PointerMove, cx: &mut Context<Self>) {
        let Gesture::Scrub(session) = &mut self.gesture else {
            return;
        };
        self.modifiers = event.modifiers;

        let dx = (event.delta.x.to_f64() as f32).round();
        let dy = (event.delta.y.to_f64() as f32).round();
        session.move_cursor(dx, dy);

        let scrub = self.config.scrub;
        session.cumulative_delta += match scrub.direction {
            ScrubDirection::Horizontal => dx,
            // Screen y grows downward; dragging up increases the value.
            ScrubDirection::Vertical => -dy,
        };

        let direction = if session.cumulative_delta.abs() >= scrub.pixel_sensitivity {
            let direction = if session.cumulative_delta > 0.0 {
                StepDirection::Increment
            } else {
                StepDirection::Decrement
            };
            session.cumulative_delta = 0.0;
            Some(direction)
        } else {
            None
        };

        if let Some(direction) = direction
            && self.step(direction, None, ChangeReason::Scrub, cx)
            && let Gesture::Scrub(session) = &mut self.gesture
        {
            session.steps += 1;
        }

        cx.notify();
    }

    pub fn scrub_pointer_up(&mut self, cx: &mut Context<Self>) {
        self.end_scrub(cx);
    }

    pub fn scrub_pointer_cancel(&mut self, cx: &mut Context<Self>) {
        self.end_scrub(cx);
    }

    fn end_scrub(&mut self, cx: &mut Context<Self>) {
        if self.is_scrubbing() {
            self.end_gesture(cx);
        }
    }

    /// Sets the scale the field is rendered at, so the virtual cursor can
    /// counter it and keep its on-screen size.
    pub fn set_visual_scale(&mut self, scale: f32, cx: &mut Context<Self>) {
        if scale.is_finite() && scale > 0.0 {
            self.visual_scale = scale;
            cx.notify();
        }
    }

    pub fn virtual_cursor_transform(&self) -> Option<SharedString> {
        let Gesture::Scrub(session) = &self.gesture else {
            return None;
        };

        Some(
            format!(
                "translate3d({}px,{}px,0) scale({})",
                session.cursor.x,
                session.cursor.y,
                1.0 / self.visual_scale
            )
            .into(),
        )
    }
}

#[cfg(all(test, feature = "test-support"))]
mod tests {
    use gpui::{Modifiers, TestAppContext, bounds, px};
    use rand::{Rng, SeedableRng, rngs::StdRng};

    use super::*;
    use crate::number_field::{
        NumberFieldConfig, ScrubConfig,
        test_util::{changed_values, committed_values, number_field},
    };

    fn geometry() -> ScrubGeometry {
        ScrubGeometry {
            surface: bounds(point(px(100.), px(100.)), size(px(100.), px(20.))),
            viewport: bounds(point(px(0.), px(0.)), size(px(800.), px(600.))),
        }
    }

    fn press(kind: PointerKind) -> PointerDown {
        PointerDown::primary(kind, point(px(150.), px(110.)))
    }

    fn drag(dx: f32, dy: f32) -> PointerMove {
        PointerMove {
            delta: point(px(dx), px(dy)),
            kind: PointerKind::Mouse,
            modifiers: Modifiers::default(),
        }
    }

    fn scrub_config(scrub: ScrubConfig) -> NumberFieldConfig {
        NumberFieldConfig {
            default_value: Some(5.0),
            scrub,
            ..Default::default()
        }
    }

    #[gpui::test]
    fn test_steps_once_per_sensitivity(cx: &mut TestAppContext) {
        let (field, events) = number_field(
            cx,
            scrub_config(ScrubConfig {
                pixel_sensitivity: 4.0,
                ..Default::default()
            }),
        );

        field.update(cx, |state, cx| {
            state.scrub_pointer_down(&press(PointerKind::Mouse), geometry(), cx);
            state.scrub_pointer_move(&drag(3., 0.), cx);
        });
        assert!(changed_values(&events).is_empty());

        field.update(cx, |state, cx| {
            state.scrub_pointer_move(&drag(1., 0.), cx);
            state.scrub_pointer_move(&drag(3., 0.), cx);
        });
        assert_eq!(
            changed_values(&events),
            [Some(6.0)],
            "Travel resets after each step"
        );

        field.update(cx, |state, cx| state.scrub_pointer_move(&drag(-9., 0.), cx));
        assert_eq!(
            changed_values(&events),
            [Some(6.0), Some(5.0)],
            "A large move still steps once"
        );

        field.update(cx, |state, cx| state.scrub_pointer_up(cx));
        assert_eq!(committed_values(&events), [Some(5.0)]);
        field.read_with(cx, |state, _| assert!(!state.is_scrubbing()));
    }

    #[gpui::test]
    fn test_vertical_scrub_increases_upward(cx: &mut TestAppContext) {
        let (field, events) = number_field(
            cx,
            scrub_config(ScrubConfig {
                direction: ScrubDirection::Vertical,
                ..Default::default()
            }),
        );

        field.update(cx, |state, cx| {
            state.scrub_pointer_down(&press(PointerKind::Mouse), geometry(), cx);
            state.scrub_pointer_move(&drag(10., -2.), cx);
            state.scrub_pointer_move(&drag(0., 2.), cx);
            state.scrub_pointer_move(&drag(0., 2.), cx);
        });

        assert_eq!(changed_values(&events), [Some(6.0), Some(5.0), Some(4.0)]);
    }

    #[gpui::test]
    fn test_release_without_steps_commits_nothing(cx: &mut TestAppContext) {
        let (field, events) = number_field(cx, scrub_config(ScrubConfig::default()));

        field.update(cx, |state, cx| {
            state.scrub_pointer_down(&press(PointerKind::Mouse), geometry(), cx);
            state.scrub_pointer_move(&drag(1., 0.), cx);
            state.scrub_pointer_cancel(cx);
        });

        assert_eq!(*events.borrow(), [NumberFieldEvent::FocusRequested]);
    }

    #[gpui::test]
    fn test_pointer_lock_and_cursor_props(cx: &mut TestAppContext) {
        let (field, _) = number_field(cx, scrub_config(ScrubConfig::default()));

        field.update(cx, |state, cx| {
            assert!(!state.virtual_cursor_props().visible);
            state.scrub_pointer_down(&press(PointerKind::Mouse), geometry(), cx);
            state.set_visual_scale(2.0, cx);
        });
        field.read_with(cx, |state, _| {
            let area = state.scrub_area_props();
            assert!(area.scrubbing);
            assert!(area.pointer_locked);

            let cursor = state.virtual_cursor_props();
            assert!(cursor.visible);
            assert!(cursor.aria_hidden);
            assert_eq!(
                cursor.transform.as_deref(),
                Some("translate3d(150px,110px,0) scale(0.5)")
            );
        });

        field.update(cx, |state, cx| {
            state.scrub_pointer_down(&press(PointerKind::Touch), geometry(), cx)
        });
        field.read_with(cx, |state, _| {
            assert!(state.is_scrubbing());
            assert!(!state.scrub_area_props().pointer_locked);
        });
    }

    #[gpui::test]
    fn test_cursor_wraps_around_viewport(cx: &mut TestAppContext) {
        let (field, _) = number_field(
            cx,
            scrub_config(ScrubConfig {
                cursor_width: 20.,
                cursor_height: 20.,
                ..Default::default()
            }),
        );

        field.update(cx, |state, cx| {
            let start = PointerDown::primary(PointerKind::Mouse, point(px(785.), px(300.)));
            state.scrub_pointer_down(&start, geometry(), cx);
            state.scrub_pointer_move(&drag(10., 0.), cx);
        });
        field.read_with(cx, |state, _| {
            assert_eq!(
                state.virtual_cursor_props().transform.as_deref(),
                Some("translate3d(10px,300px,0) scale(1)")
            );
        });

        field.update(cx, |state, cx| state.scrub_pointer_move(&drag(0., -295.), cx));
        field.read_with(cx, |state, _| {
            assert_eq!(
                state.virtual_cursor_props().transform.as_deref(),
                Some("translate3d(10px,590px,0) scale(1)")
            );
        });
    }

    #[gpui::test]
    fn test_cursor_wraps_around_teleport_area(cx: &mut TestAppContext) {
        let (field, _) = number_field(
            cx,
            scrub_config(ScrubConfig {
                teleport_distance: Some(40.),
                ..Default::default()
            }),
        );

        field.update(cx, |state, cx| {
            let start = PointerDown::primary(PointerKind::Mouse, point(px(210.), px(110.)));
            state.scrub_pointer_down(&start, geometry(), cx);
            state.scrub_pointer_move(&drag(15., 0.), cx);
        });

        field.read_with(cx, |state, _| {
            assert_eq!(
                state.virtual_cursor_props().transform.as_deref(),
                Some("translate3d(80px,110px,0) scale(1)"),
                "The area is inflated by half the distance on each side"
            );
        });
    }

    #[gpui::test]
    fn test_disabled_field_ignores_scrub(cx: &mut TestAppContext) {
        let (field, events) = number_field(
            cx,
            NumberFieldConfig {
                disabled: true,
                ..scrub_config(ScrubConfig::default())
            },
        );

        field.update(cx, |state, cx| {
            state.scrub_pointer_down(&press(PointerKind::Mouse), geometry(), cx);
            state.scrub_pointer_move(&drag(10., 0.), cx);
        });

        assert!(events.borrow().is_empty());
        field.read_with(cx, |state, _| {
            assert!(!state.is_scrubbing());
            assert!(state.scrub_area_props().disabled);
        });
    }

    #[gpui::test]
    fn test_disabling_mid_scrub_ends_it(cx: &mut TestAppContext) {
        let (field, events) = number_field(cx, scrub_config(ScrubConfig::default()));

        field.update(cx, |state, cx| {
            state.scrub_pointer_down(&press(PointerKind::Mouse), geometry(), cx);
            state.scrub_pointer_move(&drag(2., 0.), cx);
            state.set_disabled(true, cx);
            state.scrub_pointer_move(&drag(2., 0.), cx);
        });

        assert_eq!(changed_values(&events), [Some(6.0)]);
        assert_eq!(committed_values(&events), [Some(6.0)]);
        field.read_with(cx, |state, _| assert!(!state.is_scrubbing()));
    }

    #[gpui::test]
    fn test_scrub_replaces_held_stepper(cx: &mut TestAppContext) {
        let (field, _) = number_field(cx, scrub_config(ScrubConfig::default()));

        field.update(cx, |state, cx| {
            state.stepper_pointer_down(StepDirection::Increment, &press(PointerKind::Mouse), cx);
            state.scrub_pointer_down(&press(PointerKind::Mouse), geometry(), cx);
        });

        field.read_with(cx, |state, cx| {
            assert!(state.is_scrubbing());
            assert!(!state.stepper_props(StepDirection::Increment, cx).pressed);
        });
    }

    #[gpui::test]
    fn test_steps_never_outpace_travel(cx: &mut TestAppContext) {
        let sensitivity = 3.0;
        let (field, events) = number_field(
            cx,
            scrub_config(ScrubConfig {
                pixel_sensitivity: sensitivity,
                ..Default::default()
            }),
        );
        let mut rng = StdRng::seed_from_u64(7);
        let mut travel = 0.0;

        field.update(cx, |state, cx| {
            state.scrub_pointer_down(&press(PointerKind::Mouse), geometry(), cx);
            for _ in 0..500 {
                let dx = rng.random_range(-4..=4) as f32;
                travel += dx.abs();
                state.scrub_pointer_move(&drag(dx, 0.), cx);
            }
        });

        let steps = changed_values(&events).len() as f32;
        assert!(steps > 0.0);
        assert!(steps * sensitivity <= travel);

        let value = field.read_with(cx, |state, cx| state.value(cx));
        assert_eq!(changed_values(&events).last().copied(), Some(value));
    }
}
