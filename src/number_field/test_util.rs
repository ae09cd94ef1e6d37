use std::{cell::RefCell, rc::Rc};

use gpui::{AppContext as _, Entity, TestAppContext};

use super::{NumberFieldConfig, NumberFieldEvent, NumberFieldState};

pub(crate) type EventLog = Rc<RefCell<Vec<NumberFieldEvent>>>;

/// An uncontrolled field plus a log of every event it emits.
pub(crate) fn number_field(
    cx: &mut TestAppContext,
    config: NumberFieldConfig,
) -> (Entity<NumberFieldState>, EventLog) {
    let field = cx.new(|cx| NumberFieldState::new(config, cx));
    let events = EventLog::default();

    let log = events.clone();
    cx.update(|cx| {
        cx.subscribe(&field, move |_, event: &NumberFieldEvent, _| {
            log.borrow_mut().push(event.clone());
        })
        .detach();
    });

    (field, events)
}

pub(crate) fn changed_values(events: &EventLog) -> Vec<Option<f64>> {
    events
        .borrow()
        .iter()
        .filter_map(|event| match event {
            NumberFieldEvent::ValueChanged { value, .. } => Some(*value),
            _ => None,
        })
        .collect()
}

pub(crate) fn committed_values(events: &EventLog) -> Vec<Option<f64>> {
    events
        .borrow()
        .iter()
        .filter_map(|event| match event {
            NumberFieldEvent::ValueCommitted { value, .. } => Some(*value),
            _ => None,
        })
        .collect()
}
