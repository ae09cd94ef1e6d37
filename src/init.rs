use gpui::App;

use crate::number_field;

/// Registers the key bindings of every component in the crate.
pub fn init(cx: &mut App) {
    number_field::init(cx);
}
