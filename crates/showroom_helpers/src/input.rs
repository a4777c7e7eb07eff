use bevy::prelude::*;
use bevy::window::CursorMoved;

/// Latest pointer position reported this frame, in window coordinates (origin top-left, y down).
///
/// Mouse movement wins over touch when both happen in the same frame.
pub fn moved_screen_position(
    cursor_events: &mut EventReader<CursorMoved>,
    touch_input: &Res<Touches>,
) -> Option<Vec2> {
    if let Some(event) = cursor_events.read().last() {
        return Some(event.position);
    }

    touch_input
        .iter()
        .find(|touch| touch.delta() != Vec2::ZERO)
        .map(bevy::input::touch::Touch::position)
}

pub fn just_pressed_screen_position(
    button_input: &Res<ButtonInput<MouseButton>>,
    touch_input: &Res<Touches>,
    windows: &Query<&Window>,
) -> Option<Vec2> {
    if button_input.just_pressed(MouseButton::Left) {
        let cursor_position = windows.get_single().ok()?.cursor_position()?;
        Some(cursor_position)
    } else if touch_input.any_just_pressed() {
        let touch = touch_input.iter_just_pressed().next()?;
        Some(touch.position())
    } else {
        None
    }
}
