use bevy::prelude::*;
use bevy::window::CursorMoved;
use showroom_helpers::input::{just_pressed_screen_position, moved_screen_position};

use crate::render::DotGridState;

/// Feeds pointer samples to the grid, which throttles them itself.
pub(crate) fn track_pointer(
    mut cursor_events: EventReader<CursorMoved>,
    touch_input: Res<Touches>,
    time: Res<Time<Real>>,
    mut state: ResMut<DotGridState>,
) {
    let Some(position) = moved_screen_position(&mut cursor_events, &touch_input) else {
        return;
    };

    if let Some(pushed @ 1..) = state.grid.pointer_moved(position, time.elapsed_secs_f64()) {
        trace!("pointer at {position} pushed {pushed} dots");
    }
}

pub(crate) fn shock_on_press(
    buttons: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    windows: Query<&Window>,
    mut state: ResMut<DotGridState>,
) {
    let Some(position) = just_pressed_screen_position(&buttons, &touch_input, &windows) else {
        return;
    };

    let pushed = state.grid.clicked(position);
    debug!("shockwave at {position} pushed {pushed} dots");
}

pub(crate) fn animate_dots(time: Res<Time>, mut state: ResMut<DotGridState>) {
    state.grid.advance(time.delta_secs());
}

#[cfg(test)]
mod tests {
    use bevy::window::WindowResolution;

    use super::*;
    use crate::canvas::RasterCanvas;
    use crate::color::ThemeColors;
    use crate::engine::{Capability, DotGrid};
    use crate::settings::DotGridSettings;

    fn app() -> App {
        let Capability::Supported(mut grid) =
            DotGrid::probe(DotGridSettings::default(), ThemeColors::default())
        else {
            panic!("default settings are supported");
        };
        grid.resize(Vec2::new(400.0, 400.0), 1.0, &mut RasterCanvas::new());

        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_event::<CursorMoved>()
            .init_resource::<Touches>()
            .init_resource::<ButtonInput<MouseButton>>()
            .insert_resource(DotGridState::new(grid))
            .add_systems(Update, (track_pointer, shock_on_press).chain());
        app
    }

    fn displaced(app: &App) -> usize {
        app.world()
            .resource::<DotGridState>()
            .grid
            .lattice()
            .points()
            .iter()
            .filter(|point| !point.phase.is_idle())
            .count()
    }

    #[test]
    fn cursor_events_reach_the_grid() {
        let mut app = app();
        let window = app.world_mut().spawn(Window::default()).id();
        app.world_mut().send_event(CursorMoved {
            window,
            position: Vec2::new(120.0, 80.0),
            delta: None,
        });
        app.update();

        let pointer = *app.world().resource::<DotGridState>().grid.pointer();
        assert_eq!(pointer.position, Vec2::new(120.0, 80.0), "pointer tracked");
        assert!(displaced(&app) > 0, "a jump from the origin is fast enough to push");
    }

    #[test]
    fn left_press_sends_a_shockwave_from_the_cursor() {
        let mut app = app();
        let mut window = Window {
            resolution: WindowResolution::new(400.0, 400.0),
            ..default()
        };
        window.set_cursor_position(Some(Vec2::new(210.0, 190.0)));
        app.world_mut().spawn(window);

        app.world_mut()
            .resource_mut::<ButtonInput<MouseButton>>()
            .press(MouseButton::Left);
        app.update();

        assert!(displaced(&app) > 0, "dots around the click are pushed");
    }
}
