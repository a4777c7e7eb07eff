use bevy::prelude::*;
use showroom_helpers::theme::ThemePlugin;

pub mod canvas;
pub mod color;
pub mod displacement;
pub mod easing;
pub mod engine;
mod interaction;
pub mod lattice;
pub mod pointer;
pub mod render;
pub mod settings;

use interaction::{animate_dots, shock_on_press, track_pointer};
use render::{DotGridState, fit_to_window, paint_dots, refresh_theme_colors, setup_dot_grid};
use settings::DotGridSettings;

/// Pointer reactive dot grid drawn over the whole window.
pub struct DotGridPlugin {
    pub settings: DotGridSettings,
}

impl DotGridPlugin {
    pub const fn new(settings: DotGridSettings) -> Self {
        Self { settings }
    }
}

impl Plugin for DotGridPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<ThemePlugin>() {
            app.add_plugins(ThemePlugin);
        }

        app.insert_resource(self.settings.clone())
            .add_systems(Startup, setup_dot_grid)
            .add_systems(
                Update,
                (
                    fit_to_window,
                    refresh_theme_colors,
                    track_pointer,
                    shock_on_press,
                    animate_dots,
                    paint_dots,
                )
                    .chain()
                    .run_if(resource_exists::<DotGridState>),
            );
    }
}

pub fn run() {
    #[cfg(target_arch = "wasm32")]
    let settings = DotGridSettings::from_host_page();
    #[cfg(not(target_arch = "wasm32"))]
    let settings = DotGridSettings::backdrop();

    showroom_helpers::get_default_app(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
        .add_plugins(DotGridPlugin::new(settings))
        .add_systems(Startup, setup)
        .run();
}

fn setup(mut commands: Commands) {
    commands.spawn(Camera2d);
}
