#![allow(
    clippy::allow_attributes,
    reason = "allow attributes are needed for wasm"
)]

use bevy::prelude::*;
use bevy::render::settings::{WgpuSettings, WgpuSettingsPriority};
use bevy::render::RenderPlugin;
use bevy::window::{WindowMode, WindowResolution};

use crate::theme::ThemePlugin;
#[cfg(target_arch = "wasm32")]
use crate::window_resizing::handle_browser_resize;

/// Canvas element the app renders into when running in a browser.
pub const CANVAS_SELECTOR: &str = "#showroom";

// Initial native window size, the browser build fits its parent element instead
pub const WINDOW_WIDTH: f32 = 960.0;
pub const WINDOW_HEIGHT: f32 = 640.0;

// Creates a Bevy app with the window, render and theme setup shared by every showroom view
#[allow(unused_variables, reason = "app_version is used in wasm")]
pub fn get_default_app(app_name: &str, app_version: &str) -> App {
    let mut app = App::new();

    let resolution = WindowResolution::new(WINDOW_WIDTH, WINDOW_HEIGHT);

    let window_plugin = WindowPlugin {
        primary_window: Some(Window {
            title: app_name.to_string(),
            present_mode: bevy::window::PresentMode::Fifo,
            resolution,
            canvas: Some(CANVAS_SELECTOR.into()),
            fit_canvas_to_parent: true,
            mode: WindowMode::Windowed,
            // Tells wasm not to override default event handling, like F5, Ctrl+R etc.
            prevent_default_event_handling: false,
            ..default()
        }),
        ..default()
    };

    let render_plugin = RenderPlugin {
        render_creation: bevy::render::settings::RenderCreation::Automatic(WgpuSettings {
            backends: Some(
                bevy::render::settings::Backends::BROWSER_WEBGPU
                    | bevy::render::settings::Backends::GL,
            ),
            power_preference: bevy::render::settings::PowerPreference::LowPower,
            priority: WgpuSettingsPriority::Functionality,
            ..Default::default()
        }),
        ..Default::default()
    };

    app.add_plugins(DefaultPlugins.set(window_plugin).set(render_plugin));

    // The views are decorative backgrounds, no reason to drain a laptop battery.
    // https://github.com/aevyrie/bevy_framepace
    app.add_plugins(bevy_framepace::FramepacePlugin);

    app.add_plugins(ThemePlugin);

    #[cfg(target_arch = "wasm32")]
    {
        info!("{app_name} {app_version} attached to {CANVAS_SELECTOR}");
        app.add_systems(PreUpdate, handle_browser_resize);
    }

    app
}
