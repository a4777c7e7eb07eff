//! Light / dark theme signal shared by every view.
//!
//! The host decides the theme: in a browser it is the `dark` class or the
//! `data-theme` attribute on the document root, natively it is toggled with `T`.
//! Either way a notification lands in [`THEME_SIGNAL_QUEUE`] and is turned into
//! a [`ThemeChanged`] event once per frame. Views never look at the host
//! directly, they react to the event and read design tokens with
//! [`theme_variable`].

use std::sync::{Arc, LazyLock};

use bevy::prelude::*;
use parking_lot::Mutex;
use strum::{Display, EnumString};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
#[cfg(target_arch = "wasm32")]
use web_sys::{MutationObserver, MutationObserverInit};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

pub static THEME_SIGNAL_QUEUE: LazyLock<Arc<Mutex<Vec<ThemeMode>>>> =
    LazyLock::new(|| Arc::new(Mutex::new(Vec::new())));

/// Sent whenever the host theme may have changed, including the initial theme at startup.
///
/// A notification does not imply a different mode: a host can swap a palette
/// without flipping light / dark, so listeners re-read their tokens every time.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeChanged(pub ThemeMode);

#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveTheme(pub ThemeMode);

pub fn notify_theme_change(mode: ThemeMode) {
    THEME_SIGNAL_QUEUE.lock().push(mode);
}

// Design tokens, mirrors the CSS custom properties the web build reads from the document.
#[cfg(not(target_arch = "wasm32"))]
const LIGHT_TOKENS: &[(&str, &str)] = &[
    ("--primary", "#d33682"),
    ("--secondary", "#2aa198"),
    ("--accent", "#cb4b16"),
    ("--background", "#fdf6e3"),
    ("--foreground", "#073642"),
    ("--muted", "#93a1a1"),
    ("--ring", "#d33682"),
];

#[cfg(not(target_arch = "wasm32"))]
const DARK_TOKENS: &[(&str, &str)] = &[
    ("--primary", "#8c5cff"),
    ("--secondary", "#2a2c33"),
    ("--accent", "#1e293b"),
    ("--background", "#1a1b1e"),
    ("--foreground", "#f0f0f0"),
    ("--muted", "#2a2c33"),
    ("--ring", "#8c5cff"),
];

/// Raw value of a design token (`--primary`, `--background`, ...) for the given mode.
///
/// The value is returned as written, it may be hex, `rgb()` or a bare HSL triple.
#[cfg(not(target_arch = "wasm32"))]
pub fn theme_variable(mode: ThemeMode, name: &str) -> Option<String> {
    let tokens = match mode {
        ThemeMode::Light => LIGHT_TOKENS,
        ThemeMode::Dark => DARK_TOKENS,
    };
    tokens
        .iter()
        .find(|(token, _)| *token == name)
        .map(|(_, value)| (*value).to_owned())
}

/// Raw value of a design token, read from the computed style of the document root.
#[cfg(target_arch = "wasm32")]
pub fn theme_variable(_mode: ThemeMode, name: &str) -> Option<String> {
    let window = web_sys::window()?;
    let root = window.document()?.document_element()?;
    let style = window.get_computed_style(&root).ok()??;
    let value = style.get_property_value(name).ok()?;
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

#[cfg(target_arch = "wasm32")]
pub fn document_theme_mode() -> ThemeMode {
    let Some(root) = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.document_element())
    else {
        return ThemeMode::default();
    };

    if root.class_list().contains("dark") {
        return ThemeMode::Dark;
    }

    root.get_attribute("data-theme")
        .and_then(|value| value.parse().ok())
        .unwrap_or_default()
}

#[cfg(target_arch = "wasm32")]
fn observe_document_theme() {
    let Some(root) = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.document_element())
    else {
        error!("No document root to observe, theme changes will be ignored");
        return;
    };

    let closure = Closure::wrap(Box::new(move |_records: JsValue, _observer: JsValue| {
        notify_theme_change(document_theme_mode());
    }) as Box<dyn FnMut(JsValue, JsValue)>);

    let observer = match MutationObserver::new(closure.as_ref().unchecked_ref()) {
        Ok(observer) => observer,
        Err(err) => {
            error!("Could not create theme observer. {err:?}");
            return;
        }
    };

    let options = MutationObserverInit::new();
    options.set_attributes(true);
    match serde_wasm_bindgen::to_value(&["class", "data-theme"]) {
        Ok(filter) => options.set_attribute_filter(&filter),
        Err(err) => warn!("Observing every root attribute, filter rejected: {err}"),
    }

    if let Err(err) = observer.observe_with_options(&root, &options) {
        error!("Could not observe the document root. {err:?}");
        return;
    }

    closure.forget(); // The observer lives as long as the page
}

#[cfg(not(target_arch = "wasm32"))]
fn toggle_theme_on_key(keycode: Res<ButtonInput<KeyCode>>, active: Res<ActiveTheme>) {
    if keycode.just_pressed(KeyCode::KeyT) {
        notify_theme_change(active.0.toggled());
    }
}

fn announce_initial_theme(active: Res<ActiveTheme>, mut changed: EventWriter<ThemeChanged>) {
    changed.send(ThemeChanged(active.0));
}

fn process_theme_signals(mut active: ResMut<ActiveTheme>, mut changed: EventWriter<ThemeChanged>) {
    let signals = THEME_SIGNAL_QUEUE.lock().drain(..).collect::<Vec<_>>();

    // Several mutations in one frame only need one refresh.
    let Some(mode) = signals.last().copied() else {
        return;
    };

    if active.0 != mode {
        info!("Theme switched to {mode}");
    }
    active.0 = mode;
    changed.send(ThemeChanged(mode));
}

pub struct ThemePlugin;

impl Plugin for ThemePlugin {
    fn build(&self, app: &mut App) {
        #[cfg(target_arch = "wasm32")]
        let initial = document_theme_mode();
        #[cfg(not(target_arch = "wasm32"))]
        let initial = ThemeMode::default();

        app.add_event::<ThemeChanged>()
            .insert_resource(ActiveTheme(initial))
            .add_systems(PostStartup, announce_initial_theme)
            .add_systems(PreUpdate, process_theme_signals);

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, observe_document_theme);
        #[cfg(not(target_arch = "wasm32"))]
        app.add_systems(Update, toggle_theme_on_key);
    }
}
