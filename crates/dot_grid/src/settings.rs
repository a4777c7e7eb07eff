use bevy::prelude::*;
use serde::Deserialize;
use thiserror::Error;

/// What happens when a point that is still moving gets pushed again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RetriggerPolicy {
    /// The point finishes its push and return first, later triggers are dropped
    #[default]
    Ignore,
    /// A new push starts from wherever the point currently is
    Restart,
}

/// Resource containing every tunable of the dot grid.
///
/// Field names deserialize in camelCase so a host page can hand over the same
/// object it would give the web component.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DotGridSettings {
    // Lattice
    /// Dot diameter in pixels
    pub dot_size: f32,
    /// Space between two neighbouring dots in pixels
    pub gap: f32,

    // Colors
    /// Explicit resting color, wins over `rest_variable`
    pub rest_color: Option<String>,
    /// Explicit highlight color, wins over `highlight_variable`
    pub highlight_color: Option<String>,
    /// Theme token used for the resting color
    pub rest_variable: String,
    /// Theme token used for the highlight color
    pub highlight_variable: String,

    // Pointer
    /// Radius around the pointer where dots blend toward the highlight color and can be pushed
    pub proximity: f32,
    /// Pointer speed (px/s) above which nearby dots get pushed
    pub speed_trigger: f32,
    /// Pointer speeds are clamped to this (px/s)
    pub max_speed: f32,
    /// Minimum interval between two pointer samples (ms)
    pub throttle_ms: f32,

    // Click shockwave
    /// Radius of the click shockwave in pixels
    pub shock_radius: f32,
    /// Multiplier applied to the shockwave push
    pub shock_strength: f32,

    // Motion
    /// Deceleration of the push phase (px/s²), higher settles faster
    pub resistance: f32,
    /// Length of the elastic return in seconds
    pub return_duration: f32,
    /// Behaviour for dots that are pushed again mid-flight
    pub retrigger: RetriggerPolicy,
}

impl Default for DotGridSettings {
    fn default() -> Self {
        Self {
            dot_size: 8.0,
            gap: 20.0,

            rest_color: None,
            highlight_color: None,
            rest_variable: "--primary".to_owned(),
            highlight_variable: "--primary".to_owned(),

            proximity: 120.0,
            speed_trigger: 100.0,
            max_speed: 5000.0,
            throttle_ms: 50.0,

            shock_radius: 200.0,
            shock_strength: 3.0,

            resistance: 750.0,
            return_duration: 1.5,
            retrigger: RetriggerPolicy::Ignore,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SettingsError {
    #[error("{name} must be a finite number, got {value}")]
    NotFinite { name: &'static str, value: f32 },

    #[error("{name} must be greater than zero, got {value}")]
    NotPositive { name: &'static str, value: f32 },

    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f32 },
}

impl DotGridSettings {
    /// Small dense dots with a strong shockwave, used behind the account pages.
    pub fn backdrop() -> Self {
        Self {
            dot_size: 5.0,
            gap: 12.0,
            shock_radius: 310.0,
            shock_strength: 5.0,
            ..default()
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let positive = [
            ("dot_size", self.dot_size),
            ("max_speed", self.max_speed),
            ("resistance", self.resistance),
            ("return_duration", self.return_duration),
        ];
        let non_negative = [
            ("gap", self.gap),
            ("proximity", self.proximity),
            ("speed_trigger", self.speed_trigger),
            ("throttle_ms", self.throttle_ms),
            ("shock_radius", self.shock_radius),
            ("shock_strength", self.shock_strength),
        ];

        for (name, value) in positive.into_iter().chain(non_negative) {
            if !value.is_finite() {
                return Err(SettingsError::NotFinite { name, value });
            }
        }
        if let Some((name, value)) = positive.into_iter().find(|(_, value)| *value <= 0.0) {
            return Err(SettingsError::NotPositive { name, value });
        }
        if let Some((name, value)) = non_negative.into_iter().find(|(_, value)| *value < 0.0) {
            return Err(SettingsError::Negative { name, value });
        }
        Ok(())
    }

    /// Throttle interval in seconds.
    pub fn throttle_secs(&self) -> f64 {
        f64::from(self.throttle_ms) / 1000.0
    }

    /// Settings handed over by the host page as `window.dotGridSettings`, defaults otherwise.
    #[cfg(target_arch = "wasm32")]
    pub fn from_host_page() -> Self {
        let Some(object) = web_sys::window().and_then(|window| window.get("dotGridSettings"))
        else {
            return Self::default();
        };
        let value: wasm_bindgen::JsValue = object.into();

        match serde_wasm_bindgen::from_value(value) {
            Ok(settings) => settings,
            Err(err) => {
                warn!("Ignoring window.dotGridSettings: {err}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(DotGridSettings::default().validate(), Ok(()), "default");
        assert_eq!(DotGridSettings::backdrop().validate(), Ok(()), "backdrop");
    }

    #[rstest]
    #[case::zero_dot(DotGridSettings { dot_size: 0.0, ..default() }, "dot_size")]
    #[case::nan_dot(DotGridSettings { dot_size: f32::NAN, ..default() }, "dot_size")]
    #[case::negative_gap(DotGridSettings { gap: -1.0, ..default() }, "gap")]
    #[case::no_resistance(DotGridSettings { resistance: 0.0, ..default() }, "resistance")]
    #[case::infinite_radius(DotGridSettings { shock_radius: f32::INFINITY, ..default() }, "shock_radius")]
    #[case::instant_return(DotGridSettings { return_duration: 0.0, ..default() }, "return_duration")]
    fn invalid_settings_name_the_field(#[case] settings: DotGridSettings, #[case] field: &str) {
        let err = settings.validate().err();
        let name = match err {
            Some(
                SettingsError::NotFinite { name, .. }
                | SettingsError::NotPositive { name, .. }
                | SettingsError::Negative { name, .. },
            ) => Some(name),
            None => None,
        };
        assert_eq!(name, Some(field), "rejected field");
    }

    #[test]
    fn throttle_is_converted_to_seconds() {
        let settings = DotGridSettings::default();
        assert!(
            (settings.throttle_secs() - 0.05).abs() < 1e-9,
            "50 ms is 0.05 s"
        );
    }
}
