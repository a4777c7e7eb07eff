use bevy::math::Vec2;

use crate::canvas::DotCanvas;
use crate::color::{Rgb, ThemeColors};
use crate::displacement::{Motion, VELOCITY_PUSH_SCALE};
use crate::lattice::Lattice;
use crate::pointer::{PointerState, Throttle};
use crate::settings::{DotGridSettings, SettingsError};

/// Outcome of checking whether a grid can run with the given settings.
#[derive(Debug, Clone, PartialEq)]
pub enum Capability {
    Supported(DotGrid),
    Unsupported(SettingsError),
}

/// The whole grid: lattice, pointer tracking, colors and per-dot motion.
///
/// Host agnostic. The Bevy systems feed it window sizes, pointer samples,
/// clicks and frame times, and hand it a canvas to paint.
#[derive(Debug, Clone, PartialEq)]
pub struct DotGrid {
    settings: DotGridSettings,
    lattice: Lattice,
    pointer: PointerState,
    throttle: Throttle,
    colors: ThemeColors,
    motion: Motion,
}

impl DotGrid {
    pub fn probe(settings: DotGridSettings, colors: ThemeColors) -> Capability {
        if let Err(err) = settings.validate() {
            return Capability::Unsupported(err);
        }

        Capability::Supported(Self {
            throttle: Throttle::new(settings.throttle_secs()),
            motion: Motion {
                resistance: settings.resistance,
                return_duration: settings.return_duration,
            },
            lattice: Lattice::default(),
            pointer: PointerState::default(),
            colors,
            settings,
        })
    }

    pub const fn settings(&self) -> &DotGridSettings {
        &self.settings
    }

    pub const fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub const fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub const fn colors(&self) -> &ThemeColors {
        &self.colors
    }

    pub fn set_colors(&mut self, colors: ThemeColors) {
        self.colors = colors;
    }

    /// Rebuilds the lattice and the canvas for a new container size.
    ///
    /// Returns `false` and keeps everything as is while the container has no area.
    pub fn resize(&mut self, size: Vec2, scale_factor: f32, canvas: &mut impl DotCanvas) -> bool {
        let Some(lattice) = Lattice::build(size, self.settings.dot_size, self.settings.gap) else {
            tracing::debug!("skipping grid build for a {size} container");
            return false;
        };

        tracing::debug!(
            "grid rebuilt: {} x {} dots for {size} at {scale_factor}x",
            lattice.cols(),
            lattice.rows()
        );
        canvas.resize(size, scale_factor);
        self.lattice = lattice;
        true
    }

    /// Feeds a pointer sample taken at `now` seconds.
    ///
    /// Returns `None` when the sample was throttled, otherwise how many dots were pushed.
    pub fn pointer_moved(&mut self, position: Vec2, now: f64) -> Option<usize> {
        if !self.throttle.ready(now) {
            return None;
        }

        let settings = &self.settings;
        self.pointer.observe(position, now, settings.max_speed);
        let pointer = self.pointer;
        if pointer.speed <= settings.speed_trigger {
            return Some(0);
        }

        let mut pushed = 0;
        for point in self.lattice.points_mut() {
            if !point.accepts_trigger(settings.retrigger)
                || point.rest.distance(pointer.position) >= settings.proximity
            {
                continue;
            }
            let target = point.rest - pointer.position + pointer.velocity * VELOCITY_PUSH_SCALE;
            point.push_towards(target, settings.resistance);
            pushed += 1;
        }
        Some(pushed)
    }

    /// Sends a shockwave from `position`. Returns how many dots were pushed.
    pub fn clicked(&mut self, position: Vec2) -> usize {
        let settings = &self.settings;
        let mut pushed = 0;

        for point in self.lattice.points_mut() {
            let distance = point.rest.distance(position);
            // A dot right under the click has no outward direction to go.
            if distance <= 0.0
                || distance >= settings.shock_radius
                || !point.accepts_trigger(settings.retrigger)
            {
                continue;
            }
            let falloff = shock_falloff(distance, settings.shock_radius);
            let target = (point.rest - position) * settings.shock_strength * falloff;
            point.push_towards(target, settings.resistance);
            pushed += 1;
        }
        pushed
    }

    /// Steps every moving dot by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        let motion = self.motion;
        for point in self.lattice.points_mut() {
            if !point.phase.is_idle() {
                point.step(dt, &motion);
            }
        }
    }

    /// Color of a dot resting at `rest`, blended toward the highlight near the pointer.
    pub fn dot_color(&self, rest: Vec2) -> Rgb {
        let proximity = self.settings.proximity;
        let rest_color = self.colors.rest.rgb;
        if proximity <= 0.0 {
            return rest_color;
        }

        let distance_sq = rest.distance_squared(self.pointer.position);
        if distance_sq > proximity * proximity {
            return rest_color;
        }

        let t = 1.0 - distance_sq.sqrt() / proximity;
        rest_color.lerp(self.colors.highlight.rgb, t)
    }

    pub fn render(&self, canvas: &mut impl DotCanvas) {
        canvas.clear();
        let radius = self.settings.dot_size / 2.0;
        for point in self.lattice.points() {
            canvas.fill_circle(point.position(), radius, self.dot_color(point.rest));
        }
    }
}

/// Share of the full shockwave a dot at `distance` receives.
pub fn shock_falloff(distance: f32, shock_radius: f32) -> f32 {
    (1.0 - distance / shock_radius).max(0.0)
}
