use bevy::math::Vec2;

/// Assumed time since the previous sample when there is none to measure (one 60 Hz frame).
pub const NOMINAL_SAMPLE_SECS: f64 = 0.016;

/// Last known pointer position and velocity, in container pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    pub position: Vec2,
    /// px/s, never longer than the configured maximum speed
    pub velocity: Vec2,
    pub speed: f32,
    last_position: Vec2,
    last_time: Option<f64>,
}

impl PointerState {
    /// Records a sample taken at `now` (seconds) and derives the velocity from the previous one.
    pub fn observe(&mut self, position: Vec2, now: f64, max_speed: f32) {
        let elapsed = self
            .last_time
            .map(|last| now - last)
            .filter(|elapsed| *elapsed > 0.0)
            .unwrap_or(NOMINAL_SAMPLE_SECS);

        let raw = (position - self.last_position) / elapsed as f32;
        let (velocity, speed) = clamp_velocity(raw, max_speed);

        self.last_time = Some(now);
        self.last_position = position;
        self.position = position;
        self.velocity = velocity;
        self.speed = speed;
    }
}

/// Scales `velocity` down to `max_speed` if needed, keeping its direction.
///
/// Returns the velocity and its length.
pub fn clamp_velocity(velocity: Vec2, max_speed: f32) -> (Vec2, f32) {
    let speed = velocity.length();
    if speed > max_speed {
        (velocity * (max_speed / speed), max_speed)
    } else {
        (velocity, speed)
    }
}

/// Drops calls arriving less than `interval` seconds after the last accepted one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Throttle {
    interval: f64,
    last_call: Option<f64>,
}

impl Throttle {
    pub const fn new(interval: f64) -> Self {
        Self {
            interval,
            last_call: None,
        }
    }

    pub fn ready(&mut self, now: f64) -> bool {
        let ready = self
            .last_call
            .is_none_or(|last| now - last >= self.interval);
        if ready {
            self.last_call = Some(now);
        }
        ready
    }
}
