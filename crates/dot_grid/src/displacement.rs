//! Per-dot push and elastic return.
//!
//! Every dot runs its own `Idle -> Displacing -> Returning -> Idle` cycle,
//! stepped by the same per-frame pass that renders it. The push glides to its
//! target with constant deceleration set by the resistance, then the dot
//! springs back to its slot with an elastic overshoot.

use bevy::math::Vec2;

use crate::easing::{elastic_out, glide_out};
use crate::lattice::LatticePoint;
use crate::settings::RetriggerPolicy;

/// Share of the pointer velocity added to a push, biases dots along the direction of travel.
pub const VELOCITY_PUSH_SCALE: f32 = 0.005;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum DotPhase {
    #[default]
    Idle,
    Displacing {
        start: Vec2,
        target: Vec2,
        elapsed: f32,
        duration: f32,
    },
    Returning {
        from: Vec2,
        elapsed: f32,
    },
}

impl DotPhase {
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub const fn is_displacing(&self) -> bool {
        matches!(self, Self::Displacing { .. })
    }

    pub const fn is_returning(&self) -> bool {
        matches!(self, Self::Returning { .. })
    }
}

/// Motion parameters shared by every dot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    /// px/s², must be positive
    pub resistance: f32,
    /// seconds, must be positive
    pub return_duration: f32,
}

/// Time for a constant-deceleration glide over `distance` to come to rest.
pub fn glide_duration(distance: f32, resistance: f32) -> f32 {
    (2.0 * distance / resistance).sqrt()
}

impl LatticePoint {
    pub const fn accepts_trigger(&self, policy: RetriggerPolicy) -> bool {
        match policy {
            RetriggerPolicy::Ignore => self.phase.is_idle(),
            RetriggerPolicy::Restart => true,
        }
    }

    /// Starts a push from the current offset toward `target`.
    pub fn push_towards(&mut self, target: Vec2, resistance: f32) {
        let start = self.offset;
        self.phase = DotPhase::Displacing {
            start,
            target,
            elapsed: 0.0,
            duration: glide_duration(start.distance(target), resistance),
        };
    }

    /// Advances the dot by `dt` seconds, carrying leftover time from the push into the return.
    pub fn step(&mut self, dt: f32, motion: &Motion) {
        let mut carry = dt;

        if let DotPhase::Displacing {
            start,
            target,
            elapsed,
            duration,
        } = self.phase
        {
            let elapsed = elapsed + carry;
            if elapsed < duration {
                self.offset = start + (target - start) * glide_out(elapsed / duration);
                self.phase = DotPhase::Displacing {
                    start,
                    target,
                    elapsed,
                    duration,
                };
                return;
            }

            carry = elapsed - duration;
            self.offset = target;
            self.phase = DotPhase::Returning {
                from: target,
                elapsed: 0.0,
            };
        }

        if let DotPhase::Returning { from, elapsed } = self.phase {
            let elapsed = elapsed + carry;
            if elapsed >= motion.return_duration {
                self.offset = Vec2::ZERO;
                self.phase = DotPhase::Idle;
            } else {
                self.offset = from * (1.0 - elastic_out(elapsed / motion.return_duration));
                self.phase = DotPhase::Returning { from, elapsed };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOTION: Motion = Motion {
        resistance: 750.0,
        return_duration: 1.5,
    };

    fn run(point: &mut LatticePoint, seconds: f32) {
        let frames = (seconds * 60.0).ceil() as usize;
        for _ in 0..frames {
            point.step(1.0 / 60.0, &MOTION);
        }
    }

    #[test]
    fn higher_resistance_settles_faster() {
        assert!(
            glide_duration(100.0, 1500.0) < glide_duration(100.0, 750.0),
            "stiffer glide is shorter"
        );
        assert!(glide_duration(0.0, 750.0).abs() < f32::EPSILON, "nothing to travel");
    }

    #[test]
    fn push_reaches_target_then_returns_to_rest() {
        let mut point = LatticePoint::new(Vec2::new(50.0, 50.0));
        let target = Vec2::new(30.0, -40.0);
        point.push_towards(target, MOTION.resistance);
        let push = glide_duration(target.length(), MOTION.resistance);

        point.step(push * 0.5, &MOTION);
        assert!(point.phase.is_displacing(), "still pushing halfway");
        assert!(point.offset.length() > 0.0, "moved off its slot");
        assert!(point.offset.length() < target.length(), "not there yet");

        point.step(push * 0.5 + 1e-4, &MOTION);
        assert!(point.phase.is_returning(), "push done");

        run(&mut point, MOTION.return_duration);
        assert!(point.phase.is_idle(), "back to idle");
        assert_eq!(point.offset, Vec2::ZERO, "exactly in its slot");
        assert_eq!(point.position(), point.rest, "drawn at rest");
    }

    #[test]
    fn return_overshoots_the_slot() {
        let mut point = LatticePoint::new(Vec2::ZERO);
        point.phase = DotPhase::Returning {
            from: Vec2::new(100.0, 0.0),
            elapsed: 0.0,
        };
        point.offset = Vec2::new(100.0, 0.0);

        let mut min_x = f32::MAX;
        while !point.phase.is_idle() {
            point.step(1.0 / 60.0, &MOTION);
            min_x = min_x.min(point.offset.x);
        }
        assert!(min_x < 0.0, "swings past the slot before settling");
    }

    #[test]
    fn zero_length_push_goes_straight_to_return() {
        let mut point = LatticePoint::new(Vec2::ZERO);
        point.push_towards(Vec2::ZERO, MOTION.resistance);
        point.step(0.0, &MOTION);
        assert!(point.phase.is_returning(), "no glide to perform");
    }

    #[test]
    fn policy_decides_mid_flight_triggers() {
        let mut point = LatticePoint::new(Vec2::ZERO);
        assert!(point.accepts_trigger(RetriggerPolicy::Ignore), "idle accepts");

        point.push_towards(Vec2::new(10.0, 0.0), MOTION.resistance);
        assert!(!point.accepts_trigger(RetriggerPolicy::Ignore), "busy ignores");
        assert!(point.accepts_trigger(RetriggerPolicy::Restart), "busy restarts");

        point.step(glide_duration(10.0, MOTION.resistance) + 0.01, &MOTION);
        assert!(point.phase.is_returning(), "push over");
        assert!(!point.accepts_trigger(RetriggerPolicy::Ignore), "returning ignores");
        assert!(point.accepts_trigger(RetriggerPolicy::Restart), "returning restarts");
    }

    #[test]
    fn restart_begins_from_current_offset() {
        let mut point = LatticePoint::new(Vec2::ZERO);
        point.push_towards(Vec2::new(100.0, 0.0), MOTION.resistance);
        point.step(0.1, &MOTION);
        let current = point.offset;

        point.push_towards(Vec2::new(0.0, 100.0), MOTION.resistance);
        let DotPhase::Displacing { start, .. } = point.phase else {
            panic!("expected a fresh push");
        };
        assert_eq!(start, current, "no jump on restart");
    }
}
