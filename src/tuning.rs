//! Data-driven game balance
//!
//! Defaults reproduce the shipped feel. Any field may be overridden from the
//! `tuning` block of the settings file.

use serde::{Deserialize, Serialize};

use crate::consts::GRAVITY;

/// Smallest animation interval accepted from a settings file
const MIN_FRAME_SECS: f32 = 0.01;
/// Largest walk or bounce speed accepted from a settings file (units/s)
const MAX_SPEED: f32 = 10_000.0;

/// Physics and animation constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Player gravity (units/s², negative pulls down)
    pub gravity: f32,
    /// Fraction of gravity applied to flying goo
    pub goo_gravity_scale: f32,
    /// Maximum horizontal walk speed (units/s)
    pub walk_speed: f32,
    /// Fraction of walk speed shed per tick while grounded with no input
    pub walk_damping: f32,
    /// Airborne acceleration in multiples of walk speed per second
    pub air_accel: f32,
    /// Speed imparted by a goo bounce (units/s)
    pub bounce_height: f32,
    /// How long the shoot pose is held (s)
    pub shoot_pose_secs: f32,
    /// Walk cycle frame interval (s)
    pub walk_frame_secs: f32,
    /// Flying goo frame interval (s)
    pub goo_frame_secs: f32,
    /// Animated tile frame interval (s)
    pub tile_frame_secs: f32,
    /// Spin applied while dead or finished (degrees/s)
    pub spin_rate: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            goo_gravity_scale: 0.5,
            walk_speed: 100.0,
            walk_damping: 0.1,
            air_accel: 3.0,
            bounce_height: 400.0,
            shoot_pose_secs: 0.25,
            walk_frame_secs: 0.25,
            goo_frame_secs: 0.25,
            tile_frame_secs: 0.25,
            spin_rate: 180.0,
        }
    }
}

impl Tuning {
    /// Gravity applied to flying goo
    #[inline]
    pub fn goo_gravity(&self) -> f32 {
        self.gravity * self.goo_gravity_scale
    }

    /// Clamp values that would stall timers or invert controls
    pub fn sanitized(mut self) -> Self {
        for secs in [
            &mut self.shoot_pose_secs,
            &mut self.walk_frame_secs,
            &mut self.goo_frame_secs,
            &mut self.tile_frame_secs,
        ] {
            if !(*secs >= MIN_FRAME_SECS) {
                log::warn!("Animation interval {} too small, using {}", secs, MIN_FRAME_SECS);
                *secs = MIN_FRAME_SECS;
            }
        }
        let defaults = Tuning::default();
        self.walk_speed = clamp_speed(self.walk_speed, defaults.walk_speed);
        self.bounce_height = clamp_speed(self.bounce_height, defaults.bounce_height);
        self.walk_damping = self.walk_damping.clamp(0.0, 1.0);
        self
    }
}

/// Magnitude of `speed` capped at `MAX_SPEED`; non-finite values take `default`
fn clamp_speed(speed: f32, default: f32) -> f32 {
    if !speed.is_finite() {
        log::warn!("Speed {} is not finite, using {}", speed, default);
        return default;
    }
    if speed.abs() > MAX_SPEED {
        log::warn!("Speed {} too large, using {}", speed, MAX_SPEED);
    }
    speed.abs().min(MAX_SPEED)
}
