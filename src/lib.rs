//! Xorg Duel - a two-player recoil-driven arena shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, match state machine)
//! - `stepper`: Fixed-timestep accumulator for the host loop
//! - `settings`: Match configuration and persisted preferences
//! - `tuning`: Data-driven game balance
//! - `audio`: Event-to-sound routing for the audio backend

pub mod audio;
pub mod settings;
pub mod sim;
pub mod stepper;
pub mod tuning;

pub use settings::{InputDevice, MatchConfig, Settings, SettingsError};
pub use stepper::FixedStepper;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 15;
    /// Longest frame the stepper will try to catch up on (seconds)
    pub const MAX_FRAME_DT: f32 = 0.25;

    /// Arena radius as a fraction of the smaller viewport dimension
    pub const ARENA_VIEWPORT_FRACTION: f32 = 0.4;
    /// Viewport assumed until the host reports one
    pub const DEFAULT_VIEWPORT: (f32, f32) = (800.0, 600.0);

    /// Player body
    pub const PLAYER_RADIUS: f32 = 20.0;
    pub const MAX_HP: u8 = 10;
    /// Distance from arena center where players spawn each round
    pub const SPAWN_OFFSET: f32 = 150.0;
    /// Minimum gap between a spawned player and the arena wall
    pub const SPAWN_WALL_MARGIN: f32 = 10.0;

    /// Projectiles
    pub const PROJECTILE_RADIUS: f32 = 5.0;
    pub const PROJECTILE_SPEED: f32 = 800.0;
    /// Extra distance past the player's edge where shots appear
    pub const MUZZLE_OFFSET: f32 = 10.0;

    /// Movement - recoil is the only source of acceleration
    pub const RECOIL_FORCE: f32 = 150.0;
    /// Nothing alive ever moves slower than this (pixels/s)
    pub const MIN_SPEED: f32 = 50.0;

    /// Overheat
    pub const OVERHEAT_PER_SHOT: f32 = 0.08;
    /// Seconds to cool from fully overheated back to zero
    pub const OVERHEAT_COOLDOWN: f32 = 3.0;
    /// Seconds without shooting before heat starts draining
    pub const DRAIN_DELAY: f32 = 0.5;
    /// Heat drained per second once the drain delay has passed
    pub const DRAIN_RATE: f32 = 0.5;

    /// Gamepad stick deadzone (per axis)
    pub const GAMEPAD_DEADZONE: f32 = 0.2;
    /// Chance per tick that the AI pulls the trigger (~1.2 shots/s at 60 Hz)
    pub const AI_FIRE_PROBABILITY: f64 = 0.02;

    /// Match timing (seconds)
    pub const DEFAULT_MATCH_DURATION: f32 = 60.0;
    pub const ROUND_END_DELAY: f32 = 2.0;
    pub const GAME_END_DELAY: f32 = 4.0;
    pub const TIEBREAKER_BANNER: f32 = 3.0;

    /// Number of gamepad slots the input snapshot carries
    pub const MAX_GAMEPADS: usize = 4;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Angle of the vector pointing from `from` to `to`
#[inline]
pub fn angle_to(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}
