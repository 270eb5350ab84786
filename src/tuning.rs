//! Data-driven game balance
//!
//! Every number that shapes how a duel feels lives here so it can be tweaked
//! from the settings file without touching simulation code.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::SettingsError;

/// Balance values consumed by the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player_radius: f32,
    pub max_hp: u8,
    pub spawn_offset: f32,

    pub projectile_radius: f32,
    pub projectile_speed: f32,
    pub muzzle_offset: f32,

    /// Velocity impulse applied opposite to each shot
    pub recoil_force: f32,
    /// Speed floor for living players
    pub min_speed: f32,

    pub overheat_per_shot: f32,
    pub overheat_cooldown: f32,
    pub drain_delay: f32,
    pub drain_rate: f32,

    pub gamepad_deadzone: f32,
    /// Bernoulli trial per tick, not a cooldown
    pub ai_fire_probability: f64,

    pub round_end_delay: f32,
    pub game_end_delay: f32,
    pub tiebreaker_banner: f32,
    pub arena_viewport_fraction: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_radius: PLAYER_RADIUS,
            max_hp: MAX_HP,
            spawn_offset: SPAWN_OFFSET,

            projectile_radius: PROJECTILE_RADIUS,
            projectile_speed: PROJECTILE_SPEED,
            muzzle_offset: MUZZLE_OFFSET,

            recoil_force: RECOIL_FORCE,
            min_speed: MIN_SPEED,

            overheat_per_shot: OVERHEAT_PER_SHOT,
            overheat_cooldown: OVERHEAT_COOLDOWN,
            drain_delay: DRAIN_DELAY,
            drain_rate: DRAIN_RATE,

            gamepad_deadzone: GAMEPAD_DEADZONE,
            ai_fire_probability: AI_FIRE_PROBABILITY,

            round_end_delay: ROUND_END_DELAY,
            game_end_delay: GAME_END_DELAY,
            tiebreaker_banner: TIEBREAKER_BANNER,
            arena_viewport_fraction: ARENA_VIEWPORT_FRACTION,
        }
    }
}

impl Tuning {
    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let positive = [
            ("player_radius", self.player_radius),
            ("spawn_offset", self.spawn_offset),
            ("projectile_radius", self.projectile_radius),
            ("projectile_speed", self.projectile_speed),
            ("recoil_force", self.recoil_force),
            ("min_speed", self.min_speed),
            ("overheat_per_shot", self.overheat_per_shot),
            ("overheat_cooldown", self.overheat_cooldown),
            ("drain_rate", self.drain_rate),
            ("round_end_delay", self.round_end_delay),
            ("game_end_delay", self.game_end_delay),
            ("arena_viewport_fraction", self.arena_viewport_fraction),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SettingsError::InvalidTuning { field });
            }
        }

        let non_negative = [
            ("muzzle_offset", self.muzzle_offset),
            ("drain_delay", self.drain_delay),
            ("tiebreaker_banner", self.tiebreaker_banner),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SettingsError::InvalidTuning { field });
            }
        }

        if self.max_hp == 0 {
            return Err(SettingsError::InvalidTuning { field: "max_hp" });
        }
        if !(0.0..1.0).contains(&self.gamepad_deadzone) {
            return Err(SettingsError::InvalidTuning {
                field: "gamepad_deadzone",
            });
        }
        if !(0.0..=1.0).contains(&self.ai_fire_probability) {
            return Err(SettingsError::InvalidTuning {
                field: "ai_fire_probability",
            });
        }
        Ok(())
    }

    /// Arena radius for a viewport of the given size, never too small for
    /// both players to spawn clear of the wall
    pub fn arena_radius_for(&self, width: f32, height: f32) -> f32 {
        (width.min(height) * self.arena_viewport_fraction).max(self.min_arena_radius())
    }

    pub fn min_arena_radius(&self) -> f32 {
        2.0 * (self.player_radius + SPAWN_WALL_MARGIN)
    }

    /// Distance from the centre to each spawn point inside `arena_radius`
    pub fn spawn_offset_for(&self, arena_radius: f32) -> f32 {
        self.spawn_offset
            .min(arena_radius - self.player_radius - SPAWN_WALL_MARGIN)
            .max(0.0)
    }
}
