//! Player combatant
//!
//! Movement comes only from recoil: every shot kicks the player backwards and
//! there is no friction, so momentum persists until a wall, the other player
//! or another shot changes it. A speed floor keeps everyone moving.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{Body, PlayerId, Projectile};
use super::state::GameEvent;
use crate::{normalize_angle, polar_to_cartesian};
use crate::settings::InputDevice;
use crate::tuning::Tuning;

/// Who is steering a player this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlSource {
    Human(InputDevice),
    Ai,
}

/// Colour tag handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorTag {
    Red,
    Blue,
}

impl ColorTag {
    pub fn for_player(id: PlayerId) -> Self {
        if id == 1 { ColorTag::Red } else { ColorTag::Blue }
    }
}

/// Aim and trigger state resolved from a control source for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Intent {
    /// New facing angle; `None` keeps the last one
    pub facing: Option<f32>,
    /// Trigger held (humans fire on the rising edge, the AI fires whenever set)
    pub trigger: bool,
}

impl Intent {
    pub fn idle() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub color: ColorTag,
    pub body: Body,
    pub hp: u8,
    /// Facing angle in radians
    pub facing: f32,

    /// Heat accumulator in [0, 1]
    pub overheat: f32,
    pub is_overheated: bool,
    pub time_since_last_shot: f32,
    pub can_shoot: bool,

    /// Crown marker
    pub is_winner: bool,
    /// Projectile damage is ignored while set
    pub invulnerable: bool,
    pub control: ControlSource,
    trigger_held: bool,
}

impl Player {
    pub fn new(id: PlayerId, pos: Vec2, control: ControlSource, tuning: &Tuning) -> Self {
        Self {
            id,
            color: ColorTag::for_player(id),
            body: Body::new(pos, tuning.player_radius),
            hp: tuning.max_hp,
            facing: 0.0,
            overheat: 0.0,
            is_overheated: false,
            time_since_last_shot: 0.0,
            can_shoot: true,
            is_winner: false,
            invulnerable: false,
            control,
            trigger_held: false,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn is_ai(&self) -> bool {
        self.control == ControlSource::Ai
    }

    /// Advance one tick. Returns the projectile fired this tick, if any.
    pub fn update<R: Rng>(
        &mut self,
        dt: f32,
        intent: Intent,
        tuning: &Tuning,
        rng: &mut R,
        events: &mut Vec<GameEvent>,
    ) -> Option<Projectile> {
        if !self.is_alive() {
            return None;
        }

        if let Some(facing) = intent.facing {
            self.facing = normalize_angle(facing);
        }

        let fire = match self.control {
            ControlSource::Ai => intent.trigger,
            ControlSource::Human(_) => intent.trigger && !self.trigger_held,
        };
        self.trigger_held = intent.trigger;

        let shot = if fire { self.shoot(tuning, events) } else { None };

        self.body.integrate(dt);
        self.cool_down(dt, tuning);
        self.enforce_min_speed(tuning.min_speed, rng);

        shot
    }

    /// Fire one projectile along the facing angle and take the recoil.
    ///
    /// Silently does nothing while dead, disarmed or overheated.
    pub fn shoot(&mut self, tuning: &Tuning, events: &mut Vec<GameEvent>) -> Option<Projectile> {
        if !self.is_alive() || !self.can_shoot || self.is_overheated {
            return None;
        }

        let spawn = self.body.pos
            + polar_to_cartesian(self.body.radius + tuning.muzzle_offset, self.facing);
        let projectile = Projectile::new(
            spawn,
            self.facing,
            self.id,
            tuning.projectile_speed,
            tuning.projectile_radius,
        );

        // Recoil stacks on top of whatever momentum we already have
        self.body.vel -= polar_to_cartesian(tuning.recoil_force, self.facing);

        self.overheat += tuning.overheat_per_shot;
        self.time_since_last_shot = 0.0;
        events.push(GameEvent::ShotFired { player: self.id });

        if self.overheat >= 1.0 {
            self.overheat = 1.0;
            self.is_overheated = true;
            events.push(GameEvent::Overheated { player: self.id });
        }

        Some(projectile)
    }

    /// Returns true if the damage landed
    pub fn take_damage(&mut self, amount: u8) -> bool {
        if self.invulnerable || !self.is_alive() {
            return false;
        }
        self.hp = self.hp.saturating_sub(amount);
        true
    }

    /// Hand control to the AI; position, hp and heat carry over
    pub fn switch_to_ai(&mut self) {
        self.control = ControlSource::Ai;
        self.trigger_held = false;
    }

    pub fn switch_to_human(&mut self, device: InputDevice) {
        self.control = ControlSource::Human(device);
        // Treat a button already down at join time as held, not as a fresh press
        self.trigger_held = true;
    }

    /// Heat level as the HUD shows it: hidden while passively draining
    pub fn display_overheat(&self, tuning: &Tuning) -> f32 {
        if !self.is_overheated && self.time_since_last_shot > tuning.drain_delay {
            0.0
        } else {
            self.overheat
        }
    }

    /// Restore the start-of-round state at `pos`
    pub fn reset(&mut self, pos: Vec2, facing: f32, hp: u8) {
        self.body.pos = pos;
        self.body.vel = Vec2::ZERO;
        self.body.pending_removal = false;
        self.facing = facing;
        self.hp = hp;
        self.overheat = 0.0;
        self.is_overheated = false;
        self.time_since_last_shot = 0.0;
        self.can_shoot = true;
        self.invulnerable = false;
        self.trigger_held = false;
    }

    fn cool_down(&mut self, dt: f32, tuning: &Tuning) {
        self.time_since_last_shot += dt;

        if self.is_overheated {
            self.overheat -= dt / tuning.overheat_cooldown;
            if self.overheat <= 0.0 {
                self.overheat = 0.0;
                self.is_overheated = false;
            }
        } else if self.time_since_last_shot > tuning.drain_delay && self.overheat > 0.0 {
            self.overheat = (self.overheat - tuning.drain_rate * dt).max(0.0);
        }
    }

    fn enforce_min_speed<R: Rng>(&mut self, min_speed: f32, rng: &mut R) {
        if self.body.speed() >= min_speed {
            return;
        }
        self.body.vel = match self.body.vel.try_normalize() {
            Some(dir) => dir * min_speed,
            None => polar_to_cartesian(min_speed, rng.random_range(0.0..TAU)),
        };
    }
}
