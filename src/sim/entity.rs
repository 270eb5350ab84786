//! Kinematic bodies shared by every mover in the arena

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::player::Player;
use crate::polar_to_cartesian;

/// Player identifier (1 or 2)
pub type PlayerId = u8;

/// Position, velocity and extent common to players and projectiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Purged by the owning collection at the end of the tick
    pub pending_removal: bool,
}

impl Body {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
            pending_removal: false,
        }
    }

    /// Newtonian step - there is no friction in the arena
    #[inline]
    pub fn integrate(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// How far the body pokes out of a centered circle of `arena_radius`
    #[inline]
    pub fn wall_overlap(&self, arena_radius: f32) -> f32 {
        self.pos.length() + self.radius - arena_radius
    }

    #[inline]
    pub fn overlaps(&self, other: &Body) -> bool {
        self.pos.distance(other.pos) < self.radius + other.radius
    }
}

/// A straight-line laser bolt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub body: Body,
    pub owner: PlayerId,
    /// Travel direction, kept for drawing the bolt
    pub angle: f32,
    pub speed: f32,
}

impl Projectile {
    pub fn new(pos: Vec2, angle: f32, owner: PlayerId, speed: f32, radius: f32) -> Self {
        let mut body = Body::new(pos, radius);
        body.vel = polar_to_cartesian(speed, angle);
        Self {
            body,
            owner,
            angle,
            speed,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.body.integrate(dt);
    }
}

/// Kind tag carried into snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Projectile,
}

/// Borrowed view over any arena entity
#[derive(Debug, Clone, Copy)]
pub enum EntityRef<'a> {
    Player(&'a Player),
    Projectile(&'a Projectile),
}

impl<'a> EntityRef<'a> {
    pub fn body(&self) -> &'a Body {
        match self {
            EntityRef::Player(p) => &p.body,
            EntityRef::Projectile(p) => &p.body,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            EntityRef::Player(_) => EntityKind::Player,
            EntityRef::Projectile(_) => EntityKind::Projectile,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_projectile_flies_straight() {
        let mut proj = Projectile::new(Vec2::ZERO, FRAC_PI_2, 1, 800.0, 5.0);
        proj.update(0.5);
        assert!(proj.body.pos.x.abs() < 1e-3);
        assert!((proj.body.pos.y - 400.0).abs() < 1e-3);
        assert_eq!(proj.owner, 1);
    }

    #[test]
    fn test_wall_overlap() {
        let body = Body::new(Vec2::new(95.0, 0.0), 10.0);
        assert!((body.wall_overlap(100.0) - 5.0).abs() < 1e-5);
        assert!(body.wall_overlap(200.0) < 0.0);
    }

    #[test]
    fn test_entity_ref_dispatch() {
        let proj = Projectile::new(Vec2::new(3.0, 4.0), 0.0, 2, 800.0, 5.0);
        let e = EntityRef::Projectile(&proj);
        assert_eq!(e.kind(), EntityKind::Projectile);
        assert_eq!(e.body().radius, 5.0);
    }
}
