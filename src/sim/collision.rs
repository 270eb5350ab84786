//! Collision detection and response
//!
//! Everything in the arena is a circle: players bounce off the round wall and
//! off each other, projectiles die on the wall or on the first enemy they touch.
//! Resolution runs once per tick in a fixed order (walls, player pairs,
//! projectiles) and never removes anything itself; it only flags.

use glam::Vec2;

use super::entity::{Body, PlayerId, Projectile};
use super::player::Player;

/// Normal used when two centers coincide and no direction can be measured
const FALLBACK_NORMAL: Vec2 = Vec2::X;

/// Contact between a body and the arena wall
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallContact {
    /// Outward normal at the contact point
    pub normal: Vec2,
    /// How far past the wall the body reaches
    pub penetration: f32,
}

/// Rules that change with the match phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionRules {
    /// Touching the wall eliminates a player (tiebreaker)
    pub lethal_walls: bool,
}

/// What the resolver did this tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionReport {
    /// (target, shooter) for every projectile hit that dealt damage
    pub hits: Vec<(PlayerId, PlayerId)>,
    /// Players eliminated by a lethal wall
    pub wall_eliminations: Vec<PlayerId>,
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Check a body against the circular arena wall centered on the origin
pub fn wall_contact(body: &Body, arena_radius: f32) -> Option<WallContact> {
    let dist = body.pos.length();
    let penetration = dist + body.radius - arena_radius;
    if penetration <= 0.0 {
        return None;
    }
    let normal = if dist > 0.0 {
        body.pos / dist
    } else {
        FALLBACK_NORMAL
    };
    Some(WallContact {
        normal,
        penetration,
    })
}

/// Push a body back inside the arena, reflecting it only if it is still
/// heading outward. Returns the contact if there was one.
pub fn contain_in_arena(body: &mut Body, arena_radius: f32) -> Option<WallContact> {
    let contact = wall_contact(body, arena_radius)?;
    body.pos -= contact.normal * contact.penetration;
    if body.vel.dot(contact.normal) > 0.0 {
        body.vel = reflect_velocity(body.vel, contact.normal);
    }
    Some(contact)
}

/// 1-D elastic collision along `normal`, tangential components untouched.
///
/// Returns the post-collision velocities of both bodies.
pub fn elastic_exchange(v1: Vec2, v2: Vec2, normal: Vec2, m1: f32, m2: f32) -> (Vec2, Vec2) {
    let tangent = normal.perp();

    let tan1 = v1.dot(tangent);
    let tan2 = v2.dot(tangent);
    let norm1 = v1.dot(normal);
    let norm2 = v2.dot(normal);

    let new_norm1 = (norm1 * (m1 - m2) + 2.0 * m2 * norm2) / (m1 + m2);
    let new_norm2 = (norm2 * (m2 - m1) + 2.0 * m1 * norm1) / (m1 + m2);

    (
        tangent * tan1 + normal * new_norm1,
        tangent * tan2 + normal * new_norm2,
    )
}

/// Separate two overlapping bodies and bounce them off each other (equal mass).
/// Returns true if they were in contact.
pub fn resolve_body_pair(a: &mut Body, b: &mut Body) -> bool {
    let delta = b.pos - a.pos;
    let dist = delta.length();
    let min_dist = a.radius + b.radius;
    if dist >= min_dist {
        return false;
    }

    let normal = if dist > 0.0 {
        delta / dist
    } else {
        FALLBACK_NORMAL
    };
    let half_overlap = (min_dist - dist) * 0.5;
    a.pos -= normal * half_overlap;
    b.pos += normal * half_overlap;

    let (va, vb) = elastic_exchange(a.vel, b.vel, normal, 1.0, 1.0);
    a.vel = va;
    b.vel = vb;
    true
}

/// Run one tick of collision resolution over the active collections
pub fn resolve(
    players: &mut [Player],
    projectiles: &mut [Projectile],
    arena_radius: f32,
    rules: CollisionRules,
) -> CollisionReport {
    let mut report = CollisionReport::default();

    // 1. Wall containment
    for player in players.iter_mut() {
        if wall_contact(&player.body, arena_radius).is_none() {
            continue;
        }
        if rules.lethal_walls && player.is_alive() {
            player.hp = 0;
            report.wall_eliminations.push(player.id);
        }
        contain_in_arena(&mut player.body, arena_radius);
    }

    // 2. Player-player contact, every unordered living pair
    for i in 0..players.len() {
        let (head, tail) = players.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            if a.is_alive() && b.is_alive() {
                resolve_body_pair(&mut a.body, &mut b.body);
            }
        }
    }

    // 3. Projectiles: wall first, then the first enemy they overlap
    for proj in projectiles.iter_mut() {
        if proj.body.pending_removal {
            continue;
        }
        if wall_contact(&proj.body, arena_radius).is_some() {
            proj.body.pending_removal = true;
            continue;
        }
        let target = players
            .iter_mut()
            .find(|p| p.id != proj.owner && p.is_alive() && p.body.overlaps(&proj.body));
        if let Some(target) = target {
            proj.body.pending_removal = true;
            if target.take_damage(1) {
                report.hits.push((target.id, proj.owner));
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::InputDevice;
    use crate::sim::player::ControlSource;
    use crate::tuning::Tuning;

    fn player_at(id: PlayerId, pos: Vec2, vel: Vec2) -> Player {
        let mut p = Player::new(id, pos, ControlSource::Human(InputDevice::Pointer), &Tuning::default());
        p.body.vel = vel;
        p
    }

    #[test]
    fn test_reflect_velocity() {
        // Moving right into a wall whose outward normal points right
        let reflected = reflect_velocity(Vec2::new(100.0, 0.0), Vec2::new(1.0, 0.0));
        assert!((reflected.x - (-100.0)).abs() < 0.001);
        assert!(reflected.y.abs() < 0.001);
    }

    #[test]
    fn test_wall_pushes_back_and_reflects() {
        let mut body = Body::new(Vec2::new(95.0, 0.0), 10.0);
        body.vel = Vec2::new(60.0, 20.0);
        let contact = contain_in_arena(&mut body, 100.0).unwrap();
        assert!((contact.penetration - 5.0).abs() < 1e-4);
        assert!((body.pos.x - 90.0).abs() < 1e-4);
        assert!((body.vel - Vec2::new(-60.0, 20.0)).length() < 1e-4);
    }

    #[test]
    fn test_receding_body_is_moved_not_reflected() {
        let mut body = Body::new(Vec2::new(0.0, -97.0), 10.0);
        body.vel = Vec2::new(5.0, 40.0);
        contain_in_arena(&mut body, 100.0);
        assert!((body.pos.y - (-90.0)).abs() < 1e-4);
        assert_eq!(body.vel, Vec2::new(5.0, 40.0));
    }

    #[test]
    fn test_centered_body_in_tiny_arena_stays_finite() {
        let mut body = Body::new(Vec2::ZERO, 10.0);
        body.vel = Vec2::new(1.0, 0.0);
        contain_in_arena(&mut body, 5.0);
        assert!(body.pos.is_finite());
        assert!(body.vel.is_finite());
    }

    #[test]
    fn test_head_on_collision_swaps_velocities() {
        let mut a = Body::new(Vec2::new(-19.5, 0.0), 20.0);
        let mut b = Body::new(Vec2::new(19.5, 0.0), 20.0);
        a.vel = Vec2::new(100.0, 0.0);
        b.vel = Vec2::new(-100.0, 0.0);

        assert!(resolve_body_pair(&mut a, &mut b));
        assert!((a.vel - Vec2::new(-100.0, 0.0)).length() < 1e-3);
        assert!((b.vel - Vec2::new(100.0, 0.0)).length() < 1e-3);
        assert!((a.pos.distance(b.pos) - 40.0).abs() < 1e-3);
    }

    #[test]
    fn test_glancing_collision_keeps_tangent() {
        let (va, vb) = elastic_exchange(
            Vec2::new(30.0, 70.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            1.0,
            1.0,
        );
        assert!((va - Vec2::new(0.0, 70.0)).length() < 1e-4);
        assert!((vb - Vec2::new(30.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_coincident_players_separate_deterministically() {
        let mut a = Body::new(Vec2::ZERO, 20.0);
        let mut b = Body::new(Vec2::ZERO, 20.0);
        assert!(resolve_body_pair(&mut a, &mut b));
        assert_eq!(a.pos, Vec2::new(-20.0, 0.0));
        assert_eq!(b.pos, Vec2::new(20.0, 0.0));
    }

    #[test]
    fn test_projectile_hits_enemy_once() {
        let mut players = vec![
            player_at(1, Vec2::new(-100.0, 0.0), Vec2::ZERO),
            player_at(2, Vec2::new(100.0, 0.0), Vec2::ZERO),
        ];
        let mut projectiles = vec![Projectile::new(Vec2::new(80.0, 0.0), 0.0, 1, 800.0, 5.0)];

        let report = resolve(&mut players, &mut projectiles, 300.0, CollisionRules::default());
        assert_eq!(report.hits, vec![(2, 1)]);
        assert_eq!(players[1].hp, 9);
        assert!(projectiles[0].body.pending_removal);

        // Already flagged: a second pass must not hurt again
        let report = resolve(&mut players, &mut projectiles, 300.0, CollisionRules::default());
        assert!(report.hits.is_empty());
        assert_eq!(players[1].hp, 9);
    }

    #[test]
    fn test_projectile_ignores_owner() {
        let mut players = vec![player_at(1, Vec2::ZERO, Vec2::ZERO)];
        let mut projectiles = vec![Projectile::new(Vec2::new(10.0, 0.0), 0.0, 1, 800.0, 5.0)];
        resolve(&mut players, &mut projectiles, 300.0, CollisionRules::default());
        assert_eq!(players[0].hp, 10);
        assert!(!projectiles[0].body.pending_removal);
    }

    #[test]
    fn test_wall_claims_projectile_before_player() {
        // Enemy hugging the wall, bolt overlapping both
        let mut players = vec![player_at(2, Vec2::new(279.0, 0.0), Vec2::ZERO)];
        let mut projectiles = vec![Projectile::new(Vec2::new(297.0, 0.0), 0.0, 1, 800.0, 5.0)];
        let report = resolve(&mut players, &mut projectiles, 300.0, CollisionRules::default());
        assert!(projectiles[0].body.pending_removal);
        assert!(report.hits.is_empty());
        assert_eq!(players[0].hp, 10);
    }

    #[test]
    fn test_lethal_walls_eliminate() {
        let mut players = vec![player_at(1, Vec2::new(0.0, 290.0), Vec2::new(0.0, 50.0))];
        let rules = CollisionRules { lethal_walls: true };
        let report = resolve(&mut players, &mut [], 300.0, rules);
        assert_eq!(report.wall_eliminations, vec![1]);
        assert_eq!(players[0].hp, 0);
        assert!(players[0].body.wall_overlap(300.0) <= 1e-3);
    }
}
