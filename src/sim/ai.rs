//! Computer opponent
//!
//! Tracks the opponent and pulls the trigger on a coin flip each tick.

use rand::Rng;

use super::player::{Intent, Player};
use crate::angle_to;

/// Aim at `opponent` and fire with `fire_probability` per tick.
///
/// Idles when the opponent is dead or missing. Probabilities outside `[0, 1]`
/// saturate, NaN never fires.
pub fn ai_intent<R: Rng>(
    me: &Player,
    opponent: Option<&Player>,
    fire_probability: f64,
    rng: &mut R,
) -> Intent {
    let Some(target) = opponent.filter(|o| o.is_alive()) else {
        return Intent::idle();
    };

    Intent {
        facing: Some(angle_to(me.body.pos, target.body.pos)),
        trigger: !me.is_overheated
            && fire_probability > 0.0
            && rng.random_bool(fire_probability.min(1.0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use crate::sim::player::ControlSource;
    use crate::tuning::Tuning;

    fn pair() -> (Player, Player) {
        let tuning = Tuning::default();
        let ai = Player::new(2, Vec2::new(100.0, 0.0), ControlSource::Ai, &tuning);
        let target = Player::new(1, Vec2::new(-100.0, 0.0), ControlSource::Ai, &tuning);
        (ai, target)
    }

    #[test]
    fn test_faces_opponent() {
        let (ai, target) = pair();
        let mut rng = Pcg32::seed_from_u64(7);
        let intent = ai_intent(&ai, Some(&target), 0.0, &mut rng);
        assert!((intent.facing.unwrap().abs() - std::f32::consts::PI).abs() < 1e-5);
        assert!(!intent.trigger);
    }

    #[test]
    fn test_fire_rate_is_roughly_probability() {
        let (ai, target) = pair();
        let mut rng = Pcg32::seed_from_u64(42);
        let fired = (0..10_000)
            .filter(|_| ai_intent(&ai, Some(&target), 0.02, &mut rng).trigger)
            .count();
        assert!((100..300).contains(&fired), "fired {fired} times");
    }

    #[test]
    fn test_holds_fire_when_overheated_or_target_dead() {
        let (mut ai, mut target) = pair();
        let mut rng = Pcg32::seed_from_u64(1);

        ai.is_overheated = true;
        ai.overheat = 1.0;
        assert!(!ai_intent(&ai, Some(&target), 1.0, &mut rng).trigger);

        ai.is_overheated = false;
        target.hp = 0;
        assert_eq!(ai_intent(&ai, Some(&target), 1.0, &mut rng), Intent::idle());
        assert_eq!(ai_intent(&ai, None, 1.0, &mut rng), Intent::idle());
    }

    #[test]
    fn test_out_of_range_probability_saturates() {
        let (ai, target) = pair();
        let mut rng = Pcg32::seed_from_u64(3);
        assert!(ai_intent(&ai, Some(&target), 1.5, &mut rng).trigger);
        assert!(!ai_intent(&ai, Some(&target), -0.5, &mut rng).trigger);
        assert!(!ai_intent(&ai, Some(&target), f64::NAN, &mut rng).trigger);
    }
}
