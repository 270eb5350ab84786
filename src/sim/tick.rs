//! Fixed timestep simulation tick
//!
//! Core game loop that advances the match deterministically.

use rand::Rng;

use super::ai::ai_intent;
use super::collision::{self, CollisionRules};
use super::input::TickInput;
use super::player::{ControlSource, Intent, Player};
use super::state::{GameEvent, GamePhase, GameState};
use crate::settings::InputDevice;
use crate::tuning::Tuning;

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.phase == GamePhase::Menu {
        return;
    }

    state.time_ticks += 1;

    let second_pad = input.is_controller_connected(2, state.config.p1_input);
    state.poll_second_controller(second_pad);

    match state.phase {
        GamePhase::Menu => {}

        GamePhase::Playing => {
            state.match_clock -= dt;
            if state.match_clock <= 0.0 {
                state.evaluate_game_end();
                return;
            }

            step_arena(state, input, dt, CollisionRules::default());

            if state.alive_count() <= 1 {
                state.end_round();
            }
        }

        GamePhase::RoundEnd => {
            state.round_end_clock -= dt;
            if state.round_end_clock <= 0.0 {
                state.start_next_round();
            }
        }

        GamePhase::Tiebreaker => {
            state.banner_clock = (state.banner_clock - dt).max(0.0);

            step_arena(state, input, dt, CollisionRules { lethal_walls: true });

            if state.alive_count() <= 1 {
                state.end_tiebreaker();
            }
        }

        GamePhase::GameEnd => {
            state.game_end_clock -= dt;
            if state.game_end_clock <= 0.0 {
                state.reset_to_menu();
            }
        }
    }
}

/// Players, then projectiles, then collisions; removals purged last
fn step_arena(state: &mut GameState, input: &TickInput, dt: f32, rules: CollisionRules) {
    let GameState {
        players,
        projectiles,
        events,
        rng,
        tuning,
        config,
        arena_radius,
        ..
    } = state;

    // Sample every control source before anyone moves
    let roster: &[Player] = players;
    let intents: Vec<Intent> = roster
        .iter()
        .map(|p| resolve_intent(p, roster, input, config.p1_input, tuning, rng))
        .collect();

    for (player, intent) in players.iter_mut().zip(intents) {
        if let Some(shot) = player.update(dt, intent, tuning, rng, events) {
            projectiles.push(shot);
        }
    }

    for proj in projectiles.iter_mut() {
        proj.update(dt);
    }
    projectiles.retain(|p| !p.body.pending_removal);

    let report = collision::resolve(players, projectiles, *arena_radius, rules);
    for (target, shooter) in report.hits {
        events.push(GameEvent::PlayerHit { target, shooter });
    }
    for id in report.wall_eliminations {
        log::debug!("P{} left the arena", id);
    }

    projectiles.retain(|p| !p.body.pending_removal);
}

fn resolve_intent<R: Rng>(
    player: &Player,
    players: &[Player],
    input: &TickInput,
    p1_input: InputDevice,
    tuning: &Tuning,
    rng: &mut R,
) -> Intent {
    if !player.is_alive() {
        return Intent::idle();
    }
    match player.control {
        ControlSource::Human(device) => {
            input.human_intent(player, device, p1_input, tuning.gamepad_deadzone)
        }
        ControlSource::Ai => {
            let opponent = players.iter().find(|o| o.id != player.id);
            ai_intent(player, opponent, tuning.ai_fire_probability, rng)
        }
    }
}
