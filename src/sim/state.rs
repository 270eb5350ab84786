//! Match state and lifecycle transitions
//!
//! `GameState` owns everything in the arena. Phase changes happen through the
//! methods here; `tick` decides when to call them.

use std::f32::consts::PI;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::contain_in_arena;
use super::entity::{EntityRef, PlayerId, Projectile};
use super::player::{ControlSource, Player};
use crate::consts::DEFAULT_VIEWPORT;
use crate::settings::{InputDevice, MatchConfig, SettingsError};
use crate::tuning::Tuning;

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the host to start a match
    Menu,
    /// Active round
    Playing,
    /// Short pause after a round is decided
    RoundEnd,
    /// Sudden-death, movement-only decider after a drawn match
    Tiebreaker,
    /// Match decided, frozen until the return to menu
    GameEnd,
}

/// Round wins per player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub p1: u32,
    pub p2: u32,
}

impl Score {
    pub fn get(&self, player: PlayerId) -> u32 {
        if player == 1 { self.p1 } else { self.p2 }
    }

    pub fn award(&mut self, player: PlayerId) {
        match player {
            1 => self.p1 += 1,
            _ => self.p2 += 1,
        }
    }

    pub fn is_tied(&self) -> bool {
        self.p1 == self.p2
    }

    /// Player with more round wins, `None` on a tie
    pub fn leader(&self) -> Option<PlayerId> {
        match self.p1.cmp(&self.p2) {
            std::cmp::Ordering::Greater => Some(1),
            std::cmp::Ordering::Less => Some(2),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Notifications for audio and UI. Fire-and-forget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ShotFired { player: PlayerId },
    PlayerHit { target: PlayerId, shooter: PlayerId },
    Overheated { player: PlayerId },
    RoundWon { winner: PlayerId },
    RoundDrawn,
    TiebreakerStarted,
    MatchWon { winner: PlayerId },
    ControllerJoined { player: PlayerId },
    ControllerLeft { player: PlayerId },
    PhaseChanged { from: GamePhase, to: GamePhase },
}

/// Complete match state
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    pub config: MatchConfig,
    pub tuning: Tuning,

    /// Host viewport, drives the arena size
    pub viewport: (f32, f32),
    pub arena_radius: f32,

    /// Seconds left in the match
    pub match_clock: f32,
    /// Seconds left in the round-end pause
    pub round_end_clock: f32,
    /// Seconds left before GameEnd returns to the menu
    pub game_end_clock: f32,
    /// Seconds the tiebreaker banner stays up
    pub banner_clock: f32,

    pub score: Score,
    /// Crown carrier; survives drawn rounds
    pub last_round_winner: Option<PlayerId>,
    pub match_winner: Option<PlayerId>,
    pub is_tiebreaker: bool,
    /// 1-based round counter for the current match
    pub round: u32,
    /// Simulation tick counter
    pub time_ticks: u64,

    /// Always ordered [player 1, player 2] while a match runs
    pub players: Vec<Player>,
    pub projectiles: Vec<Projectile>,
    /// Pending notifications, drained by the host
    pub events: Vec<GameEvent>,

    pub seed: u64,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create a game sitting in the menu
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let (w, h) = DEFAULT_VIEWPORT;
        Self {
            phase: GamePhase::Menu,
            config: MatchConfig::default(),
            arena_radius: tuning.arena_radius_for(w, h),
            tuning,
            viewport: DEFAULT_VIEWPORT,
            match_clock: 0.0,
            round_end_clock: 0.0,
            game_end_clock: 0.0,
            banner_clock: 0.0,
            score: Score::default(),
            last_round_winner: None,
            match_winner: None,
            is_tiebreaker: false,
            round: 0,
            time_ticks: 0,
            players: Vec::new(),
            projectiles: Vec::new(),
            events: Vec::new(),
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Leave the menu and start round one.
    ///
    /// Malformed configs are rejected without touching state; a request
    /// outside the menu is ignored.
    pub fn start_match(&mut self, config: MatchConfig) -> Result<(), SettingsError> {
        config.validate()?;
        self.tuning.validate()?;
        if self.phase != GamePhase::Menu {
            log::debug!("Ignoring match start in {:?}", self.phase);
            return Ok(());
        }

        self.config = config;
        self.score = Score::default();
        self.last_round_winner = None;
        self.match_winner = None;
        self.is_tiebreaker = false;
        self.match_clock = config.match_duration;
        self.round_end_clock = 0.0;
        self.game_end_clock = 0.0;
        self.banner_clock = 0.0;
        self.round = 1;
        self.arena_radius = self.tuning.arena_radius_for(self.viewport.0, self.viewport.1);

        let p2_control = if config.is_single_player() {
            ControlSource::Ai
        } else {
            ControlSource::Human(InputDevice::Gamepad)
        };
        self.players = vec![
            Player::new(1, Vec2::ZERO, ControlSource::Human(config.p1_input), &self.tuning),
            Player::new(2, Vec2::ZERO, p2_control, &self.tuning),
        ];
        self.projectiles.clear();
        self.reset_players(self.tuning.max_hp);

        log::info!(
            "Match started: {} player(s), {:.0}s, P1 on {}",
            config.player_count,
            config.match_duration,
            config.p1_input.as_str()
        );
        self.set_phase(GamePhase::Playing);
        Ok(())
    }

    /// Host window resized; the arena follows the smaller dimension.
    ///
    /// Players caught outside a shrunken wall are pulled back in, never
    /// eliminated by the resize itself.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = (width, height);
        self.arena_radius = self.tuning.arena_radius_for(width, height);
        for player in &mut self.players {
            contain_in_arena(&mut player.body, self.arena_radius);
        }
    }

    /// Explicit cancel back to the menu, honoured between rounds or after the match
    pub fn return_to_menu(&mut self) -> bool {
        match self.phase {
            GamePhase::RoundEnd | GamePhase::GameEnd => {
                self.reset_to_menu();
                true
            }
            _ => {
                log::debug!("Ignoring menu request in {:?}", self.phase);
                false
            }
        }
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn alive_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_alive()).count()
    }

    /// Every entity, players first
    pub fn entities(&self) -> impl Iterator<Item = EntityRef<'_>> {
        self.players
            .iter()
            .map(EntityRef::Player)
            .chain(self.projectiles.iter().map(EntityRef::Projectile))
    }

    pub(crate) fn set_phase(&mut self, to: GamePhase) {
        if self.phase != to {
            self.events.push(GameEvent::PhaseChanged {
                from: self.phase,
                to,
            });
            self.phase = to;
        }
    }

    /// Put both players back on their marks with `hp`
    fn reset_players(&mut self, hp: u8) {
        let offset = self.tuning.spawn_offset_for(self.arena_radius);
        for player in &mut self.players {
            let (pos, facing) = if player.id == 1 {
                (Vec2::new(-offset, 0.0), 0.0)
            } else {
                (Vec2::new(offset, 0.0), PI)
            };
            player.reset(pos, facing, hp);
        }
    }

    /// Decide the round once at most one player stands
    pub(crate) fn end_round(&mut self) {
        let survivor = self.players.iter().find(|p| p.is_alive()).map(|p| p.id);

        match survivor {
            Some(winner) => {
                self.score.award(winner);
                self.last_round_winner = Some(winner);
                for p in &mut self.players {
                    p.is_winner = p.id == winner;
                }
                log::info!(
                    "Round {} won by P{} ({}-{})",
                    self.round,
                    winner,
                    self.score.p1,
                    self.score.p2
                );
                self.events.push(GameEvent::RoundWon { winner });
            }
            None => {
                for p in &mut self.players {
                    p.is_winner = false;
                }
                log::info!("Round {} drawn", self.round);
                self.events.push(GameEvent::RoundDrawn);
            }
        }

        self.round_end_clock = self.tuning.round_end_delay;
        self.set_phase(GamePhase::RoundEnd);
    }

    /// Fresh round: full health, cool guns, empty sky, crown restored
    pub(crate) fn start_next_round(&mut self) {
        self.projectiles.clear();
        self.reset_players(self.tuning.max_hp);
        let crown = self.last_round_winner;
        for p in &mut self.players {
            p.is_winner = Some(p.id) == crown;
        }
        self.round += 1;
        self.set_phase(GamePhase::Playing);
    }

    /// The match clock ran out
    pub(crate) fn evaluate_game_end(&mut self) {
        self.match_clock = 0.0;
        match self.score.leader() {
            Some(winner) => self.end_match(winner),
            None => self.start_tiebreaker(),
        }
    }

    /// One life each, no guns, the wall kills
    pub(crate) fn start_tiebreaker(&mut self) {
        self.is_tiebreaker = true;
        self.projectiles.clear();
        self.reset_players(1);
        for p in &mut self.players {
            p.can_shoot = false;
            p.invulnerable = true;
            p.is_winner = false;
        }
        self.banner_clock = self.tuning.tiebreaker_banner;
        log::info!("Scores tied {}-{}: tiebreaker", self.score.p1, self.score.p2);
        self.events.push(GameEvent::TiebreakerStarted);
        self.set_phase(GamePhase::Tiebreaker);
    }

    /// Decide the tiebreaker once at most one player stands
    pub(crate) fn end_tiebreaker(&mut self) {
        match self.players.iter().find(|p| p.is_alive()).map(|p| p.id) {
            Some(winner) => self.end_match(winner),
            // Both left the arena on the same tick: go again
            None => self.start_tiebreaker(),
        }
    }

    pub(crate) fn end_match(&mut self, winner: PlayerId) {
        self.match_winner = Some(winner);
        for p in &mut self.players {
            p.is_winner = p.id == winner;
        }
        self.game_end_clock = self.tuning.game_end_delay;
        log::info!(
            "Match won by P{} ({}-{}{})",
            winner,
            self.score.p1,
            self.score.p2,
            if self.is_tiebreaker { ", tiebreaker" } else { "" }
        );
        self.events.push(GameEvent::MatchWon { winner });
        self.set_phase(GamePhase::GameEnd);
    }

    /// Wipe the match and go back to the menu
    pub(crate) fn reset_to_menu(&mut self) {
        self.players.clear();
        self.projectiles.clear();
        self.score = Score::default();
        self.last_round_winner = None;
        self.match_winner = None;
        self.is_tiebreaker = false;
        self.match_clock = 0.0;
        self.round_end_clock = 0.0;
        self.game_end_clock = 0.0;
        self.banner_clock = 0.0;
        self.round = 0;
        self.arena_radius = self.tuning.arena_radius_for(self.viewport.0, self.viewport.1);
        self.set_phase(GamePhase::Menu);
    }

    /// Single-player only: hand player 2 to a newly connected pad, or back
    /// to the AI when that pad goes away
    pub(crate) fn poll_second_controller(&mut self, present: bool) {
        if !self.config.is_single_player() {
            return;
        }
        let Some(p2) = self.player_mut(2) else {
            return;
        };
        match (present, p2.control) {
            (true, ControlSource::Ai) => {
                p2.switch_to_human(InputDevice::Gamepad);
                log::info!("Controller connected: P2 is now human");
                self.events.push(GameEvent::ControllerJoined { player: 2 });
            }
            (false, ControlSource::Human(_)) => {
                p2.switch_to_ai();
                log::info!("Controller disconnected: P2 handed to AI");
                self.events.push(GameEvent::ControllerLeft { player: 2 });
            }
            _ => {}
        }
    }
}
