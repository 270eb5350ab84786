//! Read-only per-tick view for renderers and UI
//!
//! Plain data with no references back into the simulation, so a frontend can
//! keep it around, diff it, or ship it over a channel as JSON.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{EntityRef, PlayerId};
use super::player::{ColorTag, ControlSource, Player};
use super::state::{GamePhase, GameState, Score};
use crate::tuning::Tuning;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub color: ColorTag,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub facing: f32,
    pub hp: u8,
    pub max_hp: u8,
    /// Heat as the cannon meter shows it
    pub overheat: f32,
    pub is_overheated: bool,
    pub can_shoot: bool,
    /// Draw the crown
    pub is_winner: bool,
    pub control: ControlSource,
}

impl PlayerView {
    fn from_player(player: &Player, tuning: &Tuning) -> Self {
        Self {
            id: player.id,
            color: player.color,
            pos: player.body.pos,
            vel: player.body.vel,
            radius: player.body.radius,
            facing: player.facing,
            hp: player.hp,
            max_hp: tuning.max_hp,
            overheat: player.display_overheat(tuning),
            is_overheated: player.is_overheated,
            can_shoot: player.can_shoot,
            is_winner: player.is_winner,
            control: player.control,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Fill level for the health bar
    pub fn health_fraction(&self) -> f32 {
        if self.max_hp == 0 {
            0.0
        } else {
            self.hp as f32 / self.max_hp as f32
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileView {
    pub owner: PlayerId,
    pub pos: Vec2,
    pub radius: f32,
    pub angle: f32,
}

/// Everything a frontend needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub arena_radius: f32,
    pub match_clock: f32,
    pub round_end_clock: f32,
    pub game_end_clock: f32,
    pub banner_clock: f32,
    pub round: u32,
    pub score: Score,
    pub last_round_winner: Option<PlayerId>,
    pub match_winner: Option<PlayerId>,
    pub is_tiebreaker: bool,
    pub players: Vec<PlayerView>,
    pub projectiles: Vec<ProjectileView>,
}

impl Snapshot {
    /// Match timer as `mm:ss`, never negative
    pub fn clock_label(&self) -> String {
        let secs = self.match_clock.max(0.0) as u32;
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }

    pub fn player(&self, id: PlayerId) -> Option<&PlayerView> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Show the "TIEBREAKER" banner
    pub fn banner_visible(&self) -> bool {
        self.phase == GamePhase::Tiebreaker && self.banner_clock > 0.0
    }
}

impl GameState {
    pub fn snapshot(&self) -> Snapshot {
        let mut players = Vec::with_capacity(self.players.len());
        let mut projectiles = Vec::with_capacity(self.projectiles.len());

        for entity in self.entities() {
            let body = entity.body();
            match entity {
                EntityRef::Player(p) => players.push(PlayerView::from_player(p, &self.tuning)),
                EntityRef::Projectile(p) => projectiles.push(ProjectileView {
                    owner: p.owner,
                    pos: body.pos,
                    radius: body.radius,
                    angle: p.angle,
                }),
            }
        }

        Snapshot {
            phase: self.phase,
            arena_radius: self.arena_radius,
            match_clock: self.match_clock,
            round_end_clock: self.round_end_clock,
            game_end_clock: self.game_end_clock,
            banner_clock: self.banner_clock,
            round: self.round,
            score: self.score,
            last_round_winner: self.last_round_winner,
            match_winner: self.match_winner,
            is_tiebreaker: self.is_tiebreaker,
            players,
            projectiles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MatchConfig;

    #[test]
    fn test_snapshot_mirrors_state() {
        let mut state = GameState::new(1);
        state.start_match(MatchConfig::default()).unwrap();
        state.players[0].hp = 4;

        let snap = state.snapshot();
        assert_eq!(snap.phase, GamePhase::Playing);
        assert_eq!(snap.players.len(), 2);
        let p1 = snap.player(1).unwrap();
        assert_eq!(p1.color, ColorTag::Red);
        assert!((p1.health_fraction() - 0.4).abs() < 1e-6);
        assert!(snap.projectiles.is_empty());
    }

    #[test]
    fn test_meter_hidden_while_draining() {
        let mut state = GameState::new(1);
        state.start_match(MatchConfig::default()).unwrap();
        state.players[0].overheat = 0.3;
        state.players[0].time_since_last_shot = 1.0;

        let snap = state.snapshot();
        assert_eq!(snap.player(1).unwrap().overheat, 0.0);
        assert!((state.players[0].overheat - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_clock_label() {
        let mut state = GameState::new(1);
        state.start_match(MatchConfig::default()).unwrap();
        state.match_clock = 75.9;
        assert_eq!(state.snapshot().clock_label(), "01:15");
        state.match_clock = -2.0;
        assert_eq!(state.snapshot().clock_label(), "00:00");
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut state = GameState::new(1);
        state.start_match(MatchConfig::default()).unwrap();
        let json = serde_json::to_string(&state.snapshot()).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.players.len(), 2);
    }
}
