//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (player 1 before player 2, projectiles by spawn)
//! - No rendering, audio or platform dependencies

pub mod ai;
pub mod collision;
pub mod entity;
pub mod input;
pub mod player;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{CollisionReport, CollisionRules, WallContact, resolve};
pub use entity::{Body, EntityKind, EntityRef, PlayerId, Projectile};
pub use input::{GamepadState, PointerState, TickInput};
pub use player::{ColorTag, ControlSource, Intent, Player};
pub use snapshot::{PlayerView, ProjectileView, Snapshot};
pub use state::{GameEvent, GamePhase, GameState, Score};
pub use tick::tick;
