//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or storage dependencies

pub mod catalog;
pub mod collision;
pub mod entity;
pub mod player;
pub mod spawner;
pub mod state;
pub mod tick;

pub use catalog::{ActorClass, Catalog, ItemEffect, SpawnKind, Template};
pub use collision::{Resolution, classify, overlaps};
pub use entity::{Animation, EnemyState, Entity, EntityId, Role};
pub use player::{Player, PlayerSide, Pose};
pub use spawner::Spawner;
pub use state::{Ability, AbilityDeadlines, GameEvent, GameMode, GameState};
pub use tick::{TickInput, apply_command, autopilot, tick};
