//! Soul Hunter - an endless two-platform survival runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, collisions, game state)
//! - `game`: Session shell wiring the simulation to records and audio
//! - `renderer`: Draw-list extraction for an external renderer
//! - `highscores`: Match records, record stores and the leaderboard
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod game;
pub mod highscores;
pub mod input;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::{FrameOutcome, Game};
pub use highscores::{CsvRecordStore, Leaderboard, MemoryRecordStore, Record, RecordStore};
pub use settings::Settings;
pub use tuning::{ConfigError, Tuning};

use glam::Vec2;

/// Screen and sprite geometry constants
pub mod consts {
    /// Frames per second of the fixed simulation tick
    pub const FPS: u32 = 120;

    /// Screen dimensions
    pub const SCREEN_WIDTH: f32 = 680.0;
    pub const SCREEN_HEIGHT: f32 = 984.0;

    /// Player sprite box
    pub const PLAYER_WIDTH: f32 = 140.0;
    pub const PLAYER_HEIGHT: f32 = 140.0;
    /// How far the player's feet sink past the platform floor
    pub const PLAYER_FOOT_MARGIN: f32 = 20.0;
    /// Fixed vertical position of the player
    pub const PLAYER_Y_POS: f32 = SCREEN_HEIGHT - SCREEN_HEIGHT / 4.0;

    /// Wall platforms (one on each side of the screen)
    pub const PLATFORM_WIDTH: f32 = SCREEN_WIDTH / 4.0;
    pub const PLATFORM_HEIGHT: f32 = 328.0; // SCREEN_HEIGHT / 3, floored
    /// Platform width without its transparent margin
    pub const PLATFORM_FLOOR_WIDTH: f32 = PLATFORM_WIDTH - 3.0;

    /// Obstacle sprites
    pub const BLOCK_WIDTH: f32 = 70.0;
    pub const BLOCK_HEIGHT: f32 = 70.0;
    pub const SPIKE_WIDTH: f32 = 70.0;
    pub const SPIKE_HEIGHT: f32 = 70.0;
    pub const DEAD_BUSH_WIDTH: f32 = 180.0;
    pub const DEAD_BUSH_HEIGHT: f32 = 70.0;

    /// Item and enemy sprites
    pub const ITEM_WIDTH: f32 = 28.0;
    pub const ITEM_HEIGHT: f32 = 28.0;
    pub const ENEMY_WIDTH: f32 = 90.0;
    pub const ENEMY_HEIGHT: f32 = 90.0;
}

/// Horizontal side of the play field
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Axis-aligned rectangle in screen space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }

    /// Shrink the rect by `margin` on every edge
    pub fn inset(&self, margin: f32) -> Self {
        let size = (self.size - Vec2::splat(margin * 2.0)).max(Vec2::ZERO);
        Self {
            pos: self.pos + Vec2::splat(margin),
            size,
        }
    }

    /// Overlap test; touching edges do not count
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.pos.x < b_max.x && other.pos.x < a_max.x && self.pos.y < b_max.y && other.pos.y < a_max.y
    }
}
