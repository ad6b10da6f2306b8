//! Falling screen objects: obstacles, items and enemies
//!
//! A single `Entity` type carries the shared movable/animatable state, with a
//! `Role` payload for the kind-specific parts.

use glam::Vec2;
use rand::Rng;

use super::catalog::{ActorClass, EXPLOSION_FRAMES, ItemEffect, SpawnKind, Template};
use crate::consts::*;
use crate::{Rect, Side};

/// Stable entity handle within a session
pub type EntityId = u32;

/// A frame sequence with a fractional play head
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    /// Size of each frame; the images themselves belong to the renderer
    frames: Vec<Vec2>,
    /// Fractional frame index (truncated to pick a frame)
    pub index: f32,
    /// Index advance per tick
    pub rate: f32,
}

impl Animation {
    pub fn new(frames: Vec<Vec2>, rate: f32) -> Self {
        Self {
            frames,
            index: 0.0,
            rate,
        }
    }

    /// `count` frames of the same size
    pub fn uniform(count: usize, size: Vec2, rate: f32) -> Self {
        Self::new(vec![size; count.max(1)], rate)
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Current frame, always within bounds
    pub fn frame(&self) -> usize {
        (self.index.max(0.0) as usize).min(self.frames.len().saturating_sub(1))
    }

    pub fn size(&self) -> Vec2 {
        self.frames.get(self.frame()).copied().unwrap_or(Vec2::ZERO)
    }

    pub fn is_animated(&self) -> bool {
        self.rate > 0.0 && self.frames.len() > 1
    }

    pub fn reset(&mut self) {
        self.index = 0.0;
    }

    /// Advance and wrap to the first frame past the end
    pub fn advance_looping(&mut self) {
        self.step_looping(self.rate);
    }

    /// Looping advance by an explicit amount (for speed-scaled animations)
    pub fn step_looping(&mut self, amount: f32) {
        if amount <= 0.0 || self.frames.len() <= 1 {
            return;
        }
        self.index += amount;
        if self.index >= self.frames.len() as f32 {
            self.index = 0.0;
        }
    }

    /// Looping advance that restarts on reaching the last frame, which never shows
    pub fn step_cycle(&mut self, amount: f32) {
        if amount <= 0.0 || self.frames.len() <= 1 {
            return;
        }
        self.index += amount;
        if self.index >= (self.frames.len() - 1) as f32 {
            self.index = 0.0;
        }
    }

    /// Advance a one-shot sequence; true once the last frame is reached
    pub fn advance_once(&mut self) -> bool {
        self.step_once(self.rate)
    }

    pub fn step_once(&mut self, amount: f32) -> bool {
        if amount <= 0.0 || self.frames.len() <= 1 {
            return true;
        }
        self.index += amount;
        let last = (self.frames.len() - 1) as f32;
        if self.index >= last {
            self.index = last;
            return true;
        }
        false
    }
}

/// Enemy-only state
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyState {
    pub defeated: bool,
    /// Either the enemy's own death sequence or the generic explosion
    pub death: Animation,
    pub has_death_sequence: bool,
}

/// Kind-specific payload
#[derive(Debug, Clone, PartialEq)]
pub enum Role {
    Obstacle,
    Item(ItemEffect),
    Enemy(EnemyState),
}

/// A falling obstacle, item or enemy
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub kind: SpawnKind,
    /// Top-left corner in screen space
    pub pos: Vec2,
    /// Where it entered the screen, for spacing checks
    pub spawn_y: f32,
    /// Extra downward speed on top of the scroll speed
    pub drift: f32,
    pub edge_placed: bool,
    /// Hazard already hit the player (never damages twice)
    pub impacted: bool,
    /// Removal requested (death animation finished)
    pub expired: bool,
    pub anim: Animation,
    pub role: Role,
}

impl Entity {
    /// Build an entity of `kind` at an explicit position
    pub fn new(id: EntityId, kind: SpawnKind, pos: Vec2, explosion_speed: f32) -> Self {
        let template = kind.template();
        let role = match kind.class() {
            ActorClass::Obstacle => Role::Obstacle,
            ActorClass::Item => match kind.item_effect() {
                Some(effect) => Role::Item(effect),
                None => Role::Obstacle,
            },
            ActorClass::Enemy => Role::Enemy(enemy_state(&template, explosion_speed)),
        };

        Self {
            id,
            kind,
            pos,
            spawn_y: pos.y,
            drift: template.drift,
            edge_placed: template.edge_placed,
            impacted: false,
            expired: false,
            anim: Animation::uniform(template.frames, template.size, template.animation_speed),
            role,
        }
    }

    /// Build an entity above the top of the screen at a random placement
    pub fn spawn<R: Rng + ?Sized>(
        id: EntityId,
        kind: SpawnKind,
        explosion_speed: f32,
        rng: &mut R,
    ) -> Self {
        let edge_placed = kind.template().edge_placed;
        Self::spawn_placed(id, kind, explosion_speed, edge_placed, rng)
    }

    /// Like `spawn`, but against a wall or anywhere across the band as asked
    pub fn spawn_placed<R: Rng + ?Sized>(
        id: EntityId,
        kind: SpawnKind,
        explosion_speed: f32,
        edge_placed: bool,
        rng: &mut R,
    ) -> Self {
        let template = kind.template();
        let x = if edge_placed {
            let side = if rng.random_bool(0.5) {
                Side::Left
            } else {
                Side::Right
            };
            edge_x(side, template.size.x)
        } else {
            band_x(rng.random::<f32>())
        };
        let y = -template.size.y * 2.0;
        let mut entity = Self::new(id, kind, Vec2::new(x, y), explosion_speed);
        entity.edge_placed = edge_placed;
        entity
    }

    pub fn class(&self) -> ActorClass {
        self.kind.class()
    }

    pub fn size(&self) -> Vec2 {
        match &self.role {
            Role::Enemy(enemy) if enemy.defeated && enemy.has_death_sequence => enemy.death.size(),
            _ => self.anim.size(),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size())
    }

    /// Which side of the band the sprite sits on, if any
    pub fn side(&self) -> Option<Side> {
        classify_side(self.pos.x)
    }

    /// Obstacles and enemies can hurt the player
    pub fn is_hazard(&self) -> bool {
        !matches!(self.role, Role::Item(_))
    }

    pub fn is_defeated(&self) -> bool {
        matches!(&self.role, Role::Enemy(enemy) if enemy.defeated)
    }

    /// Item effect, if this is an item
    pub fn item_effect(&self) -> Option<ItemEffect> {
        match self.role {
            Role::Item(effect) => Some(effect),
            _ => None,
        }
    }

    /// Scroll down by the game speed plus own drift
    pub fn advance(&mut self, game_speed: f32) {
        self.pos.y += game_speed + self.drift;
    }

    /// Step the active frame sequence
    pub fn animate(&mut self) {
        let old_width = self.size().x;

        match &mut self.role {
            Role::Enemy(enemy) if enemy.defeated => {
                if enemy.death.advance_once() {
                    self.expired = true;
                }
            }
            _ => self.anim.advance_looping(),
        }

        self.refit_edge(old_width);
    }

    /// Keep right-edge sprites flush with the platform when the frame width changes
    fn refit_edge(&mut self, old_width: f32) {
        let width = self.size().x;
        if width != old_width && self.edge_placed && self.side() == Some(Side::Right) {
            self.pos.x = edge_x(Side::Right, width);
        }
    }

    /// Kill an enemy; false if not an enemy or already defeated
    pub fn die(&mut self) -> bool {
        let old_width = self.size().x;
        match &mut self.role {
            Role::Enemy(enemy) if !enemy.defeated => {
                enemy.defeated = true;
                enemy.death.reset();
            }
            _ => return false,
        }
        self.drift = 0.0;
        self.refit_edge(old_width);
        true
    }

    /// Past the bottom of the screen plus one platform of margin
    pub fn is_off_screen(&self) -> bool {
        self.pos.y > SCREEN_HEIGHT + PLATFORM_HEIGHT
    }
}

fn enemy_state(template: &Template, explosion_speed: f32) -> EnemyState {
    match template.death {
        Some(death) => EnemyState {
            defeated: false,
            death: Animation::uniform(death.frames, death.size, death.speed),
            has_death_sequence: true,
        },
        None => EnemyState {
            defeated: false,
            death: Animation::uniform(
                EXPLOSION_FRAMES,
                Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT),
                explosion_speed,
            ),
            has_death_sequence: false,
        },
    }
}

/// X of a sprite of `width` resting against the platform on `side`
pub fn edge_x(side: Side, width: f32) -> f32 {
    match side {
        Side::Left => PLATFORM_FLOOR_WIDTH,
        Side::Right => SCREEN_WIDTH - PLATFORM_FLOOR_WIDTH - width,
    }
}

/// Map a uniform draw in [0, 1) to an x inside the band between platforms
pub fn band_x(unit: f32) -> f32 {
    unit * (SCREEN_WIDTH - PLATFORM_WIDTH * 2.0) + PLATFORM_WIDTH
}

/// Side of the band an x coordinate falls on
pub fn classify_side(x: f32) -> Option<Side> {
    let mid = SCREEN_WIDTH / 2.0;
    if (PLATFORM_WIDTH..=mid).contains(&x) {
        Some(Side::Left)
    } else if x > mid && x <= SCREEN_WIDTH - PLATFORM_WIDTH {
        Some(Side::Right)
    } else {
        None
    }
}
