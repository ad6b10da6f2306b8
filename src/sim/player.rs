//! The player character
//!
//! Runs on one of the two wall platforms, jumps across, attacks, and carries
//! the shield/sprint/hit overlay flags.

use glam::Vec2;

use super::entity::Animation;
use crate::consts::*;
use crate::tuning::Tuning;
use crate::{Rect, Side};

/// X where the player rests against the left platform
pub const LEFT_POS: f32 = PLATFORM_FLOOR_WIDTH - PLAYER_FOOT_MARGIN;
/// X where the player rests against the right platform
pub const RIGHT_POS: f32 = SCREEN_WIDTH - PLATFORM_FLOOR_WIDTH - PLAYER_WIDTH + PLAYER_FOOT_MARGIN;

/// Frame counts of the player sheets
pub const RUN_FRAMES: usize = 8;
pub const JUMP_FRAMES: usize = 4;
pub const ATTACK_FRAMES: usize = 6;
pub const SHIELD_EFFECT_FRAMES: usize = 6;
pub const HIT_EFFECT_FRAMES: usize = 4;

/// Where the player is relative to the platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerSide {
    Left,
    Right,
    /// Mid-air between the platforms
    Center,
}

/// Which frame sequence is driving the sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pose {
    Run,
    Jump,
    Attack,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub health: u32,
    pub max_health: u32,
    pub jumping: bool,
    pub attacking: bool,
    pub shielded: bool,
    pub sprinting: bool,
    /// Transient hurt flash
    pub hit: bool,
    pub jump_dir: Option<Side>,
    /// Sprite rotation in degrees (90 on a wall, 0 mid-jump)
    pub angle: f32,
    base_jump_speed: f32,
    run: Animation,
    jump: Animation,
    attack: Animation,
    shield_effect: Animation,
    hit_effect: Animation,
}

impl Player {
    pub fn new(max_health: u32, jump_speed: f32) -> Self {
        let size = Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT);
        Self {
            pos: Vec2::new(RIGHT_POS, PLAYER_Y_POS),
            health: max_health,
            max_health,
            jumping: false,
            attacking: false,
            shielded: false,
            sprinting: false,
            hit: false,
            jump_dir: None,
            angle: 90.0,
            base_jump_speed: jump_speed,
            run: Animation::uniform(RUN_FRAMES, size, 0.0),
            jump: Animation::uniform(JUMP_FRAMES, size, 0.0),
            attack: Animation::uniform(ATTACK_FRAMES, size, 0.0),
            shield_effect: Animation::uniform(SHIELD_EFFECT_FRAMES, size, 0.0),
            hit_effect: Animation::uniform(HIT_EFFECT_FRAMES, size, 0.0),
        }
    }

    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self::new(tuning.max_health, tuning.game_speed * tuning.jump_speed_factor)
    }

    pub fn side(&self) -> PlayerSide {
        if self.pos.x <= LEFT_POS {
            PlayerSide::Left
        } else if self.pos.x >= RIGHT_POS {
            PlayerSide::Right
        } else {
            PlayerSide::Center
        }
    }

    /// Resting on the platform on `side`
    pub fn is_on(&self, side: Side) -> bool {
        matches!(
            (side, self.side()),
            (Side::Left, PlayerSide::Left) | (Side::Right, PlayerSide::Right)
        )
    }

    /// Horizontal speed, doubled while sprinting
    pub fn jump_speed(&self) -> f32 {
        if self.sprinting {
            self.base_jump_speed * 2.0
        } else {
            self.base_jump_speed
        }
    }

    pub fn pose(&self) -> Pose {
        if self.attacking {
            Pose::Attack
        } else if self.jumping {
            Pose::Jump
        } else {
            Pose::Run
        }
    }

    fn active(&self) -> &Animation {
        match self.pose() {
            Pose::Attack => &self.attack,
            Pose::Jump => &self.jump,
            Pose::Run => &self.run,
        }
    }

    pub fn frame(&self) -> usize {
        self.active().frame()
    }

    pub fn shield_frame(&self) -> usize {
        self.shield_effect.frame()
    }

    pub fn hit_frame(&self) -> usize {
        self.hit_effect.frame()
    }

    /// Mirror the sprite when facing left
    pub fn flip_x(&self) -> bool {
        self.side() == PlayerSide::Left || self.jump_dir == Some(Side::Left)
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.active().size())
    }

    /// Damage area: the sprite box minus the foot margin on every edge
    pub fn hurtbox(&self) -> Rect {
        self.rect().inset(PLAYER_FOOT_MARGIN)
    }

    /// Start a jump toward `dir`. No-op against the wall already touched or
    /// while already heading that way.
    pub fn jump(&mut self, dir: Side) -> bool {
        if self.is_on(dir) || (self.jumping && self.jump_dir == Some(dir)) {
            return false;
        }
        self.jumping = true;
        self.attacking = false;
        self.attack.reset();
        self.jump.reset();
        self.angle = 0.0;
        self.jump_dir = Some(dir);
        true
    }

    pub fn disable_jump(&mut self) {
        if self.jumping {
            self.jumping = false;
            self.jump.reset();
            self.jump_dir = None;
            self.angle = 90.0;
        }
    }

    pub fn attack(&mut self) -> bool {
        if self.attacking {
            return false;
        }
        self.attacking = true;
        self.attack.reset();
        true
    }

    pub fn disable_attack(&mut self) {
        if self.attacking {
            self.attacking = false;
            self.attack.reset();
        }
    }

    /// Lose one health unless shielded. Returns whether damage landed.
    pub fn hit(&mut self) -> bool {
        if self.shielded {
            return false;
        }
        self.hit = true;
        self.hit_effect.reset();
        self.health = self.health.saturating_sub(1);
        true
    }

    pub fn heal(&mut self) {
        if self.health < self.max_health {
            self.health += 1;
        }
    }

    pub fn shield(&mut self) {
        self.shielded = true;
    }

    pub fn disable_shield(&mut self) {
        self.shielded = false;
    }

    /// Sprinting always comes with a shield
    pub fn sprint(&mut self) {
        self.sprinting = true;
        self.shield();
    }

    pub fn disable_sprint(&mut self) {
        self.sprinting = false;
        self.disable_shield();
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    /// Per-frame movement. `jump_speed` refreshes the base speed when given.
    pub fn update(&mut self, jump_speed: Option<f32>) {
        if let Some(speed) = jump_speed {
            self.base_jump_speed = speed;
        }
        if !self.jumping {
            return;
        }

        let speed = self.jump_speed();
        match self.jump_dir {
            Some(Side::Left) if self.side() != PlayerSide::Left => {
                self.pos.x = (self.pos.x - speed).max(LEFT_POS);
            }
            Some(Side::Right) if self.side() != PlayerSide::Right => {
                self.pos.x = (self.pos.x + speed).min(RIGHT_POS);
            }
            _ => self.disable_jump(),
        }
    }

    /// Per-frame animation of the active sequence and overlay effects
    pub fn animate(&mut self, game_speed: f32, tuning: &Tuning) {
        match self.pose() {
            // Fixed rate, one shot
            Pose::Attack => {
                if self.attack.step_once(tuning.attack_animation_speed) {
                    self.disable_attack();
                }
            }
            // Player loops restart on their last frame
            Pose::Jump => self
                .jump
                .step_cycle(game_speed * tuning.run_animation_speed),
            Pose::Run => self
                .run
                .step_cycle(game_speed * tuning.run_animation_speed),
        }

        if self.hit && self.hit_effect.step_once(tuning.hit_animation_speed) {
            self.hit = false;
            self.hit_effect.reset();
        }

        if self.shielded {
            self.shield_effect
                .step_cycle(tuning.shield_animation_speed);
        }
    }
}
