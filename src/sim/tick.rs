//! Fixed timestep simulation tick
//!
//! Applies the frame's commands, then advances the session by one frame.

use super::entity::Role;
use super::player::PlayerSide;
use super::state::{GameMode, GameState};
use crate::Side;
use crate::consts::*;
use crate::input::Command;

/// Input for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Commands in arrival order
    pub commands: Vec<Command>,
    /// Demo mode - the autopilot plays the run
    pub autopilot: bool,
}

impl TickInput {
    pub fn command(command: Command) -> Self {
        Self {
            commands: vec![command],
            autopilot: false,
        }
    }
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    for &command in &input.commands {
        apply_command(state, command);
    }

    if input.autopilot && state.mode == GameMode::Playing {
        for command in autopilot(state) {
            apply_command(state, command);
        }
    }

    state.step();
}

/// Route one command to the session. Mute is the shell's business.
pub fn apply_command(state: &mut GameState, command: Command) {
    match command {
        Command::JumpLeft => state.on_jump(Side::Left),
        Command::JumpRight => state.on_jump(Side::Right),
        Command::AttackStart => state.on_attack_start(),
        Command::AttackStop => state.on_attack_stop(),
        Command::TogglePause => {
            state.toggle_pause();
        }
        Command::Start => {
            state.start();
        }
        Command::Quit => {
            state.finish();
        }
        Command::ToggleMute => {}
    }
}

/// How far above the player the autopilot looks for threats
const LOOKAHEAD: f32 = PLAYER_HEIGHT * 1.5;
/// Enemies closer than this get attacked
const STRIKE_RANGE: f32 = PLAYER_FOOT_MARGIN * 2.0;

/// Simple demo player: jump away from obstacles in the lane, swing at
/// enemies that come within reach
pub fn autopilot(state: &GameState) -> Vec<Command> {
    let player = &state.player;
    if player.jumping {
        return Vec::new();
    }
    let side = match player.side() {
        PlayerSide::Left => Side::Left,
        PlayerSide::Right => Side::Right,
        PlayerSide::Center => return Vec::new(),
    };

    let hurtbox = player.hurtbox();
    let lookahead = LOOKAHEAD + state.speed * 10.0;

    // Nearest threat sharing the player's lane
    let threat = state
        .entities
        .values()
        .filter(|e| e.is_hazard() && !e.impacted && !e.is_defeated())
        .filter(|e| {
            let r = e.rect();
            r.pos.x < hurtbox.max().x && hurtbox.pos.x < r.max().x
        })
        .map(|e| (hurtbox.pos.y - e.rect().max().y, e))
        .filter(|(gap, _)| *gap > -hurtbox.size.y && *gap < lookahead)
        .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    match threat {
        Some((gap, e)) if matches!(e.role, Role::Enemy(_)) => {
            if gap < STRIKE_RANGE && !player.attacking {
                vec![Command::AttackStart]
            } else {
                Vec::new()
            }
        }
        Some(_) => match side.opposite() {
            Side::Left => vec![Command::JumpLeft],
            Side::Right => vec![Command::JumpRight],
        },
        None => Vec::new(),
    }
}
