//! Sprite draw commands extracted from the game state

use glam::Vec2;

use crate::Side;
use crate::consts::*;
use crate::sim::{Entity, GameState, Player, Pose, Role, SpawnKind};

/// Which frame sequence of an entity is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sequence {
    Main,
    /// The enemy's own death sequence
    Death,
}

/// Player overlay effects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Shield,
    Hit,
}

/// One thing to blit, in back-to-front order
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// One wall platform tile
    Platform { side: Side, pos: Vec2 },
    Entity {
        kind: SpawnKind,
        sequence: Sequence,
        frame: usize,
        pos: Vec2,
        flip_x: bool,
    },
    /// Generic explosion over an enemy with no death sequence of its own
    Explosion { frame: usize, pos: Vec2 },
    Player {
        pose: Pose,
        frame: usize,
        pos: Vec2,
        /// Degrees
        angle: f32,
        flip_x: bool,
    },
    PlayerEffect { effect: Effect, frame: usize, pos: Vec2 },
}

/// Both platform columns, tiled to cover the screen at the current scroll
pub fn platforms(offset: f32) -> Vec<DrawCommand> {
    let mut out = Vec::new();
    // One extra tile above the screen to cover the scroll gap
    let mut y = offset - PLATFORM_HEIGHT;
    while y < SCREEN_HEIGHT {
        out.push(DrawCommand::Platform {
            side: Side::Left,
            pos: Vec2::new(0.0, y),
        });
        out.push(DrawCommand::Platform {
            side: Side::Right,
            pos: Vec2::new(SCREEN_WIDTH - PLATFORM_WIDTH, y),
        });
        y += PLATFORM_HEIGHT;
    }
    out
}

/// Sprites on the right side are mirrored to face the band
pub fn entity(e: &Entity) -> Vec<DrawCommand> {
    let flip_x = e.side() == Some(Side::Right);
    match &e.role {
        Role::Enemy(enemy) if enemy.defeated && enemy.has_death_sequence => {
            vec![DrawCommand::Entity {
                kind: e.kind,
                sequence: Sequence::Death,
                frame: enemy.death.frame(),
                pos: e.pos,
                flip_x,
            }]
        }
        Role::Enemy(enemy) if enemy.defeated => vec![
            DrawCommand::Entity {
                kind: e.kind,
                sequence: Sequence::Main,
                frame: e.anim.frame(),
                pos: e.pos,
                flip_x,
            },
            DrawCommand::Explosion {
                frame: enemy.death.frame(),
                pos: e.pos,
            },
        ],
        _ => vec![DrawCommand::Entity {
            kind: e.kind,
            sequence: Sequence::Main,
            frame: e.anim.frame(),
            pos: e.pos,
            flip_x,
        }],
    }
}

pub fn player(p: &Player) -> Vec<DrawCommand> {
    let mut out = vec![DrawCommand::Player {
        pose: p.pose(),
        frame: p.frame(),
        pos: p.pos,
        angle: p.angle,
        flip_x: p.flip_x(),
    }];
    if p.shielded {
        out.push(DrawCommand::PlayerEffect {
            effect: Effect::Shield,
            frame: p.shield_frame(),
            pos: p.pos,
        });
    } else if p.hit {
        out.push(DrawCommand::PlayerEffect {
            effect: Effect::Hit,
            frame: p.hit_frame(),
            pos: p.pos,
        });
    }
    out
}

/// Everything on screen for one frame: platforms, entities in id order, player
pub fn draw_list(state: &GameState) -> Vec<DrawCommand> {
    let mut out = platforms(state.platform_offset);
    for e in state.entities.values() {
        out.extend(entity(e));
    }
    out.extend(player(&state.player));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::edge_x;
    use crate::tuning::Tuning;

    #[test]
    fn test_platforms_cover_screen() {
        let cmds = platforms(100.0);
        let ys: Vec<f32> = cmds
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Platform {
                    side: Side::Left,
                    pos,
                } => Some(pos.y),
                _ => None,
            })
            .collect();
        assert_eq!(ys[0], 100.0 - PLATFORM_HEIGHT);
        assert!(ys.last().is_some_and(|y| y + PLATFORM_HEIGHT >= SCREEN_HEIGHT));
        assert_eq!(cmds.len(), ys.len() * 2);
    }

    #[test]
    fn test_right_side_entities_flip() {
        let left = Entity::new(1, SpawnKind::Spike, Vec2::new(edge_x(Side::Left, 70.0), 0.0), 0.3);
        let right = Entity::new(2, SpawnKind::Spike, Vec2::new(edge_x(Side::Right, 70.0), 0.0), 0.3);
        assert!(matches!(entity(&left)[0], DrawCommand::Entity { flip_x: false, .. }));
        assert!(matches!(entity(&right)[0], DrawCommand::Entity { flip_x: true, .. }));
    }

    #[test]
    fn test_defeated_enemy_sequences() {
        let mut golem = Entity::new(1, SpawnKind::Golem, Vec2::new(300.0, 0.0), 0.3);
        golem.die();
        let cmds = entity(&golem);
        assert_eq!(cmds.len(), 2);
        assert!(matches!(cmds[1], DrawCommand::Explosion { frame: 0, .. }));

        let mut bringer = Entity::new(2, SpawnKind::BringerOfDeath, Vec2::new(300.0, 0.0), 0.3);
        bringer.die();
        let cmds = entity(&bringer);
        assert_eq!(cmds.len(), 1);
        assert!(matches!(
            cmds[0],
            DrawCommand::Entity {
                sequence: Sequence::Death,
                ..
            }
        ));
    }

    #[test]
    fn test_player_overlays() {
        let mut p = Player::from_tuning(&Tuning::default());
        assert_eq!(player(&p).len(), 1);
        p.hit();
        assert!(matches!(
            player(&p)[1],
            DrawCommand::PlayerEffect {
                effect: Effect::Hit,
                ..
            }
        ));
        p.shield();
        assert!(matches!(
            player(&p)[1],
            DrawCommand::PlayerEffect {
                effect: Effect::Shield,
                ..
            }
        ));
    }

    #[test]
    fn test_draw_list_ends_with_player() {
        let mut state = GameState::new(5, Tuning::default()).expect("state");
        state.start();
        state.insert_entity(SpawnKind::Coin, Vec2::new(300.0, 100.0));
        let cmds = draw_list(&state);
        assert!(matches!(cmds.last(), Some(DrawCommand::Player { .. })));
        assert!(cmds.iter().any(|c| matches!(
            c,
            DrawCommand::Entity {
                kind: SpawnKind::Coin,
                ..
            }
        )));
    }
}
