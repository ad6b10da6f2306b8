//! Player vs entity collision classification
//!
//! Each overlap resolves to exactly one rule, checked in strict priority
//! order. Applying the rule is the game state's job; this module only decides
//! which rule fires.

use super::catalog::{ActorClass, ItemEffect};
use super::entity::Entity;
use super::player::Player;

/// Outcome of a single player/entity overlap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Attack connected with an enemy (lethal only if it is still alive)
    Strike,
    /// Currency item; value before any boost
    Collect(u32),
    Sprint,
    ScoreBoost,
    Shield,
    Heal,
    /// Grace period, spent hazard, or an item whose effect is already active
    Ignore,
    /// Fresh hazard reached the player; the shield may still absorb it
    Damage,
}

impl Resolution {
    /// Item pickups consume the entity
    pub fn consumes(self) -> bool {
        matches!(
            self,
            Resolution::Collect(_)
                | Resolution::Sprint
                | Resolution::ScoreBoost
                | Resolution::Shield
                | Resolution::Heal
        )
    }
}

/// Player hurtbox overlaps the entity sprite
pub fn overlaps(player: &Player, entity: &Entity) -> bool {
    player.hurtbox().intersects(&entity.rect())
}

/// Pick the rule for an overlap. First match wins.
pub fn classify(player: &Player, score_boosted: bool, entity: &Entity) -> Resolution {
    if player.attacking && entity.class() == ActorClass::Enemy {
        return Resolution::Strike;
    }

    if let Some(effect) = entity.item_effect() {
        return match effect {
            ItemEffect::Coins(value) => Resolution::Collect(value),
            ItemEffect::Sprint if !player.sprinting => Resolution::Sprint,
            ItemEffect::ScoreBoost if !score_boosted => Resolution::ScoreBoost,
            ItemEffect::Shield if !player.shielded => Resolution::Shield,
            ItemEffect::Health => Resolution::Heal,
            _ => Resolution::Ignore,
        };
    }

    if player.hit || entity.impacted || entity.is_defeated() {
        return Resolution::Ignore;
    }
    Resolution::Damage
}
