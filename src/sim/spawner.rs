//! Spawn scheduling and difficulty ramp
//!
//! Two parameters ratchet every frame of a run: the concurrent sprite
//! threshold grows toward its ceiling and the spacing factor shrinks toward
//! its floor.

use std::collections::BTreeMap;

use rand::Rng;

use super::catalog::Catalog;
use super::entity::{Entity, EntityId};
use crate::tuning::Tuning;

#[derive(Debug, Clone)]
pub struct Spawner {
    /// Fractional threshold; a spawn needs `live count < max_sprites`
    pub max_sprites: f32,
    /// Lower bound of the spacing draw, in sprite heights
    pub distance_factor: f32,
    last_spawned: Option<EntityId>,
    /// Distance the last spawn must fall before the next one (pixels)
    next_gap: f32,
}

impl Spawner {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            max_sprites: 1.0,
            distance_factor: tuning.max_sprites_distance_factor,
            last_spawned: None,
            next_gap: 0.0,
        }
    }

    pub fn last_spawned(&self) -> Option<EntityId> {
        self.last_spawned
    }

    /// Gap the previous spawn has to clear, in pixels
    pub fn next_gap(&self) -> f32 {
        self.next_gap
    }

    /// Room for one more, and the previous spawn has moved far enough
    pub fn should_spawn(&self, live: &BTreeMap<EntityId, Entity>) -> bool {
        if (live.len() as f32) >= self.max_sprites {
            return false;
        }
        match self.last_spawned.and_then(|id| live.get(&id)) {
            // Collected, killed or scrolled away
            None => true,
            Some(last) => last.pos.y - last.spawn_y >= self.next_gap,
        }
    }

    /// Create the next entity and draw the gap that must follow it
    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        id: EntityId,
        catalog: &Catalog,
        tuning: &Tuning,
        rng: &mut R,
    ) -> Entity {
        let kind = catalog.sample(rng);
        let edge_placed = !tuning.band_placed.contains(&kind);
        let entity =
            Entity::spawn_placed(id, kind, tuning.explosion_animation_speed, edge_placed, rng);

        // Between the current factor and the fixed ceiling, not the floor
        let span = tuning.max_sprites_distance_factor - self.distance_factor;
        let factor = self.distance_factor + span * rng.random::<f32>();
        self.next_gap = factor * entity.size().y;
        self.last_spawned = Some(id);

        log::debug!(
            "spawn #{} {} at ({:.0}, {:.0}), gap {:.0}",
            id,
            kind.name(),
            entity.pos.x,
            entity.pos.y,
            self.next_gap
        );
        entity
    }

    /// One frame of difficulty ramp
    pub fn grow(&mut self, tuning: &Tuning) {
        self.max_sprites =
            (self.max_sprites + tuning.sprites_on_screen_increment).min(tuning.max_sprites_on_screen);
        self.distance_factor = (self.distance_factor - tuning.sprites_distance_decrement)
            .max(tuning.min_sprites_distance_factor);
    }
}
