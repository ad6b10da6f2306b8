//! Game session state and mode machine
//!
//! One `GameState` owns everything a run needs: the player, the live entity
//! arena, the spawner, counters, speed, ability deadlines and the seeded RNG.

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::catalog::{Catalog, ItemEffect, SpawnKind};
use super::collision::{Resolution, classify, overlaps};
use super::entity::{Entity, EntityId};
use super::player::Player;
use super::spawner::Spawner;
use crate::Side;
use crate::consts::PLATFORM_HEIGHT;
use crate::tuning::{ConfigError, Tuning};

/// Top-level mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    Menu,
    Playing,
    Paused,
    GameOver,
}

/// Timed abilities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ability {
    Sprint,
    Shield,
    ScoreBoost,
}

/// Expiry deadlines, in simulation ticks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AbilityDeadlines {
    pub sprint: Option<u64>,
    pub shield: Option<u64>,
    pub score_boost: Option<u64>,
}

/// Discrete things that happened during a tick, drained by the shell
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    ModeChanged { from: GameMode, to: GameMode },
    CoinsCollected(u64),
    EnemyKilled(SpawnKind),
    /// A hazard scrolled past untouched
    Dodged(SpawnKind),
    PlayerHurt { health: u32 },
    /// A hazard hit the shield
    Blocked,
    PowerUp(ItemEffect),
    AbilityExpired(Ability),
    GameOver { score: u64, kills: u64, coins: u64 },
}

/// Complete session state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub tuning: Tuning,
    catalog: Catalog,
    pub mode: GameMode,
    pub score: u64,
    pub coins: u64,
    pub kills: u64,
    /// Current scroll speed
    pub speed: f32,
    /// Speed to decay back to once a sprint ends
    pub pre_sprint_speed: Option<f32>,
    pub score_boosted: bool,
    pub deadlines: AbilityDeadlines,
    pub player: Player,
    /// Live entities, iterated in id order
    pub entities: BTreeMap<EntityId, Entity>,
    pub spawner: Spawner,
    /// Ticks spent in Playing this session
    pub time_ticks: u64,
    /// Scroll offset of the wall platforms, wraps at the platform height
    pub platform_offset: f32,
    /// Set by the shell when the finished run beats every stored record
    pub new_high_score: bool,
    events: Vec<GameEvent>,
    next_id: EntityId,
}

impl GameState {
    /// Validate the tuning and build a session sitting in the menu
    pub fn new(seed: u64, tuning: Tuning) -> Result<Self, ConfigError> {
        tuning.validate()?;
        let catalog = Catalog::new(&tuning.drop_weights)?;
        Ok(Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            catalog,
            mode: GameMode::Menu,
            score: 0,
            coins: 0,
            kills: 0,
            speed: tuning.game_speed,
            pre_sprint_speed: None,
            score_boosted: false,
            deadlines: AbilityDeadlines::default(),
            player: Player::from_tuning(&tuning),
            entities: BTreeMap::new(),
            spawner: Spawner::new(&tuning),
            time_ticks: 0,
            platform_offset: 0.0,
            new_high_score: false,
            events: Vec::new(),
            next_id: 1,
            tuning,
        })
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Take the events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn set_mode(&mut self, to: GameMode) {
        let from = self.mode;
        if from == to {
            return;
        }
        log::info!("Mode {:?} -> {:?}", from, to);
        self.mode = to;
        self.events.push(GameEvent::ModeChanged { from, to });
    }

    // === Mode transitions ===

    /// Reset the session and enter Playing (from the menu or after a game over)
    pub fn start(&mut self) -> bool {
        if !matches!(self.mode, GameMode::Menu | GameMode::GameOver) {
            return false;
        }
        self.reset();
        log::info!("Run started (seed {})", self.seed);
        self.set_mode(GameMode::Playing);
        true
    }

    fn reset(&mut self) {
        self.score = 0;
        self.coins = 0;
        self.kills = 0;
        self.speed = self.tuning.game_speed;
        self.pre_sprint_speed = None;
        self.score_boosted = false;
        self.deadlines = AbilityDeadlines::default();
        self.player = Player::from_tuning(&self.tuning);
        self.entities.clear();
        self.spawner = Spawner::new(&self.tuning);
        self.time_ticks = 0;
        self.platform_offset = 0.0;
        self.new_high_score = false;
    }

    pub fn pause(&mut self) -> bool {
        if self.mode != GameMode::Playing {
            return false;
        }
        self.set_mode(GameMode::Paused);
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.mode != GameMode::Paused {
            return false;
        }
        self.set_mode(GameMode::Playing);
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        match self.mode {
            GameMode::Playing => self.pause(),
            GameMode::Paused => self.resume(),
            _ => false,
        }
    }

    /// End the run. Emits exactly one `GameEvent::GameOver`.
    pub fn game_over(&mut self) -> bool {
        if self.mode != GameMode::Playing {
            return false;
        }
        log::info!(
            "Game over: score {}, kills {}, coins {}",
            self.score,
            self.kills,
            self.coins
        );
        self.set_mode(GameMode::GameOver);
        self.events.push(GameEvent::GameOver {
            score: self.score,
            kills: self.kills,
            coins: self.coins,
        });
        true
    }

    /// Back to the menu from Paused or GameOver, without recording anything
    pub fn finish(&mut self) -> bool {
        if !matches!(self.mode, GameMode::Paused | GameMode::GameOver) {
            return false;
        }
        self.set_mode(GameMode::Menu);
        true
    }

    // === Input handlers (ignored outside Playing) ===

    pub fn on_jump(&mut self, dir: Side) {
        if self.mode == GameMode::Playing {
            self.player.jump(dir);
        }
    }

    pub fn on_attack_start(&mut self) {
        if self.mode == GameMode::Playing {
            self.player.attack();
        }
    }

    pub fn on_attack_stop(&mut self) {
        if self.mode == GameMode::Playing {
            self.player.disable_attack();
        }
    }

    // === Abilities ===

    /// Counter increment, doubled while the score boost is active
    pub fn boosted(&self, amount: u64) -> u64 {
        if self.score_boosted { amount * 2 } else { amount }
    }

    pub fn sprint_action(&mut self) {
        let now = self.time_ticks;
        // A sprint picked up mid-decay keeps decaying to the original, lower baseline
        if self.pre_sprint_speed.is_none() {
            self.pre_sprint_speed = Some(self.speed);
        }
        self.player.sprint();
        self.deadlines.sprint = Some(now + self.tuning.sprint_duration);
        // The shield outlives the sprint as a short grace window
        let shield_until = now + self.tuning.sprint_shield_duration;
        self.deadlines.shield = Some(self.deadlines.shield.map_or(shield_until, |d| d.max(shield_until)));
    }

    pub fn score_boost_action(&mut self) {
        self.score_boosted = true;
        self.deadlines.score_boost = Some(self.time_ticks + self.tuning.score_boost_duration);
    }

    pub fn shield_action(&mut self) {
        self.player.shield();
        let until = self.time_ticks + self.tuning.shield_duration;
        self.deadlines.shield = Some(self.deadlines.shield.map_or(until, |d| d.max(until)));
    }

    /// Sprint expiry hook; also drops the shield, like the player flag pair
    pub fn disable_sprint(&mut self) {
        self.deadlines.sprint = None;
        self.player.disable_sprint();
    }

    pub fn disable_shield(&mut self) {
        self.deadlines.shield = None;
        self.player.disable_shield();
    }

    pub fn disable_score_boost(&mut self) {
        self.deadlines.score_boost = None;
        self.score_boosted = false;
    }

    fn expire_abilities(&mut self) {
        let now = self.time_ticks;
        let due = |deadline: Option<u64>| deadline.is_some_and(|d| d <= now);

        if due(self.deadlines.sprint) {
            self.disable_sprint();
            // Grace shield keeps running until its own deadline
            if self.deadlines.shield.is_some() {
                self.player.shield();
            }
            log::debug!("sprint expired at tick {now}");
            self.events.push(GameEvent::AbilityExpired(Ability::Sprint));
        }
        if due(self.deadlines.shield) {
            self.disable_shield();
            log::debug!("shield expired at tick {now}");
            self.events.push(GameEvent::AbilityExpired(Ability::Shield));
        }
        if due(self.deadlines.score_boost) {
            self.disable_score_boost();
            log::debug!("score boost expired at tick {now}");
            self.events.push(GameEvent::AbilityExpired(Ability::ScoreBoost));
        }
    }

    // === Per-frame simulation ===

    fn ramp_speed(&mut self) {
        let t = &self.tuning;
        if self.player.sprinting {
            self.speed = (self.speed + t.sprint_speed_increment).min(t.sprint_max_game_speed);
        } else if let Some(base) = self.pre_sprint_speed {
            if self.speed > base {
                self.speed = (self.speed - t.sprint_speed_decay).max(base);
            } else {
                self.pre_sprint_speed = None;
            }
        } else {
            self.speed = (self.speed + t.game_speed_increment).min(t.max_game_speed);
        }
    }

    /// Advance one frame of play. Does nothing outside Playing.
    pub fn step(&mut self) {
        if self.mode != GameMode::Playing {
            return;
        }
        self.time_ticks += 1;
        self.expire_abilities();
        self.ramp_speed();

        self.platform_offset += self.speed;
        if self.platform_offset >= PLATFORM_HEIGHT {
            self.platform_offset = 0.0;
        }

        self.player
            .update(Some(self.speed * self.tuning.jump_speed_factor));
        self.player.animate(self.speed, &self.tuning);

        if self.spawner.should_spawn(&self.entities) {
            let id = self.next_entity_id();
            let entity = self
                .spawner
                .spawn(id, &self.catalog, &self.tuning, &mut self.rng);
            self.entities.insert(id, entity);
        }

        let speed = self.speed;
        let ids: Vec<EntityId> = self.entities.keys().copied().collect();
        for id in ids {
            let Some(entity) = self.entities.get_mut(&id) else {
                continue;
            };
            entity.advance(speed);
            entity.animate();
            if entity.expired {
                self.entities.remove(&id);
                continue;
            }
            if overlaps(&self.player, entity) {
                self.resolve_collision(id);
                if self.mode != GameMode::Playing {
                    return;
                }
            }
        }

        self.remove_off_screen();
        self.spawner.grow(&self.tuning);
    }

    /// Apply the collision rule for one overlapping entity
    pub fn resolve_collision(&mut self, id: EntityId) {
        let Some(entity) = self.entities.get(&id) else {
            return;
        };
        let kind = entity.kind;
        let resolution = classify(&self.player, self.score_boosted, entity);

        match resolution {
            Resolution::Strike => {
                let alive = self.entities.get(&id).is_some_and(|e| !e.is_defeated());
                if alive {
                    self.kills += 1;
                    self.score += self.boosted(self.tuning.kill_score);
                    if let Some(enemy) = self.entities.get_mut(&id) {
                        enemy.die();
                    }
                    log::debug!("killed #{} {}", id, kind.name());
                    self.events.push(GameEvent::EnemyKilled(kind));
                }
            }
            Resolution::Collect(value) => {
                let amount = self.boosted(value as u64);
                self.coins += amount;
                self.events.push(GameEvent::CoinsCollected(amount));
            }
            Resolution::Sprint => {
                self.sprint_action();
                self.events.push(GameEvent::PowerUp(ItemEffect::Sprint));
            }
            Resolution::ScoreBoost => {
                self.score_boost_action();
                self.events.push(GameEvent::PowerUp(ItemEffect::ScoreBoost));
            }
            Resolution::Shield => {
                self.shield_action();
                self.events.push(GameEvent::PowerUp(ItemEffect::Shield));
            }
            Resolution::Heal => {
                self.player.heal();
                self.events.push(GameEvent::PowerUp(ItemEffect::Health));
            }
            Resolution::Ignore => {}
            Resolution::Damage => {
                if let Some(hazard) = self.entities.get_mut(&id) {
                    hazard.impacted = true;
                }
                if self.player.hit() {
                    log::debug!("hit by #{} {}, health {}", id, kind.name(), self.player.health);
                    self.events.push(GameEvent::PlayerHurt {
                        health: self.player.health,
                    });
                    if self.player.is_dead() {
                        self.game_over();
                    }
                } else {
                    self.events.push(GameEvent::Blocked);
                }
            }
        }

        if resolution.consumes() {
            self.entities.remove(&id);
        }
    }

    fn remove_off_screen(&mut self) {
        let gone: Vec<(EntityId, SpawnKind, bool)> = self
            .entities
            .values()
            .filter(|e| e.is_off_screen())
            .map(|e| (e.id, e.kind, e.is_hazard() && !e.impacted && !e.is_defeated()))
            .collect();

        for (id, kind, dodged) in gone {
            self.entities.remove(&id);
            if dodged {
                self.score += self.boosted(self.tuning.pass_score);
                self.events.push(GameEvent::Dodged(kind));
            }
        }
    }

    /// Insert an entity built outside the spawner (scripted setups, tests)
    pub fn insert_entity(&mut self, kind: SpawnKind, pos: glam::Vec2) -> EntityId {
        let id = self.next_entity_id();
        let entity = Entity::new(id, kind, pos, self.tuning.explosion_animation_speed);
        self.entities.insert(id, entity);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::player::RIGHT_POS;
    use glam::Vec2;

    fn playing() -> GameState {
        let mut state = GameState::new(1234, Tuning::default()).expect("state");
        assert!(state.start());
        state.drain_events();
        state
    }

    /// Position overlapping the player's hurtbox on the right wall
    fn on_player(size: Vec2) -> Vec2 {
        Vec2::new(
            RIGHT_POS + PLAYER_WIDTH / 2.0 - size.x / 2.0,
            PLAYER_Y_POS + PLAYER_HEIGHT / 2.0 - size.y / 2.0,
        )
    }

    #[test]
    fn test_new_state_in_menu() {
        let state = GameState::new(1, Tuning::default()).expect("state");
        assert_eq!(state.mode, GameMode::Menu);
        assert_eq!(state.speed, 4.0);
        assert_eq!(state.spawner.max_sprites, 1.0);
        assert_eq!(state.spawner.distance_factor, 12.0);
    }

    #[test]
    fn test_invalid_tuning_rejected() {
        let tuning = Tuning {
            max_health: 0,
            ..Tuning::default()
        };
        assert!(GameState::new(1, tuning).is_err());
    }

    #[test]
    fn test_mode_transitions() {
        let mut state = GameState::new(1, Tuning::default()).expect("state");
        assert!(!state.pause());
        assert!(!state.finish());
        assert!(state.start());
        assert!(!state.start(), "cannot restart mid-run");
        assert!(state.pause());
        assert!(!state.start());
        assert!(state.resume());
        assert!(state.game_over());
        assert!(!state.game_over());
        assert!(!state.pause());
        assert!(state.finish());
        assert_eq!(state.mode, GameMode::Menu);

        let changes: Vec<_> = state
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                GameEvent::ModeChanged { to, .. } => Some(to),
                _ => None,
            })
            .collect();
        assert_eq!(
            changes,
            vec![
                GameMode::Playing,
                GameMode::Paused,
                GameMode::Playing,
                GameMode::GameOver,
                GameMode::Menu
            ]
        );
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut state = playing();
        for _ in 0..50 {
            state.step();
        }
        state.pause();
        let snapshot = (state.time_ticks, state.speed, state.entities.clone());
        for _ in 0..50 {
            state.step();
        }
        assert_eq!(snapshot, (state.time_ticks, state.speed, state.entities.clone()));
    }

    #[test]
    fn test_start_resets_session() {
        let mut state = playing();
        state.score = 100;
        state.coins = 5;
        state.kills = 2;
        state.speed = 5.5;
        state.score_boost_action();
        state.insert_entity(SpawnKind::Ooze, Vec2::new(300.0, 10.0));
        state.spawner.max_sprites = 3.0;
        state.game_over();

        assert!(state.start());
        assert_eq!((state.score, state.coins, state.kills), (0, 0, 0));
        assert_eq!(state.speed, 4.0);
        assert!(!state.score_boosted);
        assert!(state.entities.is_empty());
        assert_eq!(state.spawner.max_sprites, 1.0);
        assert_eq!(state.player.health, state.tuning.max_health);
    }

    #[test]
    fn test_speed_ramps_to_cap() {
        let mut state = playing();
        state.speed = 5.9995;
        state.step();
        assert_eq!(state.speed, 6.0);
        state.step();
        assert_eq!(state.speed, 6.0);
    }

    #[test]
    fn test_sprint_speed_excursion_and_decay() {
        let mut state = playing();
        state.speed = 5.0;
        state.sprint_action();
        assert_eq!(state.pre_sprint_speed, Some(5.0));
        assert!(state.player.sprinting && state.player.shielded);

        let sprint_frames = state.tuning.sprint_duration;
        let mut peak: f32 = 0.0;
        for _ in 0..sprint_frames - 1 {
            state.step();
            state.entities.clear();
            peak = peak.max(state.speed);
        }
        assert!(state.player.sprinting);
        assert!(peak > state.tuning.max_game_speed);
        assert!(peak <= state.tuning.sprint_max_game_speed);

        // Sprint ends, grace shield remains
        state.step();
        assert!(!state.player.sprinting);
        assert!(state.player.shielded);

        // Decays back to the baseline, then normal ramp resumes
        for _ in 0..2000 {
            state.step();
            state.entities.clear();
        }
        assert_eq!(state.pre_sprint_speed, None);
        assert!(state.speed <= state.tuning.max_game_speed);
        assert!(!state.player.shielded);
    }

    #[test]
    fn test_resprint_mid_decay_keeps_baseline() {
        let mut state = playing();
        state.speed = 5.0;
        state.sprint_action();
        state.disable_sprint();
        state.speed = 8.0;
        state.sprint_action();
        assert_eq!(state.pre_sprint_speed, Some(5.0));
        assert!(state.player.sprinting && state.player.shielded);
    }

    #[test]
    fn test_score_boost_expires() {
        let mut state = playing();
        state.score_boost_action();
        assert_eq!(state.boosted(10), 20);
        for _ in 0..state.tuning.score_boost_duration {
            state.step();
            state.entities.clear();
        }
        assert!(!state.score_boosted);
        assert_eq!(state.boosted(10), 10);
        // Idempotent hook
        state.disable_score_boost();
        assert!(!state.score_boosted);
    }

    #[test]
    fn test_strike_kills_once() {
        let mut state = playing();
        state.player.attack();
        let size = Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT);
        let id = state.insert_entity(SpawnKind::Golem, on_player(size));

        state.resolve_collision(id);
        state.resolve_collision(id);
        assert_eq!(state.kills, 1);
        assert_eq!(state.score, state.tuning.kill_score);
        assert!(state.entities[&id].is_defeated());
    }

    #[test]
    fn test_damage_marks_impacted_and_ends_run() {
        let mut state = playing();
        state.player.health = 1;
        let id = state.insert_entity(SpawnKind::Spike, on_player(Vec2::splat(70.0)));
        state.resolve_collision(id);

        assert_eq!(state.player.health, 0);
        assert!(state.entities[&id].impacted);
        assert_eq!(state.mode, GameMode::GameOver);
        let overs = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);
    }

    #[test]
    fn test_items_consumed() {
        let mut state = playing();
        let at = on_player(Vec2::splat(ITEM_WIDTH));
        let heart = state.insert_entity(SpawnKind::Health, at);
        let shield = state.insert_entity(SpawnKind::Shield, at);
        state.player.health = 2;

        state.resolve_collision(heart);
        state.resolve_collision(shield);
        assert_eq!(state.player.health, 3);
        assert!(state.player.shielded);
        assert!(state.entities.is_empty());
        assert_eq!(
            state.deadlines.shield,
            Some(state.time_ticks + state.tuning.shield_duration)
        );
    }

    #[test]
    fn test_dead_enemy_removed_after_animation() {
        let mut state = playing();
        state.player.attack();
        let id = state.insert_entity(
            SpawnKind::Ooze,
            on_player(Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT)),
        );
        state.resolve_collision(id);
        assert!(state.entities.contains_key(&id));

        let mut frames = 0;
        while state.entities.contains_key(&id) {
            state.step();
            frames += 1;
            assert!(frames < 100);
        }
        assert_eq!(state.kills, 1);
    }

    #[test]
    fn test_deterministic_for_seed() {
        let mut a = GameState::new(99, Tuning::default()).expect("state");
        let mut b = GameState::new(99, Tuning::default()).expect("state");
        a.start();
        b.start();
        for _ in 0..3000 {
            a.step();
            b.step();
        }
        assert_eq!(a.entities, b.entities);
        assert_eq!((a.score, a.coins, a.kills), (b.score, b.coins, b.kills));
        assert_eq!(a.player.health, b.player.health);
    }
}
