//! Spawnable content and weighted kind selection
//!
//! Every obstacle, item and enemy the spawner can produce, with the sprite
//! geometry and motion each one starts with.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::tuning::{ConfigError, DropWeights};

/// Broad category of a spawnable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorClass {
    /// Static hazard
    Obstacle,
    /// Collectible or power-up
    Item,
    /// Hazard that can be killed by attacking
    Enemy,
}

/// What picking up an item does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemEffect {
    /// Currency worth this many coins
    Coins(u32),
    Health,
    Sprint,
    ScoreBoost,
    Shield,
}

/// Every concrete spawnable
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SpawnKind {
    // Obstacles
    SingleBlock,
    DoubleBlock,
    Spike,
    DeadBush,
    // Items
    Coin,
    CoinBag,
    Emerald,
    Ruby,
    Sapphire,
    Health,
    Sprint,
    ScoreBoost,
    Shield,
    // Enemies
    BringerOfDeath,
    Hellhound,
    Ooze,
    Worm,
    Ghost,
    Bat,
    Golem,
    Cacodemon,
    Sorcerer,
}

/// A distinct death sequence carried by some enemies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeathSequence {
    pub frames: usize,
    pub size: Vec2,
    pub speed: f32,
}

/// Starting sprite data for a kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Template {
    pub frames: usize,
    pub size: Vec2,
    pub animation_speed: f32,
    /// Extra downward speed on top of the scroll speed
    pub drift: f32,
    /// Snap to a platform edge instead of a random x in the band
    pub edge_placed: bool,
    pub death: Option<DeathSequence>,
}

/// Frames in the generic explosion played by enemies without their own death
pub const EXPLOSION_FRAMES: usize = 10;

impl SpawnKind {
    pub const ALL: [SpawnKind; 22] = [
        SpawnKind::SingleBlock,
        SpawnKind::DoubleBlock,
        SpawnKind::Spike,
        SpawnKind::DeadBush,
        SpawnKind::Coin,
        SpawnKind::CoinBag,
        SpawnKind::Emerald,
        SpawnKind::Ruby,
        SpawnKind::Sapphire,
        SpawnKind::Health,
        SpawnKind::Sprint,
        SpawnKind::ScoreBoost,
        SpawnKind::Shield,
        SpawnKind::BringerOfDeath,
        SpawnKind::Hellhound,
        SpawnKind::Ooze,
        SpawnKind::Worm,
        SpawnKind::Ghost,
        SpawnKind::Bat,
        SpawnKind::Golem,
        SpawnKind::Cacodemon,
        SpawnKind::Sorcerer,
    ];

    pub fn class(self) -> ActorClass {
        use SpawnKind::*;
        match self {
            SingleBlock | DoubleBlock | Spike | DeadBush => ActorClass::Obstacle,
            Coin | CoinBag | Emerald | Ruby | Sapphire | Health | Sprint | ScoreBoost | Shield => {
                ActorClass::Item
            }
            BringerOfDeath | Hellhound | Ooze | Worm | Ghost | Bat | Golem | Cacodemon
            | Sorcerer => ActorClass::Enemy,
        }
    }

    /// Item effect, `None` for obstacles and enemies
    pub fn item_effect(self) -> Option<ItemEffect> {
        use SpawnKind::*;
        match self {
            Coin => Some(ItemEffect::Coins(1)),
            CoinBag => Some(ItemEffect::Coins(10)),
            Emerald => Some(ItemEffect::Coins(20)),
            Sapphire => Some(ItemEffect::Coins(25)),
            Ruby => Some(ItemEffect::Coins(30)),
            Health => Some(ItemEffect::Health),
            Sprint => Some(ItemEffect::Sprint),
            ScoreBoost => Some(ItemEffect::ScoreBoost),
            Shield => Some(ItemEffect::Shield),
            _ => None,
        }
    }

    pub fn weight(self, weights: &DropWeights) -> f32 {
        use SpawnKind::*;
        match self {
            SingleBlock => weights.single_block,
            DoubleBlock => weights.double_block,
            Spike => weights.spike,
            DeadBush => weights.dead_bush,
            Coin => weights.coin,
            CoinBag => weights.coin_bag,
            Emerald => weights.emerald,
            Ruby => weights.ruby,
            Sapphire => weights.sapphire,
            Health => weights.health,
            Sprint => weights.sprint,
            ScoreBoost => weights.score_boost,
            Shield => weights.shield,
            BringerOfDeath | Hellhound | Ooze | Worm | Ghost | Bat | Golem | Cacodemon
            | Sorcerer => weights.enemy,
        }
    }

    pub fn template(self) -> Template {
        use SpawnKind::*;
        let block = Vec2::new(BLOCK_WIDTH, BLOCK_HEIGHT);
        let item = Vec2::new(ITEM_WIDTH, ITEM_HEIGHT);
        let enemy = Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT);

        let still = |frames, size| Template {
            frames,
            size,
            animation_speed: 0.0,
            drift: 0.0,
            edge_placed: true,
            death: None,
        };
        let walker = |frames, speed, drift| Template {
            frames,
            size: enemy,
            animation_speed: speed,
            drift,
            edge_placed: true,
            death: None,
        };

        match self {
            SingleBlock => still(1, block),
            DoubleBlock => still(1, Vec2::new(BLOCK_WIDTH, BLOCK_HEIGHT * 2.0)),
            Spike => Template {
                animation_speed: 0.1,
                ..still(4, Vec2::new(SPIKE_WIDTH, SPIKE_HEIGHT))
            },
            DeadBush => still(1, Vec2::new(DEAD_BUSH_WIDTH, DEAD_BUSH_HEIGHT)),

            Coin => Template {
                animation_speed: 0.1,
                ..still(6, item)
            },
            CoinBag | Emerald | Ruby | Sapphire | Health | Sprint | ScoreBoost | Shield => {
                still(1, item)
            }

            BringerOfDeath => Template {
                death: Some(DeathSequence {
                    frames: 10,
                    size: Vec2::new(ENEMY_WIDTH * 1.5, ENEMY_HEIGHT),
                    speed: 0.2,
                }),
                ..walker(8, 0.1, 0.0)
            },
            Hellhound => walker(6, 0.1, 0.5),
            Ooze | Worm | Ghost => walker(1, 0.0, 0.0),
            Bat => walker(4, 0.1, 0.6),
            Golem => walker(8, 0.1, 0.0),
            Cacodemon => Template {
                death: Some(DeathSequence {
                    frames: 8,
                    size: enemy,
                    speed: 0.4,
                }),
                ..walker(6, 0.1, 0.1)
            },
            Sorcerer => walker(8, 0.06, 0.0),
        }
    }

    pub fn name(self) -> &'static str {
        use SpawnKind::*;
        match self {
            SingleBlock => "single_block",
            DoubleBlock => "double_block",
            Spike => "spike",
            DeadBush => "dead_bush",
            Coin => "coin",
            CoinBag => "coin_bag",
            Emerald => "emerald",
            Ruby => "ruby",
            Sapphire => "sapphire",
            Health => "health",
            Sprint => "sprint",
            ScoreBoost => "score_boost",
            Shield => "shield",
            BringerOfDeath => "bringer_of_death",
            Hellhound => "hellhound",
            Ooze => "ooze",
            Worm => "worm",
            Ghost => "ghost",
            Bat => "bat",
            Golem => "golem",
            Cacodemon => "cacodemon",
            Sorcerer => "sorcerer",
        }
    }
}

/// Cumulative-weight table for categorical kind selection
#[derive(Debug, Clone)]
pub struct Catalog {
    kinds: Vec<SpawnKind>,
    /// Running sum of weights, parallel to `kinds`
    cumulative: Vec<f32>,
}

impl Catalog {
    /// Build the table over every kind. Zero-weight kinds are never drawn.
    pub fn new(weights: &DropWeights) -> Result<Self, ConfigError> {
        Self::from_entries(SpawnKind::ALL.iter().map(|&k| (k, k.weight(weights))))
    }

    /// Build a table over an explicit set of kinds
    pub fn from_entries(
        entries: impl IntoIterator<Item = (SpawnKind, f32)>,
    ) -> Result<Self, ConfigError> {
        let mut kinds = Vec::new();
        let mut cumulative = Vec::new();
        let mut total = 0.0f32;

        for (kind, weight) in entries {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::InvalidWeight {
                    kind: kind.name().to_string(),
                    weight,
                });
            }
            if weight == 0.0 {
                continue;
            }
            total += weight;
            kinds.push(kind);
            cumulative.push(total);
        }

        if kinds.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        Ok(Self { kinds, cumulative })
    }

    pub fn total_weight(&self) -> f32 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Kinds that can be drawn
    pub fn kinds(&self) -> &[SpawnKind] {
        &self.kinds
    }

    /// Map a uniform draw in [0, 1) to a kind
    pub fn pick(&self, unit: f32) -> SpawnKind {
        let target = unit.clamp(0.0, 1.0) * self.total_weight();
        let idx = self.cumulative.partition_point(|&c| c <= target);
        self.kinds[idx.min(self.kinds.len() - 1)]
    }

    /// Draw one kind
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> SpawnKind {
        self.pick(rng.random::<f32>())
    }
}
