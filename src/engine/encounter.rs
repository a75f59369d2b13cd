use std::sync::Arc;

use crate::engine::narrator::{NarrativeError, Narrator};
use crate::engine::rng::GameRng;
use crate::model::enemy::{Difficulty, Enemy, EnemyBlueprint};

pub const FALLBACK_NAME: &str = "Roving Bandit";
pub const FALLBACK_TITLE: &str = "Brigand of the Hill Passes";

/// Half-open stat ranges for an enemy facing a general of a given level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatRanges {
    pub strength: (u32, u32),
    pub max_hp: (u32, u32),
}

impl StatRanges {
    pub fn for_level(level: u32) -> Self {
        let l = level;
        Self {
            strength: (
                10u32.saturating_add(l.saturating_mul(2)),
                20u32.saturating_add(l.saturating_mul(3)),
            ),
            max_hp: (
                50u32.saturating_add(l.saturating_mul(10)),
                100u32.saturating_add(l.saturating_mul(20)),
            ),
        }
    }
}

/// Produces enemies. Always returns a valid one, whatever the narrator does.
pub struct EncounterFactory {
    narrator: Arc<dyn Narrator>,
}

impl EncounterFactory {
    pub fn new(narrator: Arc<dyn Narrator>) -> Self {
        Self { narrator }
    }

    pub fn narrator(&self) -> Arc<dyn Narrator> {
        Arc::clone(&self.narrator)
    }

    pub fn create_enemy(&self, player_level: u32, rng: &mut GameRng) -> Enemy {
        let ranges = StatRanges::for_level(player_level);
        let attempt = self
            .narrator
            .generate_enemy(player_level)
            .and_then(|bp| build_enemy(bp, &ranges, rng));

        match attempt {
            Ok(enemy) => {
                tracing::debug!(name = %enemy.name, level = player_level, "enemy generated");
                enemy
            }
            Err(err) => {
                tracing::warn!(error = %err, level = player_level, "enemy generation failed, using fallback");
                fallback_enemy(player_level)
            }
        }
    }
}

/// Lower bounds of the level ranges, with placeholder identity.
pub fn fallback_enemy(player_level: u32) -> Enemy {
    let ranges = StatRanges::for_level(player_level);
    Enemy::new(
        FALLBACK_NAME,
        FALLBACK_TITLE,
        ranges.strength.0,
        ranges.max_hp.0,
        Difficulty::Easy,
    )
}

fn build_enemy(
    blueprint: EnemyBlueprint,
    ranges: &StatRanges,
    rng: &mut GameRng,
) -> Result<Enemy, NarrativeError> {
    let name = blueprint.name.trim();
    if name.is_empty() {
        return Err(NarrativeError::Malformed("enemy has no name".into()));
    }
    let difficulty = Difficulty::parse(&blueprint.difficulty).ok_or_else(|| {
        NarrativeError::Malformed(format!("unknown difficulty '{}'", blueprint.difficulty))
    })?;

    let strength = pick_stat(blueprint.strength, ranges.strength, rng)?;
    let max_hp = pick_stat(blueprint.max_hp, ranges.max_hp, rng)?;

    let title = blueprint.title.trim();
    let title = if title.is_empty() { "Nameless Captain" } else { title };

    Ok(Enemy::new(name, title, strength, max_hp, difficulty))
}

/// Suggested value clamped into `[low, high)`; rolled locally when absent.
fn pick_stat(
    suggested: Option<f64>,
    (low, high): (u32, u32),
    rng: &mut GameRng,
) -> Result<u32, NarrativeError> {
    let top = high.saturating_sub(1).max(low);
    match suggested {
        None => Ok(rng.range(low, high)),
        Some(v) if v.is_finite() => {
            let v = v.round().clamp(f64::from(low), f64::from(top));
            Ok(v as u32)
        }
        Some(v) => Err(NarrativeError::Malformed(format!("stat value {v} is not a number"))),
    }
}
