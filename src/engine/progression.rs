use crate::model::game_state::Character;
use crate::model::message::{GameLog, LogCategory};

pub const LEVEL_HP_BONUS: u32 = 20;
pub const LEVEL_STAT_BONUS: u32 = 2;

/// Partial set of absolute attribute values.
/// Signed so callers can hand over raw arithmetic; out-of-range values are clamped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharacterUpdate {
    pub exp: Option<i64>,
    pub hp: Option<i64>,
    pub max_hp: Option<i64>,
    pub strength: Option<i64>,
    pub intellect: Option<i64>,
    pub gold: Option<i64>,
    pub troops: Option<i64>,
}

impl CharacterUpdate {
    pub fn exp(mut self, value: i64) -> Self {
        self.exp = Some(value);
        self
    }

    pub fn hp(mut self, value: i64) -> Self {
        self.hp = Some(value);
        self
    }

    pub fn max_hp(mut self, value: i64) -> Self {
        self.max_hp = Some(value);
        self
    }

    pub fn strength(mut self, value: i64) -> Self {
        self.strength = Some(value);
        self
    }

    pub fn intellect(mut self, value: i64) -> Self {
        self.intellect = Some(value);
        self
    }

    pub fn gold(mut self, value: i64) -> Self {
        self.gold = Some(value);
        self
    }

    pub fn troops(mut self, value: i64) -> Self {
        self.troops = Some(value);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn clamp_u32(value: i64, min: u32) -> u32 {
    value.clamp(i64::from(min), i64::from(u32::MAX)) as u32
}

/// Apply `update` and normalize: level up while `exp >= max_exp`, then cap hp.
/// Returns the number of levels gained.
pub fn apply_update(character: &mut Character, update: CharacterUpdate, log: &mut GameLog) -> u32 {
    if let Some(v) = update.max_hp {
        character.max_hp = clamp_u32(v, 1);
    }
    if let Some(v) = update.hp {
        character.hp = clamp_u32(v, 0);
    }
    if let Some(v) = update.exp {
        character.exp = clamp_u32(v, 0);
    }
    if let Some(v) = update.strength {
        character.strength = clamp_u32(v, 0);
    }
    if let Some(v) = update.intellect {
        character.intellect = clamp_u32(v, 0);
    }
    if let Some(v) = update.gold {
        character.gold = clamp_u32(v, 0);
    }
    if let Some(v) = update.troops {
        character.troops = clamp_u32(v, 0);
    }

    let mut gained = 0;
    while character.exp >= character.max_exp {
        level_up(character);
        gained += 1;
        log.push(
            LogCategory::Gain,
            format!(
                "Congratulations! {} rises to level {}; every attribute grows.",
                character.name, character.level
            ),
        );
        tracing::info!(
            name = %character.name,
            level = character.level,
            "level up"
        );
    }

    character.hp = character.hp.min(character.max_hp);
    gained
}

fn level_up(character: &mut Character) {
    character.exp -= character.max_exp;
    character.level = character.level.saturating_add(1);
    // floor(max_exp * 1.2) without leaving integers
    let grown = u64::from(character.max_exp) * 6 / 5;
    character.max_exp = u32::try_from(grown).unwrap_or(u32::MAX).max(1);
    character.max_hp = character.max_hp.saturating_add(LEVEL_HP_BONUS);
    character.hp = character.max_hp;
    character.strength = character.strength.saturating_add(LEVEL_STAT_BONUS);
    character.intellect = character.intellect.saturating_add(LEVEL_STAT_BONUS);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::game_state::{Faction, Role};

    fn general() -> Character {
        Character::new("Guan Yu", Faction::Shu, Role::Warrior)
    }

    fn assert_invariants(c: &Character) {
        assert!(c.hp <= c.max_hp, "hp {} > max_hp {}", c.hp, c.max_hp);
        assert!(c.exp < c.max_exp, "exp {} >= max_exp {}", c.exp, c.max_exp);
        assert!(c.max_hp >= 1 && c.max_exp >= 1 && c.level >= 1);
    }

    #[test]
    fn single_level_up_applies_all_growth() {
        let mut c = general();
        c.hp = 40;
        let mut log = GameLog::new();

        let gained = apply_update(&mut c, CharacterUpdate::default().exp(130), &mut log);

        assert_eq!(gained, 1);
        assert_eq!(c.level, 2);
        assert_eq!(c.exp, 30);
        assert_eq!(c.max_exp, 120);
        assert_eq!(c.max_hp, 120);
        assert_eq!(c.hp, 120);
        assert_eq!((c.strength, c.intellect), (22, 12));
        assert_eq!(log.count(LogCategory::Gain), 1);
    }

    #[test]
    fn large_overflow_levels_repeatedly() {
        let mut c = general();
        let mut log = GameLog::new();

        // 100 + 120 + 144 = 364 consumed, 36 left over
        let gained = apply_update(&mut c, CharacterUpdate::default().exp(400), &mut log);

        assert_eq!(gained, 3);
        assert_eq!(c.level, 4);
        assert_eq!(c.exp, 36);
        assert_eq!(c.max_exp, 172);
        assert_eq!(c.max_hp, 160);
        assert_eq!(log.count(LogCategory::Gain), 3);
        assert_invariants(&c);
    }

    #[test]
    fn exact_threshold_lands_on_zero_once() {
        let mut c = general();
        let mut log = GameLog::new();

        apply_update(&mut c, CharacterUpdate::default().exp(100), &mut log);
        assert_eq!((c.level, c.exp), (2, 0));

        // a no-op update must not level again
        apply_update(&mut c, CharacterUpdate::default(), &mut log);
        assert_eq!((c.level, c.exp), (2, 0));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn negative_values_clamp_to_zero() {
        let mut c = general();
        let mut log = GameLog::new();

        apply_update(
            &mut c,
            CharacterUpdate::default().gold(-30).troops(-1).hp(-5).exp(-9),
            &mut log,
        );

        assert_eq!((c.gold, c.troops, c.hp, c.exp), (0, 0, 0, 0));
        assert!(log.is_empty());
    }

    #[test]
    fn hp_is_capped_at_max() {
        let mut c = general();
        let mut log = GameLog::new();
        apply_update(&mut c, CharacterUpdate::default().hp(10_000), &mut log);
        assert_eq!(c.hp, c.max_hp);

        apply_update(&mut c, CharacterUpdate::default().max_hp(0), &mut log);
        assert_eq!(c.max_hp, 1);
        assert_eq!(c.hp, 1);
    }

    #[test]
    fn invariants_hold_across_arbitrary_updates() {
        let mut rng = crate::engine::rng::GameRng::seeded(2024);
        let mut c = general();
        let mut log = GameLog::new();

        for _ in 0..500 {
            let pick = |rng: &mut crate::engine::rng::GameRng| {
                i64::from(rng.range(0, 4_000)) - 1_000
            };
            let update = CharacterUpdate {
                exp: rng.chance(0.6).then(|| pick(&mut rng)),
                hp: rng.chance(0.5).then(|| pick(&mut rng)),
                max_hp: rng.chance(0.1).then(|| pick(&mut rng)),
                strength: rng.chance(0.2).then(|| pick(&mut rng)),
                intellect: rng.chance(0.2).then(|| pick(&mut rng)),
                gold: rng.chance(0.5).then(|| pick(&mut rng)),
                troops: rng.chance(0.5).then(|| pick(&mut rng)),
            };
            apply_update(&mut c, update, &mut log);
            assert_invariants(&c);
        }
    }
}
