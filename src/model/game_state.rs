use serde::{Deserialize, Serialize};

/// The player's general. Owned by the session for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub faction: Faction,
    pub role: Role,

    pub level: u32,
    pub exp: u32,
    pub max_exp: u32,

    pub hp: u32,
    pub max_hp: u32,

    /// Physical attacks
    pub strength: u32,
    /// Stratagems and governance
    pub intellect: u32,

    pub gold: u32,
    pub troops: u32,
}

pub const STARTING_LEVEL: u32 = 1;
pub const STARTING_MAX_EXP: u32 = 100;
pub const STARTING_HP: u32 = 100;
pub const STARTING_GOLD: u32 = 100;
pub const STARTING_TROOPS: u32 = 500;

impl Character {
    pub fn new(name: impl Into<String>, faction: Faction, role: Role) -> Self {
        let (strength, intellect) = role.base_stats();
        Self {
            name: name.into(),
            faction,
            role,
            level: STARTING_LEVEL,
            exp: 0,
            max_exp: STARTING_MAX_EXP,
            hp: STARTING_HP,
            max_hp: STARTING_HP,
            strength,
            intellect,
            gold: STARTING_GOLD,
            troops: STARTING_TROOPS,
        }
    }

    pub fn is_defeated(&self) -> bool {
        self.hp == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    Wei,
    Shu,
    Wu,
    /// Unaligned warlord
    #[default]
    Neutral,
}

impl Faction {
    /// Factions offered when raising a banner.
    pub const PLAYABLE: [Faction; 3] = [Faction::Wei, Faction::Shu, Faction::Wu];

    pub fn label(self) -> &'static str {
        match self {
            Faction::Wei => "Wei",
            Faction::Shu => "Shu",
            Faction::Wu => "Wu",
            Faction::Neutral => "the unaligned",
        }
    }

    pub fn leader(self) -> Option<&'static str> {
        match self {
            Faction::Wei => Some("Cao Cao"),
            Faction::Shu => Some("Liu Bei"),
            Faction::Wu => Some("Sun Quan"),
            Faction::Neutral => None,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Faction::Wei => {
                "Holds the Emperor hostage to command the lords; master of the north with vast armies."
            }
            Faction::Shu => {
                "Founded on benevolence, guarding the western river lands with the Five Tiger Generals."
            }
            Faction::Wu => {
                "Shielded by the Yangtze, rich in southern talent and unrivalled on the water."
            }
            Faction::Neutral => "Beholden to no lord, wandering the realm in search of a cause.",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "wei" | "魏" => Some(Faction::Wei),
            "shu" | "蜀" => Some(Faction::Shu),
            "wu" | "吴" => Some(Faction::Wu),
            "neutral" | "在野" => Some(Faction::Neutral),
            _ => None,
        }
    }

    /// Like [`Faction::parse`], limited to the kingdoms offered at setup.
    pub fn parse_playable(input: &str) -> Option<Self> {
        Self::parse(input).filter(|f| Self::PLAYABLE.contains(f))
    }
}

/// Background chosen at setup; decides the starting stat split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Warrior,
    Strategist,
}

impl Role {
    /// (strength, intellect)
    pub fn base_stats(self) -> (u32, u32) {
        match self {
            Role::Warrior => (20, 10),
            Role::Strategist => (10, 20),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Warrior => "Valiant General",
            Role::Strategist => "Court Strategist",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "warrior" | "general" => Some(Role::Warrior),
            "strategist" | "advisor" => Some(Role::Strategist),
            _ => None,
        }
    }
}

/// Choices made on the setup screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSetup {
    pub name: String,
    pub faction: Faction,
    pub role: Role,
}

/// Where the player currently is in the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    Roaming,
    Battle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_decides_starting_split() {
        let warrior = Character::new("Zhao Yun", Faction::Shu, Role::Warrior);
        assert_eq!((warrior.strength, warrior.intellect), (20, 10));

        let strategist = Character::new("Zhuge Liang", Faction::Shu, Role::Strategist);
        assert_eq!((strategist.strength, strategist.intellect), (10, 20));
        assert_eq!(strategist.hp, strategist.max_hp);
        assert_eq!(strategist.gold, 100);
        assert_eq!(strategist.troops, 500);
    }

    #[test]
    fn faction_parse_accepts_both_scripts() {
        assert_eq!(Faction::parse(" Wei "), Some(Faction::Wei));
        assert_eq!(Faction::parse("吴"), Some(Faction::Wu));
        assert_eq!(Faction::parse("qin"), None);
        assert!(Faction::Neutral.leader().is_none());
    }

    #[test]
    fn setup_only_offers_the_three_kingdoms() {
        assert_eq!(Faction::parse_playable("shu"), Some(Faction::Shu));
        assert_eq!(Faction::parse_playable("魏"), Some(Faction::Wei));
        assert_eq!(Faction::parse_playable("neutral"), None);
        assert_eq!(Faction::parse_playable("在野"), None);
    }
}
