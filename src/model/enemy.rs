use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Boss,
}

impl Difficulty {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "normal" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            "boss" => Some(Difficulty::Boss),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Boss => "Boss",
        }
    }
}

/// Opponent of a single encounter. Discarded when the encounter resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    pub name: String,
    pub title: String,
    pub hp: u32,
    pub max_hp: u32,
    pub strength: u32,
    pub difficulty: Difficulty,
}

impl Enemy {
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        strength: u32,
        max_hp: u32,
        difficulty: Difficulty,
    ) -> Self {
        let max_hp = max_hp.max(1);
        Self {
            name: name.into(),
            title: title.into(),
            hp: max_hp,
            max_hp,
            strength,
            difficulty,
        }
    }

    pub fn is_defeated(&self) -> bool {
        self.hp == 0
    }
}

/// Raw enemy stat block as proposed by the narrative collaborator.
/// Nothing here is trusted until the encounter factory has validated it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyBlueprint {
    pub name: String,
    #[serde(default)]
    pub title: String,
    /// Models often emit floats for these; the factory rounds and clamps.
    #[serde(default)]
    pub strength: Option<f64>,
    #[serde(default, alias = "maxHp")]
    pub max_hp: Option<f64>,
    #[serde(default)]
    pub difficulty: String,
}
