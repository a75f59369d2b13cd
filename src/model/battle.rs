use serde::{Deserialize, Serialize};

use crate::model::enemy::Enemy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleAction {
    Attack,
    Skill,
    Defend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleOutcome {
    Win,
    Loss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    PlayerTurn,
    Resolving,
    EnemyTurn,
    Concluded(BattleOutcome),
}

/// One active encounter. Created when an ambush starts, dropped when it resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleState {
    /// Session-unique encounter number, used to route late commentary.
    pub encounter: u64,
    pub active: bool,
    pub round: u32,
    pub enemy: Enemy,
    pub player_turn: bool,
    pub phase: TurnPhase,
    /// Halves the next enemy strike.
    pub defending: bool,
    pub log: Vec<String>,
}

impl BattleState {
    pub fn new(encounter: u64, enemy: Enemy) -> Self {
        let opening = format!("You encounter {} {}!", enemy.title, enemy.name);
        Self {
            encounter,
            active: true,
            round: 1,
            enemy,
            player_turn: true,
            phase: TurnPhase::PlayerTurn,
            defending: false,
            log: vec![opening],
        }
    }

    pub fn is_concluded(&self) -> bool {
        matches!(self.phase, TurnPhase::Concluded(_))
    }
}

/// Mechanical result of one side's action in an exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strike {
    pub damage: u32,
    pub critical: bool,
}

/// Everything a single player battle command caused, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleReport {
    pub encounter: u64,
    pub round: u32,
    pub action: BattleAction,
    /// `None` for Defend.
    pub player_strike: Option<Strike>,
    /// `None` when the enemy fell before it could answer.
    pub enemy_strike: Option<Strike>,
    pub conclusion: Option<Conclusion>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Conclusion {
    Win { gold: u32, exp: u32 },
    Loss { gold_lost: u32, troops_lost: u32 },
}

impl Conclusion {
    pub fn outcome(&self) -> BattleOutcome {
        match self {
            Conclusion::Win { .. } => BattleOutcome::Win,
            Conclusion::Loss { .. } => BattleOutcome::Loss,
        }
    }
}
