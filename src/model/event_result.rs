use serde::{Deserialize, Serialize};

use crate::model::battle::{BattleAction, BattleReport};

/// The fixed player command surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerCommand {
    Patrol,
    Recruit,
    Govern,
    Rest,
    Attack,
    Skill,
    Defend,
}

impl PlayerCommand {
    pub const ALL: [PlayerCommand; 7] = [
        PlayerCommand::Patrol,
        PlayerCommand::Recruit,
        PlayerCommand::Govern,
        PlayerCommand::Rest,
        PlayerCommand::Attack,
        PlayerCommand::Skill,
        PlayerCommand::Defend,
    ];

    pub fn battle_action(self) -> Option<BattleAction> {
        match self {
            PlayerCommand::Attack => Some(BattleAction::Attack),
            PlayerCommand::Skill => Some(BattleAction::Skill),
            PlayerCommand::Defend => Some(BattleAction::Defend),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            PlayerCommand::Patrol => "patrol",
            PlayerCommand::Recruit => "recruit",
            PlayerCommand::Govern => "govern",
            PlayerCommand::Rest => "rest",
            PlayerCommand::Attack => "attack",
            PlayerCommand::Skill => "skill",
            PlayerCommand::Defend => "defend",
        }
    }

    fn shortcut(self) -> &'static str {
        match self {
            PlayerCommand::Patrol => "p",
            PlayerCommand::Recruit => "c",
            PlayerCommand::Govern => "g",
            PlayerCommand::Rest => "r",
            PlayerCommand::Attack => "a",
            PlayerCommand::Skill => "s",
            PlayerCommand::Defend => "d",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.keyword() == input || c.shortcut() == input)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommandOutcome {
    /// A free-roam action resolved. `ambush` carries the new encounter id if one started.
    Economy {
        command: PlayerCommand,
        ambush: Option<u64>,
    },
    Battle(BattleReport),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum CommandRejected {
    #[error("no character has been created yet")]
    NoCharacter,
    #[error("there is no battle to fight")]
    NotInBattle,
    #[error("cannot {0} while a battle is under way")]
    InBattle(String),
    #[error("wait for the enemy to finish its turn")]
    NotPlayerTurn,
}
