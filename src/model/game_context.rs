use serde::{Deserialize, Serialize};

use crate::model::battle::{BattleReport, BattleState};
use crate::model::game_state::{Character, GamePhase};
use crate::model::message::LogEntry;

/// What a front end needs to redraw after the engine handled something.
/// Read-only copy; the session keeps the authoritative state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    pub character: Character,
    pub phase: GamePhase,
    pub battle: Option<BattleState>,

    /// Chronicle entries appended since the previous view.
    pub new_entries: Vec<LogEntry>,

    /// Set when the view answers a battle command.
    pub report: Option<BattleReport>,
}
