use serde::{Deserialize, Serialize};

use crate::model::game_state::Character;

/// Input for one line of battle commentary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentaryRequest {
    pub attacker: String,
    pub defender: String,
    pub damage: u32,
    pub critical: bool,
    pub attacker_is_player: bool,
}

/// A fire-and-forget request for flavor text.
/// Queued by the session, executed off the mechanical path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrationJob {
    pub id: u64,
    pub kind: NarrationKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NarrationKind {
    /// Snapshot of the character at request time; later mutations don't leak in.
    Event { character: Character, action: String },
    Commentary { encounter: u64, request: CommentaryRequest },
}

/// Where finished flavor text lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrationTarget {
    Chronicle,
    Battle { encounter: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrationResult {
    pub job: u64,
    pub target: NarrationTarget,
    pub text: String,
    /// The collaborator failed and a templated sentence was used.
    pub degraded: bool,
}
