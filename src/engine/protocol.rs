use crate::model::event_result::PlayerCommand;
use crate::model::game_context::SessionView;
use crate::model::game_state::CharacterSetup;
use crate::model::narrative::NarrationResult;

pub enum EngineCommand {
    CreateCharacter(CharacterSetup),
    Player(PlayerCommand),
    /// Sent back by narration workers; merged like any other command.
    NarrationReady(NarrationResult),
    Shutdown,
}

/// Every `CreateCharacter` and `Player` command gets exactly one
/// `Answered` or `Rejected`. `Narration` views arrive in between whenever
/// flavor text lands.
pub enum EngineResponse {
    Answered(SessionView),

    Narration(SessionView),

    Rejected {
        reason: String,
    },
}

impl EngineResponse {
    /// True for the reply to a front-end command.
    pub fn is_answer(&self) -> bool {
        !matches!(self, EngineResponse::Narration(_))
    }

    pub fn view(&self) -> Option<&SessionView> {
        match self {
            EngineResponse::Answered(view) | EngineResponse::Narration(view) => Some(view),
            EngineResponse::Rejected { .. } => None,
        }
    }
}
