//! The narrative collaborator: best-effort flavor text and enemy stat blocks.
//!
//! Nothing here decides an outcome. Every call may fail; callers substitute
//! the fallbacks below and never retry.

use crate::engine::encounter::StatRanges;
use crate::engine::llm_client::{LlmClient, LlmConfig};
use crate::engine::narrative_parser::{parse_commentary, parse_narrative};
use crate::engine::prompt_builder::PromptBuilder;
use crate::model::enemy::EnemyBlueprint;
use crate::model::game_state::Character;
use crate::model::llm_decode::decode_enemy_blueprint;
use crate::model::narrative::{
    CommentaryRequest, NarrationJob, NarrationKind, NarrationResult, NarrationTarget,
};

#[derive(Debug, thiserror::Error)]
pub enum NarrativeError {
    #[error("narrator unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("narrator answered with HTTP {0}")]
    Status(u16),
    #[error("narrator returned nothing")]
    EmptyResponse,
    #[error("narrator output malformed: {0}")]
    Malformed(String),
    #[error("narrator disabled")]
    Unavailable,
}

pub trait Narrator: Send + Sync {
    fn event_narrative(&self, character: &Character, action: &str) -> Result<String, NarrativeError>;

    fn generate_enemy(&self, player_level: u32) -> Result<EnemyBlueprint, NarrativeError>;

    fn battle_commentary(&self, request: &CommentaryRequest) -> Result<String, NarrativeError>;
}

/// Narrator backed by a chat-completions endpoint.
pub struct LlmNarrator {
    client: LlmClient,
}

impl LlmNarrator {
    pub fn new(config: LlmConfig) -> Result<Self, NarrativeError> {
        Ok(Self {
            client: LlmClient::new(config)?,
        })
    }

    pub fn client(&self) -> &LlmClient {
        &self.client
    }
}

impl Narrator for LlmNarrator {
    fn event_narrative(&self, character: &Character, action: &str) -> Result<String, NarrativeError> {
        let raw = self
            .client
            .complete(PromptBuilder::system(), &PromptBuilder::event(character, action))?;
        parse_narrative(&raw).ok_or(NarrativeError::EmptyResponse)
    }

    fn generate_enemy(&self, player_level: u32) -> Result<EnemyBlueprint, NarrativeError> {
        let prompt = PromptBuilder::enemy(player_level, &StatRanges::for_level(player_level));
        let raw = self.client.complete(PromptBuilder::system(), &prompt)?;
        decode_enemy_blueprint(&raw).map_err(NarrativeError::Malformed)
    }

    fn battle_commentary(&self, request: &CommentaryRequest) -> Result<String, NarrativeError> {
        let raw = self
            .client
            .complete(PromptBuilder::system(), &PromptBuilder::commentary(request))?;
        parse_commentary(&raw).ok_or(NarrativeError::EmptyResponse)
    }
}

/// Used when no LLM is configured; the engine runs purely on fallbacks.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineNarrator;

impl Narrator for OfflineNarrator {
    fn event_narrative(&self, _: &Character, _: &str) -> Result<String, NarrativeError> {
        Err(NarrativeError::Unavailable)
    }

    fn generate_enemy(&self, _: u32) -> Result<EnemyBlueprint, NarrativeError> {
        Err(NarrativeError::Unavailable)
    }

    fn battle_commentary(&self, _: &CommentaryRequest) -> Result<String, NarrativeError> {
        Err(NarrativeError::Unavailable)
    }
}

pub fn fallback_event(action: &str) -> String {
    format!("You set out to {action}; there are setbacks, but nothing serious.")
}

pub fn fallback_commentary(request: &CommentaryRequest) -> String {
    if request.critical {
        format!(
            "{} finds an opening and strikes {} for a crushing {} damage!",
            request.attacker, request.defender, request.damage
        )
    } else {
        format!(
            "{} strikes {} for {} damage.",
            request.attacker, request.defender, request.damage
        )
    }
}

/// Run one queued job to completion. Failures degrade to templated text.
pub fn run_job(narrator: &dyn Narrator, job: &NarrationJob) -> NarrationResult {
    let (target, attempt, fallback) = match &job.kind {
        NarrationKind::Event { character, action } => (
            NarrationTarget::Chronicle,
            narrator.event_narrative(character, action),
            fallback_event(action),
        ),
        NarrationKind::Commentary { encounter, request } => (
            NarrationTarget::Battle {
                encounter: *encounter,
            },
            narrator.battle_commentary(request),
            fallback_commentary(request),
        ),
    };

    match attempt {
        Ok(text) => NarrationResult {
            job: job.id,
            target,
            text,
            degraded: false,
        },
        Err(err) => {
            tracing::warn!(job = job.id, error = %err, "narration failed, using fallback");
            NarrationResult {
                job: job.id,
                target,
                text: fallback,
                degraded: true,
            }
        }
    }
}
