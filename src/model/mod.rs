pub mod battle;
pub mod enemy;
pub mod event_result;
pub mod game_context;
pub mod game_state;
pub mod llm_decode;
pub mod message;
pub mod narrative;
