pub mod engine;
pub mod protocol;
pub mod session;

pub mod combat;
pub mod economy;
pub mod encounter;
pub mod progression;
pub mod rng;

pub mod llm_client;
pub mod narrative_parser;
pub mod narrator;
pub mod prompt_builder;
