use serde::{Deserialize, Serialize};

use crate::engine::llm_client::LlmConfig;

pub const DEFAULT_LOG_FILTER: &str = "warring_heroes=info";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GameSettings {
    pub llm: LlmConfig,

    /// Fixed seed for a replayable session; entropy when absent.
    pub seed: Option<u64>,

    /// Pause before the enemy's answer is shown.
    pub reveal_delay_ms: u64,

    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            seed: None,
            reveal_delay_ms: 1500,
            log_filter: DEFAULT_LOG_FILTER.into(),
        }
    }
}

impl GameSettings {
    /// Apply `WARRING_HEROES_*` overrides from a variable lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("WARRING_HEROES_LLM_URL") {
            self.llm.base_url = url;
        }
        if let Some(model) = lookup("WARRING_HEROES_LLM_MODEL") {
            self.llm.model = model;
        }
        if let Some(key) = lookup("WARRING_HEROES_LLM_API_KEY") {
            self.llm.api_key = Some(key).filter(|k| !k.trim().is_empty());
        }
        if let Some(enabled) = lookup("WARRING_HEROES_LLM_ENABLED") {
            match enabled.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.llm.enabled = true,
                "0" | "false" | "no" | "off" => self.llm.enabled = false,
                other => tracing::warn!(value = other, "ignoring WARRING_HEROES_LLM_ENABLED"),
            }
        }
        if let Some(seed) = lookup("WARRING_HEROES_SEED") {
            match seed.trim().parse() {
                Ok(seed) => self.seed = Some(seed),
                Err(_) => tracing::warn!(value = %seed, "ignoring WARRING_HEROES_SEED"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut settings = GameSettings::default();
        settings.apply_overrides(lookup(&[
            ("WARRING_HEROES_LLM_URL", "http://10.0.0.2:11434/v1"),
            ("WARRING_HEROES_LLM_ENABLED", "off"),
            ("WARRING_HEROES_SEED", "42"),
        ]));

        assert_eq!(settings.llm.base_url, "http://10.0.0.2:11434/v1");
        assert!(!settings.llm.enabled);
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.llm.model, LlmConfig::default().model);
    }

    #[test]
    fn bad_values_are_ignored() {
        let mut settings = GameSettings::default();
        settings.apply_overrides(lookup(&[
            ("WARRING_HEROES_LLM_ENABLED", "maybe"),
            ("WARRING_HEROES_SEED", "forty-two"),
            ("WARRING_HEROES_LLM_API_KEY", " "),
        ]));
        assert_eq!(settings, GameSettings::default());
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn rejected_overrides_are_reported() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            GameSettings::default().apply_overrides(lookup(&[("WARRING_HEROES_SEED", "forty-two")]));
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("ignoring WARRING_HEROES_SEED"), "{output}");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let settings: GameSettings = serde_json::from_str(r#"{ "seed": 7 }"#).unwrap();
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.reveal_delay_ms, 1500);
        assert!(settings.llm.enabled);
    }
}
