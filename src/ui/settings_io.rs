use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::ui::settings::{GameSettings, DEFAULT_LOG_FILTER};

fn settings_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("warring_heroes");
    fs::create_dir_all(&path).ok();
    path.push("settings.json");
    path
}

/// Settings file, then `.env`, then the process environment.
pub fn load_settings() -> GameSettings {
    let path = settings_path();
    let mut settings = match fs::read_to_string(&path) {
        Ok(s) => serde_json::from_str(&s).unwrap_or_else(|err| {
            tracing::warn!(path = %path.display(), error = %err, "settings unreadable, using defaults");
            GameSettings::default()
        }),
        Err(_) => {
            let settings = GameSettings::default();
            if let Err(err) = save_settings(&settings) {
                tracing::warn!(error = %err, "could not write default settings");
            }
            settings
        }
    };

    dotenvy::dotenv().ok();
    settings.apply_overrides(|key| std::env::var(key).ok());
    settings
}

/// [`load_settings`] under a temporary stderr subscriber, so problems found
/// while loading are reported before the configured one is installed.
pub fn load_settings_logged() -> GameSettings {
    let bootstrap = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::with_default(bootstrap, load_settings)
}

pub fn save_settings(settings: &GameSettings) -> anyhow::Result<()> {
    let path = settings_path();
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(&path, json).with_context(|| format!("writing {}", path.display()))
}
