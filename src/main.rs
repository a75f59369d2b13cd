use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use warring_heroes::engine::narrator::{LlmNarrator, Narrator, OfflineNarrator};
use warring_heroes::ui::app::TerminalApp;
use warring_heroes::ui::settings::GameSettings;
use warring_heroes::ui::settings_io::load_settings_logged;

fn main() -> anyhow::Result<()> {
    let settings = load_settings_logged();

    // Logs go to stderr; stdout belongs to the game.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| settings.log_filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!(seed = ?settings.seed, "starting Warring Heroes");

    let narrator = build_narrator(&settings);
    let mut app = TerminalApp::new(&settings, narrator);
    app.run()
}

fn build_narrator(settings: &GameSettings) -> Arc<dyn Narrator> {
    if !settings.llm.enabled {
        tracing::info!("narrator disabled, running on fallback text");
        return Arc::new(OfflineNarrator);
    }

    match LlmNarrator::new(settings.llm.clone()) {
        Ok(narrator) => {
            match narrator.client().test_connection() {
                Ok(status) => tracing::info!(url = %settings.llm.base_url, "{status}"),
                Err(err) => tracing::warn!(
                    url = %settings.llm.base_url,
                    error = %format!("{err:#}"),
                    "narrator unreachable, fallback text will be used until it answers"
                ),
            }
            Arc::new(narrator)
        }
        Err(err) => {
            tracing::warn!(error = %err, "could not build narrator client");
            Arc::new(OfflineNarrator)
        }
    }
}
