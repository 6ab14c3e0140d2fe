// Woertle server entry point.
//
// Startup sequence:
// 1. Initialize tracing
// 2. Load config
// 3. Open database and seed the vocabulary from the word list
// 4. Build the game and guess service
// 5. Serve WebSocket clients until Ctrl+C

use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info, warn};
use woertle_core::store::load_vocabulary_file;
use woertle_core::{Database, Game};
use woertle_server::config;
use woertle_server::service::GuessService;
use woertle_server::ws_server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("Woertle starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: {}-letter words, {} attempts, port {}",
        config.game.word_length, config.game.max_attempts, config.ws_port
    );

    // 3. Open database and seed the vocabulary
    let db = Database::open(&config.db_path).context("failed to open database")?;
    info!("Database opened at {}", config.db_path);

    let inserted = load_vocabulary_file(&db, &config.wordlist_path, config.game.word_length)
        .context("failed to load word list")?;
    info!("Word list {} loaded, {inserted} new words", config.wordlist_path);

    // 4. Build the game
    let game = Game::new(db, config.game.rules()).context("failed to initialize game")?;
    if game.vocabulary().is_empty() {
        warn!(
            "Vocabulary is empty: no {}-letter words in {}",
            config.game.word_length, config.wordlist_path
        );
    }
    let service = Arc::new(GuessService::new(game));

    // 5. Serve until Ctrl+C
    let listener = ws_server::bind(config.ws_port)
        .await
        .with_context(|| format!("failed to bind WebSocket server on port {}", config.ws_port))?;

    tokio::select! {
        result = ws_server::run(listener, service) => {
            if let Err(e) = result {
                error!("WebSocket server error: {}", e);
                return Err(e.context("server stopped"));
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown requested");
        }
    }

    info!("Woertle shut down cleanly");
    Ok(())
}

/// Initialize tracing to stderr, filtered by `RUST_LOG`.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("woertle_server=info,woertle_core=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
