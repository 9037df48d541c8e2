// Snake draft tracker entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Load the player reference list
// 4. Build the session registry
// 5. Run the stdin/stdout transport until EOF

use snakedraft_app::config;
use snakedraft_app::recommender::OfflineRecommender;
use snakedraft_app::transport;
use snakedraft_core::players::PlayerPool;
use snakedraft_core::session::{SessionId, SessionRegistry};

use anyhow::Context;
use tokio::io::{AsyncWriteExt, BufReader};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (log to file, not terminal)
    init_tracing()?;
    info!("Snake draft tracker starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: league={}, {} teams, my team {}",
        config.league.name, config.league.league_size, config.league.my_team
    );

    // 3. Load the player reference list
    let base_dir = std::env::current_dir()?;
    let players_path = config.players_path(&base_dir);
    let players = PlayerPool::load(&players_path)
        .with_context(|| format!("failed to load players from {}", players_path.display()))?;
    info!("Loaded {} players from {}", players.len(), players_path.display());

    // 4. Build the session registry
    let mut registry = SessionRegistry::new(config.draft_settings(), players);
    let session = SessionId::new("terminal");

    // 5. Run the transport until EOF
    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(
            format!(
                "{}: {}-team snake draft. Type .help for commands.\n\n",
                config.league.name, config.league.league_size
            )
            .as_bytes(),
        )
        .await?;
    stdout.flush().await?;

    transport::run(
        BufReader::new(tokio::io::stdin()),
        stdout,
        &mut registry,
        &session,
        &OfflineRecommender,
    )
    .await
    .context("transport loop failed")?;

    info!("Snake draft tracker shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (stdout carries the replies).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("snakedraft.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("snakedraft=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
