// Gridiron console entry point.
//
// Startup sequence:
// 1. Load config
// 2. Initialize tracing per [logging] (log to file, not terminal)
// 3. Open database, pick the draft id
// 4. Load the player source (and the optional stats sheet)
// 5. Initialize DraftState
// 6. Replay any stored picks for this draft id
// 7. Read commands from stdin until quit or EOF

mod command;
mod render;
mod session;

use std::io::Write;
use std::path::Path;

use anyhow::Context;
use gridiron_core::config::{self, LoggingConfig};
use gridiron_core::db::Database;
use gridiron_core::DraftState;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::command::parse_command;
use crate::session::Session;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load config
    let config = config::load_config().context("failed to load configuration")?;

    // 2. Initialize tracing (log to file, not terminal)
    init_tracing(&config.logging)?;
    info!("Gridiron starting up");
    info!(
        "Config loaded: {} teams, {} rounds, drafting from slot {} ({} mode)",
        config.draft.total_teams,
        config.draft.total_rounds,
        config.draft.your_position,
        config.draft.score_mode.label()
    );

    // 3. Open database and choose the draft id. `gridiron new` abandons the
    //    stored draft and starts another.
    let db = Database::open(&config.db_path).context("failed to open database")?;
    info!("Database opened at {}", config.db_path);

    let start_new = std::env::args().skip(1).any(|a| a == "new");
    let draft_id = match db.get_draft_id()? {
        Some(id) if !start_new => id,
        _ => {
            let id = Database::generate_draft_id();
            db.set_draft_id(&id).context("failed to store draft id")?;
            info!("Started new draft {}", id);
            id
        }
    };

    // 4. Load the player source and stats
    let players = gridiron_data::load_player_source(&config.data_paths, config.draft.score_mode)
        .context("failed to load player rankings")?;
    info!("Loaded {} players", players.len());

    let stats = match config.data_paths.stats.as_deref() {
        Some(path) => match gridiron_data::load_stats(Path::new(path)) {
            Ok(book) => Some(book),
            Err(e) => {
                warn!("Stats lookup disabled: {}", e);
                None
            }
        },
        None => None,
    };

    // 5. Initialize DraftState
    let state = DraftState::new(config.draft.clone(), players).context("failed to start the draft")?;

    // 6. Replay stored picks
    let mut session = Session::new(
        state,
        db,
        draft_id,
        config.data_paths.clone(),
        stats,
        &config.autodraft,
    );
    match session.recover() {
        Ok(true) => info!("Draft {} restored from previous session", session.draft_id()),
        Ok(false) => info!("Starting fresh draft session {}", session.draft_id()),
        Err(e) => return Err(e.context("draft recovery failed")),
    }

    // 7. Command loop
    let mut stdout = std::io::stdout();
    writeln!(stdout, "Gridiron draft helper. Type `help` for commands.")?;
    writeln!(stdout, "{}", render::status(session.state()))?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let Some(line) = lines.next_line().await.context("failed to read input")? else {
            break;
        };
        let cmd = match parse_command(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(e) => {
                writeln!(stdout, "{e}")?;
                continue;
            }
        };
        if !session.execute(cmd, &mut stdout).await? {
            break;
        }
    }

    info!("Gridiron shut down cleanly");
    Ok(())
}

/// Send tracing output to `<dir>/gridiron.log`; the terminal belongs to
/// the console.
fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    let log_dir = Path::new(&logging.dir);
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;
    let log_file = std::fs::File::create(log_dir.join("gridiron.log"))
        .context("failed to create log file")?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.filter))
        .with_context(|| format!("invalid [logging] filter '{}'", logging.filter))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to set tracing subscriber: {e}"))
}
