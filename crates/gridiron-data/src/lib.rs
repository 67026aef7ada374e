// CSV data sources for the draft: rankings, projections, and season stats.

pub mod error;
pub mod projections;
pub mod rankings;
pub mod stats;

use std::path::Path;

use gridiron_core::config::DataPaths;
use gridiron_core::{PlayerRecord, ScoreMode};

pub use error::LoadError;
pub use projections::{apply_projections, load_projections};
pub use rankings::load_rankings;
pub use stats::{load_stats, CareerTotals, PlayerHistory, StatLine, StatsBook};

/// Load the player source for a score mode. Points mode joins the
/// projections sheet onto the rankings sheet.
pub fn load_player_source(paths: &DataPaths, mode: ScoreMode) -> Result<Vec<PlayerRecord>, LoadError> {
    let rankings = load_rankings(Path::new(&paths.rankings))?;
    match mode {
        ScoreMode::Rank => Ok(rankings),
        ScoreMode::Points => {
            let Some(projections_path) = paths.projections.as_deref() else {
                return Err(LoadError::Validation(
                    "points mode needs a projections file".into(),
                ));
            };
            let points = load_projections(Path::new(projections_path))?;
            let players = apply_projections(&rankings, &points);
            if players.is_empty() {
                return Err(LoadError::Validation(
                    "no projected player matched the rankings sheet".into(),
                ));
            }
            Ok(players)
        }
    }
}
