// Draft error taxonomy.

use thiserror::Error;

use crate::draft::player::PlayerRecord;

/// Every way a draft operation can fail. A failed operation leaves the draft
/// exactly as it was.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DraftError {
    #[error("no available player matches '{query}'")]
    PlayerNotFound { query: String },

    #[error("'{query}' matches {} players; use a full name", candidates.len())]
    AmbiguousPlayer {
        query: String,
        candidates: Vec<PlayerRecord>,
    },

    #[error("invalid configuration for `{field}`: {message}")]
    InvalidConfiguration { field: String, message: String },

    #[error("no suitable auto-draft candidate for team {team}")]
    NoSuitableCandidate { team: u32 },

    #[error("rankings unavailable: {reason}")]
    RankingsUnavailable { reason: String },

    #[error("the draft is complete ({total_picks} picks made)")]
    DraftComplete { total_picks: u32 },

    #[error("no picks to undo")]
    NothingToUndo,
}
