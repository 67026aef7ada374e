// Snake-draft state tracking and pick recommendation for fantasy football.

pub mod config;
pub mod db;
pub mod draft;
pub mod error;

pub use config::{Config, DraftConfiguration, LineupSettings, RosterLimits};
pub use draft::autopick::AutoPickCandidate;
pub use draft::board::BoardSlot;
pub use draft::pick::DraftPick;
pub use draft::player::{PlayerRecord, Position, ScoreMode, UNRANKED_SENTINEL};
pub use draft::pool::{Lookup, PlayerPool};
pub use draft::roster::{Need, NeedPriority, Roster};
pub use draft::sequencer::SnakeOrder;
pub use draft::state::{DraftState, TaggedPlayer};
pub use draft::suggest::Suggestion;
pub use draft::tags::PlayerTag;
pub use error::DraftError;
