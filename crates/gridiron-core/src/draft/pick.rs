// A single completed selection in the draft log.

use serde::{Deserialize, Serialize};

use super::player::Position;

/// One row of the draft log. `player_name` is the identity key used to replay
/// the pick against a fresh pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftPick {
    /// Global pick number (1-based).
    pub pick_number: u32,
    pub round: u32,
    /// Team that made the selection (1-based).
    pub team_number: u32,
    pub player_name: String,
    pub position: Position,
}
