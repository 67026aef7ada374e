// Player records, positions, and score ordering.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Football roster positions. FLEX is a lineup slot, not a player position,
/// and lives in the lineup settings instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    Quarterback,
    RunningBack,
    WideReceiver,
    TightEnd,
    Kicker,
    Defense,
}

impl Position {
    /// Every position in display order.
    pub const ALL: [Position; 6] = [
        Position::Quarterback,
        Position::RunningBack,
        Position::WideReceiver,
        Position::TightEnd,
        Position::Kicker,
        Position::Defense,
    ];

    /// Parse a position abbreviation ("QB", "rb", "DST", "D/ST").
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "QB" => Some(Position::Quarterback),
            "RB" => Some(Position::RunningBack),
            "WR" => Some(Position::WideReceiver),
            "TE" => Some(Position::TightEnd),
            "K" | "PK" => Some(Position::Kicker),
            "DST" | "D/ST" | "DEF" => Some(Position::Defense),
            _ => None,
        }
    }

    /// Parse a positional-rank tag such as "RB12" or "WR1" by dropping the
    /// digits and reading what is left as a position.
    pub fn from_rank_tag(tag: &str) -> Option<Self> {
        let letters: String = tag.chars().filter(|c| !c.is_ascii_digit()).collect();
        Self::from_str_pos(&letters)
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Quarterback => "QB",
            Position::RunningBack => "RB",
            Position::WideReceiver => "WR",
            Position::TightEnd => "TE",
            Position::Kicker => "K",
            Position::Defense => "DST",
        }
    }

    /// Kickers and team defenses are only worth one roster spot each and are
    /// deferred to the final rounds.
    pub fn is_late_round_only(&self) -> bool {
        matches!(self, Position::Kicker | Position::Defense)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_str())
    }
}

// ---------------------------------------------------------------------------
// Score mode
// ---------------------------------------------------------------------------

/// How `PlayerRecord::score` is interpreted by the active data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreMode {
    /// Expert rank: lower is better.
    #[default]
    Rank,
    /// Projected fantasy points: higher is better.
    Points,
}

impl ScoreMode {
    /// Order two records so that the better one comes first.
    pub fn compare(&self, a: &PlayerRecord, b: &PlayerRecord) -> Ordering {
        match self {
            ScoreMode::Rank => a.score.total_cmp(&b.score),
            ScoreMode::Points => b.score.total_cmp(&a.score),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreMode::Rank => "rank",
            ScoreMode::Points => "points",
        }
    }
}

/// Rank assigned to a record whose source rank is missing or unparseable.
pub const UNRANKED_SENTINEL: f64 = 999.0;

// ---------------------------------------------------------------------------
// Player record
// ---------------------------------------------------------------------------

/// One draftable player as produced by a data source.
///
/// `name` is the identity key: two records with the same name are the same
/// player everywhere in the draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    pub position: Position,
    /// NFL team abbreviation; may be empty.
    pub team: String,
    /// Bye week as given by the source; may be empty.
    pub bye: String,
    /// Rank or projected points, depending on the pool's `ScoreMode`.
    pub score: f64,
}

impl PlayerRecord {
    pub fn new(name: impl Into<String>, position: Position, score: f64) -> Self {
        PlayerRecord {
            name: name.into(),
            position,
            team: String::new(),
            bye: String::new(),
            score,
        }
    }

    pub fn with_team(mut self, team: impl Into<String>, bye: impl Into<String>) -> Self {
        self.team = team.into();
        self.bye = bye.into();
        self
    }

    /// Case-insensitive comparison against a full name.
    pub fn name_matches(&self, other: &str) -> bool {
        self.name.trim().eq_ignore_ascii_case(other.trim())
    }
}

impl fmt::Display for PlayerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}", self.name, self.position)?;
        if !self.team.is_empty() {
            write!(f, ", {}", self.team)?;
        }
        f.write_str(")")
    }
}
