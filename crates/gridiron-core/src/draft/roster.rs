// Per-team roster ledger and positional need evaluation.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::player::{PlayerRecord, Position};
use crate::config::RosterLimits;

// ---------------------------------------------------------------------------
// Need priority
// ---------------------------------------------------------------------------

/// How urgently a team should add a position. Declaration order is urgency
/// order, so sorting puts `High` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NeedPriority {
    High,
    Medium,
    Low,
}

impl NeedPriority {
    /// Bonus added to a candidate's suggestion score when its position carries
    /// this priority.
    pub fn bonus(&self) -> f64 {
        match self {
            NeedPriority::High => 30.0,
            NeedPriority::Medium => 15.0,
            NeedPriority::Low => 5.0,
        }
    }
}

impl fmt::Display for NeedPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NeedPriority::High => "High",
            NeedPriority::Medium => "Medium",
            NeedPriority::Low => "Low",
        };
        f.write_str(s)
    }
}

/// A position and how badly the team needs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Need {
    pub position: Position,
    pub priority: NeedPriority,
}

/// Desired roster counts: below `min` is urgent, below `max` is still useful.
fn need_band(position: Position) -> (usize, usize) {
    match position {
        Position::Quarterback => (1, 2),
        Position::RunningBack => (2, 4),
        Position::WideReceiver => (2, 4),
        Position::TightEnd => (1, 2),
        Position::Kicker => (1, 1),
        Position::Defense => (1, 1),
    }
}

// ---------------------------------------------------------------------------
// Roster
// ---------------------------------------------------------------------------

/// The players one team has drafted, in the order they were taken.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    pub team_number: u32,
    /// Operator-assigned name; defaults to "Team N".
    pub display_name: String,
    players: Vec<PlayerRecord>,
}

impl Roster {
    pub fn new(team_number: u32) -> Self {
        Roster {
            team_number,
            display_name: format!("Team {team_number}"),
            players: Vec::new(),
        }
    }

    pub fn players(&self) -> &[PlayerRecord] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn has_player(&self, name: &str) -> bool {
        self.players.iter().any(|p| p.name_matches(name))
    }

    pub(crate) fn push(&mut self, player: PlayerRecord) {
        self.players.push(player);
    }

    pub(crate) fn pop(&mut self) -> Option<PlayerRecord> {
        self.players.pop()
    }

    pub(crate) fn clear(&mut self) {
        self.players.clear();
    }

    pub fn count(&self, position: Position) -> usize {
        self.players.iter().filter(|p| p.position == position).count()
    }

    /// Counts for every position in display order, zeros included.
    pub fn position_counts(&self) -> Vec<(Position, usize)> {
        Position::ALL.iter().map(|&pos| (pos, self.count(pos))).collect()
    }

    /// Priority-banded positional needs, most urgent first.
    ///
    /// Bands are clamped to the roster limit, and positions the league does
    /// not roster (limit 0) are left out. Kickers and defenses drop out of the
    /// list once one is rostered.
    pub fn needs(&self, limits: &RosterLimits) -> Vec<Need> {
        let mut needs: Vec<Need> = Position::ALL
            .iter()
            .filter_map(|&position| {
                let limit = limits.get(position);
                if limit == 0 {
                    return None;
                }
                let count = self.count(position);
                if position.is_late_round_only() && count >= 1 {
                    return None;
                }

                let (band_min, band_max) = need_band(position);
                let (min, max) = (band_min.min(limit), band_max.min(limit));
                let priority = if count < min {
                    NeedPriority::High
                } else if count < max {
                    NeedPriority::Medium
                } else {
                    NeedPriority::Low
                };
                Some(Need { position, priority })
            })
            .collect();

        needs.sort_by_key(|n| n.priority);
        needs
    }

    /// Open roster spots per position (`limit - count`), positions with no
    /// room omitted. Used for display and to decide which positions the
    /// auto-drafter may still fill.
    pub fn slots_remaining(&self, limits: &RosterLimits) -> Vec<(Position, usize)> {
        Position::ALL
            .iter()
            .filter_map(|&pos| {
                let open = limits.get(pos).saturating_sub(self.count(pos));
                (open > 0).then_some((pos, open))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_limits() -> RosterLimits {
        RosterLimits {
            QB: 2,
            RB: 6,
            WR: 6,
            TE: 2,
            K: 1,
            DST: 1,
        }
    }

    fn player(name: &str, pos: Position) -> PlayerRecord {
        PlayerRecord::new(name, pos, 50.0)
    }

    fn priority_of(needs: &[Need], pos: Position) -> Option<NeedPriority> {
        needs.iter().find(|n| n.position == pos).map(|n| n.priority)
    }

    #[test]
    fn position_counts_cover_every_position() {
        let mut roster = Roster::new(1);
        roster.push(player("Saquon Barkley", Position::RunningBack));
        roster.push(player("Josh Allen", Position::Quarterback));
        roster.push(player("Bijan Robinson", Position::RunningBack));
        roster.push(player("Ravens D/ST", Position::Defense));

        assert_eq!(
            roster.position_counts(),
            vec![
                (Position::Quarterback, 1),
                (Position::RunningBack, 2),
                (Position::WideReceiver, 0),
                (Position::TightEnd, 0),
                (Position::Kicker, 0),
                (Position::Defense, 1),
            ]
        );
    }

    #[test]
    fn empty_roster_needs_everything() {
        let roster = Roster::new(1);
        let needs = roster.needs(&test_limits());
        assert_eq!(needs.len(), 6);
        assert!(needs.iter().all(|n| n.priority == NeedPriority::High));
        // Stable sort keeps display order among equals.
        assert_eq!(needs[0].position, Position::Quarterback);
        assert_eq!(needs[5].position, Position::Defense);
    }

    #[test]
    fn needs_follow_bands() {
        let mut roster = Roster::new(1);
        roster.push(player("QB One", Position::Quarterback));
        roster.push(player("RB One", Position::RunningBack));
        roster.push(player("RB Two", Position::RunningBack));
        for i in 0..4 {
            roster.push(player(&format!("WR {i}"), Position::WideReceiver));
        }

        let needs = roster.needs(&test_limits());
        assert_eq!(priority_of(&needs, Position::Quarterback), Some(NeedPriority::Medium));
        assert_eq!(priority_of(&needs, Position::RunningBack), Some(NeedPriority::Medium));
        assert_eq!(priority_of(&needs, Position::WideReceiver), Some(NeedPriority::Low));
        assert_eq!(priority_of(&needs, Position::TightEnd), Some(NeedPriority::High));

        let order: Vec<NeedPriority> = needs.iter().map(|n| n.priority).collect();
        let mut sorted = order.clone();
        sorted.sort();
        assert_eq!(order, sorted);
    }

    #[test]
    fn kicker_and_defense_drop_out_once_filled() {
        let mut roster = Roster::new(2);
        roster.push(player("Kicker", Position::Kicker));
        let needs = roster.needs(&test_limits());
        assert_eq!(priority_of(&needs, Position::Kicker), None);
        assert_eq!(priority_of(&needs, Position::Defense), Some(NeedPriority::High));
    }

    #[test]
    fn needs_is_idempotent() {
        let mut roster = Roster::new(3);
        roster.push(player("TE One", Position::TightEnd));
        let limits = test_limits();
        assert_eq!(roster.needs(&limits), roster.needs(&limits));
    }

    #[test]
    fn zero_limit_positions_are_omitted() {
        let roster = Roster::new(1);
        let limits = RosterLimits { K: 0, ..test_limits() };
        let needs = roster.needs(&limits);
        assert_eq!(priority_of(&needs, Position::Kicker), None);
        assert_eq!(needs.len(), 5);
    }

    #[test]
    fn bands_clamp_to_roster_limit() {
        let mut roster = Roster::new(1);
        roster.push(player("QB One", Position::Quarterback));
        let limits = RosterLimits { QB: 1, ..test_limits() };
        let needs = roster.needs(&limits);
        assert_eq!(priority_of(&needs, Position::Quarterback), Some(NeedPriority::Low));
    }

    #[test]
    fn slots_remaining_subtracts_counts() {
        let mut roster = Roster::new(1);
        roster.push(player("DST", Position::Defense));
        roster.push(player("RB", Position::RunningBack));

        let open = roster.slots_remaining(&test_limits());
        assert!(open.contains(&(Position::RunningBack, 5)));
        assert!(open.contains(&(Position::Quarterback, 2)));
        assert!(!open.iter().any(|(pos, _)| *pos == Position::Defense));
    }

    #[test]
    fn default_display_name() {
        assert_eq!(Roster::new(7).display_name, "Team 7");
    }
}
