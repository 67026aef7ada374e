// Ranked pick suggestions for a team.
//
// score = (1000 - rank) / 100
//       + need bonus for the candidate's position (High 30, Medium 15, Low 5)
//       + 20 when the round favours the position
//       - 50 for a kicker or defense before round 13

use tracing::debug;

use super::player::{PlayerRecord, Position};
use super::roster::{Need, NeedPriority};
use super::state::DraftState;
use crate::error::DraftError;

/// Number of suggestions returned.
pub const SUGGESTION_COUNT: usize = 8;

/// First round in which kickers and defenses stop being penalized.
const LATE_ROUND_START: u32 = 13;
const EARLY_SPECIALIST_PENALTY: f64 = 50.0;
const ROUND_PREFERENCE_BONUS: f64 = 20.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub player: PlayerRecord,
    pub score: f64,
    /// Derived from `score`: High above 80, Medium above 50, Low otherwise.
    pub label: NeedPriority,
}

/// Positions favoured in a given round.
pub fn round_preferences(round: u32) -> &'static [Position] {
    use Position::*;
    match round {
        1..=3 => &[RunningBack, WideReceiver],
        4..=6 => &[Quarterback, TightEnd],
        7..=12 => &[RunningBack, WideReceiver, Quarterback, TightEnd],
        13..=15 => &[Kicker, Defense],
        _ => &[],
    }
}

fn label_for(score: f64) -> NeedPriority {
    if score > 80.0 {
        NeedPriority::High
    } else if score > 50.0 {
        NeedPriority::Medium
    } else {
        NeedPriority::Low
    }
}

/// Score one candidate. `rank` is lower-is-better regardless of score mode.
pub fn suggestion_score(position: Position, rank: f64, round: u32, needs: &[Need]) -> f64 {
    let mut score = (1000.0 - rank) / 100.0;

    if let Some(need) = needs.iter().find(|n| n.position == position) {
        score += need.priority.bonus();
    }
    if round_preferences(round).contains(&position) {
        score += ROUND_PREFERENCE_BONUS;
    }
    if position.is_late_round_only() && round < LATE_ROUND_START {
        score -= EARLY_SPECIALIST_PENALTY;
    }
    score
}

impl DraftState {
    /// Top suggestions for `team` given its needs and the round being drafted.
    pub fn suggest(
        &self,
        team: u32,
        current_round: u32,
        needs: &[Need],
    ) -> Result<Vec<Suggestion>, DraftError> {
        self.check_team(team)?;

        let mut scored: Vec<Suggestion> = self
            .ranked_available()
            .into_iter()
            .map(|(player, rank)| {
                let score = suggestion_score(player.position, rank, current_round, needs);
                Suggestion {
                    player,
                    score,
                    label: label_for(score),
                }
            })
            .collect();

        // Stable: ties keep the pool ordering.
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(SUGGESTION_COUNT);

        debug!(
            "suggest: team {} round {} -> {:?}",
            team,
            current_round,
            scored.iter().map(|s| s.player.name.as_str()).collect::<Vec<_>>()
        );
        Ok(scored)
    }

    /// Suggestions for a team at the current pick, using its own needs.
    pub fn suggest_for(&self, team: u32) -> Result<Vec<Suggestion>, DraftError> {
        let needs = self.needs(team)?;
        self.suggest(team, self.current_round(), &needs)
    }
}
