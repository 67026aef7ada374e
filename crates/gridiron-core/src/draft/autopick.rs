// Weighted random auto-drafting for computer-controlled teams.
//
// Candidates are the top three available players at every position the team
// still has roster room for, weighted by a round-dependent positional weight
// times 1 / (rank + 1). One candidate is sampled from the normalized weights.

use rand::Rng;
use tracing::{debug, info};

use super::player::{PlayerRecord, Position};
use super::state::DraftState;
use crate::error::DraftError;

/// Players considered per position.
const CANDIDATES_PER_POSITION: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct AutoPickCandidate {
    pub player: PlayerRecord,
    /// Normalized selection probability.
    pub weight: f64,
}

/// Base positional weight for a round. Zero means the position is not
/// considered at all in that round.
pub fn position_weight(round: u32, position: Position) -> f64 {
    use Position::*;
    match (round, position) {
        (1..=3, RunningBack | WideReceiver) => 0.40,
        (1..=3, Quarterback | TightEnd) => 0.10,
        (1..=3, Kicker | Defense) => 0.0,
        (4..=8, RunningBack | WideReceiver) => 0.30,
        (4..=8, Quarterback | TightEnd) => 0.20,
        (4..=8, Kicker | Defense) => 0.0,
        (9..=12, RunningBack | WideReceiver) => 0.25,
        (9..=12, Quarterback | TightEnd) => 0.20,
        (9..=12, Kicker | Defense) => 0.05,
        (_, Kicker | Defense) => 0.30,
        (_, _) => 0.10,
    }
}

/// Pick an index from weights summing to 1, using one uniform draw.
fn sample_weighted<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> usize {
    let r: f64 = rng.gen::<f64>();
    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w;
        if r < cumulative {
            return i;
        }
    }
    // Rounding left `r` past the last bucket.
    weights.iter().rposition(|&w| w > 0.0).unwrap_or(0)
}

impl DraftState {
    /// The weighted candidate list the auto-drafter would sample from for
    /// `team` at the current pick. Empty when no position with remaining
    /// roster room has a positive weight this round.
    pub fn auto_pick_candidates(&self, team: u32) -> Result<Vec<AutoPickCandidate>, DraftError> {
        let open: Vec<Position> = self
            .roster_slots_remaining(team)?
            .into_iter()
            .map(|(pos, _)| pos)
            .collect();
        let round = self.current_round();
        let ranked = self.ranked_available();

        let mut candidates = Vec::new();
        for position in open {
            let base = position_weight(round, position);
            if base <= 0.0 {
                continue;
            }
            for (player, rank) in ranked
                .iter()
                .filter(|(p, _)| p.position == position)
                .take(CANDIDATES_PER_POSITION)
            {
                candidates.push(AutoPickCandidate {
                    player: player.clone(),
                    weight: base / (rank + 1.0).max(1.0),
                });
            }
        }

        let total: f64 = candidates.iter().map(|c| c.weight).sum();
        if total > 0.0 && total.is_finite() {
            for c in &mut candidates {
                c.weight /= total;
            }
        } else {
            candidates.clear();
        }
        Ok(candidates)
    }

    /// Draft for `team` by sampling the weighted candidates with `rng`.
    ///
    /// Falls back to the best available player at any position with roster
    /// room when no weighted candidate exists.
    pub fn auto_draft_pick<R: Rng + ?Sized>(
        &mut self,
        team: u32,
        rng: &mut R,
    ) -> Result<PlayerRecord, DraftError> {
        self.check_team(team)?;
        self.check_open()?;

        let candidates = self.auto_pick_candidates(team)?;
        let name = if candidates.is_empty() {
            let open: Vec<Position> = self
                .roster_slots_remaining(team)?
                .into_iter()
                .map(|(pos, _)| pos)
                .collect();
            let fallback = self
                .ranked_available()
                .into_iter()
                .map(|(p, _)| p)
                .find(|p| open.contains(&p.position))
                .ok_or(DraftError::NoSuitableCandidate { team })?;
            debug!("auto-pick: team {} falls back to {}", team, fallback.name);
            fallback.name
        } else {
            let weights: Vec<f64> = candidates.iter().map(|c| c.weight).collect();
            let idx = sample_weighted(&weights, rng);
            candidates[idx].player.name.clone()
        };

        let player = self.commit(&name, team)?;
        info!("Auto-drafted {} for team {}", player, team);
        Ok(player)
    }
}
