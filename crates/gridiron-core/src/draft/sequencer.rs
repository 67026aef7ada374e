// Snake draft ordering.
//
// Pick numbers are 1-based and global across the whole draft. Odd rounds run
// team 1..=N, even rounds run N..=1.

use serde::{Deserialize, Serialize};

/// Maps global pick numbers to rounds and drafting teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnakeOrder {
    total_teams: u32,
}

impl SnakeOrder {
    /// `total_teams` must be at least 1; configuration validation enforces it.
    pub fn new(total_teams: u32) -> Self {
        SnakeOrder {
            total_teams: total_teams.max(1),
        }
    }

    pub fn total_teams(&self) -> u32 {
        self.total_teams
    }

    /// Round containing `pick` (1-based).
    pub fn round_of(&self, pick: u32) -> u32 {
        (pick.max(1) - 1) / self.total_teams + 1
    }

    /// Position of `pick` within its round, before the snake reversal.
    fn slot_in_round(&self, pick: u32) -> u32 {
        (pick.max(1) - 1) % self.total_teams + 1
    }

    /// Team number (1-based) on the clock at `pick`.
    pub fn current_drafter(&self, pick: u32) -> u32 {
        let slot = self.slot_in_round(pick);
        if self.round_of(pick) % 2 == 0 {
            self.total_teams - slot + 1
        } else {
            slot
        }
    }

    /// Global pick number at which `team` selects in `round`.
    pub fn pick_for(&self, round: u32, team: u32) -> u32 {
        let round = round.max(1);
        if round % 2 == 1 {
            (round - 1) * self.total_teams + team
        } else {
            round * self.total_teams - team + 1
        }
    }

    /// The smallest pick number strictly after `current_pick` that belongs to
    /// `team`.
    pub fn next_pick_for_team(&self, current_pick: u32, team: u32) -> u32 {
        let round = self.round_of(current_pick);
        let this_round = self.pick_for(round, team);
        if this_round > current_pick {
            this_round
        } else {
            self.pick_for(round + 1, team)
        }
    }

    /// Picks taken by other teams before `team` is on the clock again,
    /// counting from `current_pick`. Zero when `team` holds `current_pick`.
    pub fn picks_until_turn(&self, current_pick: u32, team: u32) -> u32 {
        if self.current_drafter(current_pick) == team {
            0
        } else {
            let round = self.round_of(current_pick);
            let this_round = self.pick_for(round, team);
            let next = if this_round >= current_pick {
                this_round
            } else {
                self.pick_for(round + 1, team)
            };
            next - current_pick
        }
    }
}
