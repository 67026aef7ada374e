// Round-by-round draft board.

use std::collections::HashMap;

use super::pick::DraftPick;
use super::player::PlayerRecord;
use super::state::DraftState;

/// One cell of the board: a pick slot and who was taken there, if anyone.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardSlot {
    pub pick_number: u32,
    pub round: u32,
    pub team_number: u32,
    pub player: Option<PlayerRecord>,
}

impl DraftState {
    /// Board rows from round 1 through the round after the last completed
    /// one (capped at the final round). Each row lists its slots in the
    /// order they are picked.
    pub fn draft_board(&self) -> Vec<Vec<BoardSlot>> {
        let teams = self.config().total_teams;
        let completed_rounds = (self.current_pick() - 1) / teams;
        let shown_rounds = (completed_rounds + 1).min(self.config().total_rounds);

        let by_pick: HashMap<u32, &DraftPick> =
            self.picks().iter().map(|p| (p.pick_number, p)).collect();

        (1..=shown_rounds)
            .map(|round| {
                (1..=teams)
                    .map(|slot| {
                        let pick_number = (round - 1) * teams + slot;
                        let logged = by_pick.get(&pick_number);
                        let team_number = logged
                            .map(|p| p.team_number)
                            .unwrap_or_else(|| self.order().current_drafter(pick_number));
                        let player = logged.and_then(|p| self.rostered(p));
                        BoardSlot {
                            pick_number,
                            round,
                            team_number,
                            player,
                        }
                    })
                    .collect()
            })
            .collect()
    }

    fn rostered(&self, pick: &DraftPick) -> Option<PlayerRecord> {
        self.team(pick.team_number)
            .ok()?
            .players()
            .iter()
            .find(|p| p.name_matches(&pick.player_name))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DraftConfiguration;
    use crate::draft::player::Position;

    fn state() -> DraftState {
        let players = (1..=20)
            .map(|i| PlayerRecord::new(format!("Player {i:02}"), Position::WideReceiver, i as f64))
            .collect();
        DraftState::new(DraftConfiguration::new(3, 1, 4), players).unwrap()
    }

    #[test]
    fn fresh_board_shows_first_round() {
        let board = state().draft_board();
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].len(), 3);
        assert!(board[0].iter().all(|s| s.player.is_none()));
        let teams: Vec<u32> = board[0].iter().map(|s| s.team_number).collect();
        assert_eq!(teams, vec![1, 2, 3]);
    }

    #[test]
    fn board_fills_in_snake_order() {
        let mut state = state();
        for name in ["Player 01", "Player 02", "Player 03", "Player 04"] {
            state.draft_current(name).unwrap();
        }
        let board = state.draft_board();
        assert_eq!(board.len(), 2);

        let round_two: Vec<(u32, u32)> = board[1].iter().map(|s| (s.pick_number, s.team_number)).collect();
        assert_eq!(round_two, vec![(4, 3), (5, 2), (6, 1)]);
        assert_eq!(board[1][0].player.as_ref().map(|p| p.name.as_str()), Some("Player 04"));
        assert!(board[1][1].player.is_none());
    }

    #[test]
    fn board_stops_at_final_round() {
        let mut state = state();
        while !state.is_complete() {
            let best = state.best_available(None, Some(1)).remove(0);
            state.draft_current(&best.name).unwrap();
        }
        let board = state.draft_board();
        assert_eq!(board.len(), 4);
        assert!(board.iter().flatten().all(|s| s.player.is_some()));
    }
}
