// Draft state: pool, rosters, pick log, and the pick counter.
//
// All mutation goes through `DraftState`. Every successful pick moves one
// record from the pool to exactly one roster and advances `current_pick` by
// one; failed operations change nothing.

use std::collections::HashSet;

use tracing::{info, warn};

use super::pick::DraftPick;
use super::player::{PlayerRecord, Position, ScoreMode};
use super::pool::{Lookup, PlayerPool};
use super::roster::{Need, Roster};
use super::sequencer::SnakeOrder;
use super::tags::{PlayerTag, TagBook};
use crate::config::DraftConfiguration;
use crate::error::DraftError;

/// A tagged player and where they currently are.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedPlayer {
    pub player: PlayerRecord,
    /// Team holding the player, or `None` while still available.
    pub drafted_by: Option<u32>,
}

/// The complete state of one draft.
#[derive(Debug, Clone)]
pub struct DraftState {
    config: DraftConfiguration,
    order: SnakeOrder,
    /// Every record of the active player source, drafted or not.
    source: Vec<PlayerRecord>,
    pool: PlayerPool,
    /// One roster per team; index `n - 1` holds team `n`.
    teams: Vec<Roster>,
    picks: Vec<DraftPick>,
    current_pick: u32,
    use_team_names: bool,
    tags: TagBook,
}

impl DraftState {
    /// Start a draft from a validated configuration and a player source.
    pub fn new(config: DraftConfiguration, players: Vec<PlayerRecord>) -> Result<Self, DraftError> {
        config.validate()?;
        if players.is_empty() {
            return Err(DraftError::RankingsUnavailable {
                reason: "the player source produced no records".into(),
            });
        }

        let teams = (1..=config.total_teams).map(Roster::new).collect();
        let pool = PlayerPool::new(players);
        let source = pool.players().to_vec();
        info!(
            "Draft initialized: {} teams, {} rounds, {} players ({} mode)",
            config.total_teams,
            config.total_rounds,
            pool.len(),
            config.score_mode.label()
        );

        Ok(DraftState {
            order: SnakeOrder::new(config.total_teams),
            config,
            source,
            pool,
            teams,
            picks: Vec::new(),
            current_pick: 1,
            use_team_names: false,
            tags: TagBook::default(),
        })
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn config(&self) -> &DraftConfiguration {
        &self.config
    }

    pub fn score_mode(&self) -> ScoreMode {
        self.config.score_mode
    }

    pub fn order(&self) -> SnakeOrder {
        self.order
    }

    pub fn pool(&self) -> &PlayerPool {
        &self.pool
    }

    pub fn teams(&self) -> &[Roster] {
        &self.teams
    }

    pub fn picks(&self) -> &[DraftPick] {
        &self.picks
    }

    pub fn current_pick(&self) -> u32 {
        self.current_pick
    }

    pub fn current_round(&self) -> u32 {
        self.order.round_of(self.current_pick)
    }

    /// Team on the clock for the current pick.
    pub fn current_drafter(&self) -> u32 {
        self.order.current_drafter(self.current_pick)
    }

    pub fn total_picks(&self) -> u32 {
        self.config.total_picks()
    }

    pub fn is_complete(&self) -> bool {
        self.current_pick > self.total_picks()
    }

    /// Whether the operator's own team is on the clock.
    pub fn is_my_turn(&self) -> bool {
        !self.is_complete() && self.current_drafter() == self.config.your_position
    }

    /// The team's next pick number after the current one.
    pub fn next_pick_for_team(&self, team: u32) -> Result<u32, DraftError> {
        self.check_team(team)?;
        Ok(self.order.next_pick_for_team(self.current_pick, team))
    }

    pub fn team(&self, team: u32) -> Result<&Roster, DraftError> {
        self.check_team(team)?;
        Ok(&self.teams[(team - 1) as usize])
    }

    pub fn my_team(&self) -> &Roster {
        &self.teams[(self.config.your_position - 1) as usize]
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn find(&self, query: &str) -> Vec<PlayerRecord> {
        self.pool.find(query)
    }

    /// Lowercased names of every rostered player.
    pub fn drafted_names(&self) -> HashSet<String> {
        self.teams
            .iter()
            .flat_map(|t| t.players())
            .map(|p| p.name.to_lowercase())
            .collect()
    }

    /// Team currently holding `name`, if anyone.
    pub fn drafted_by(&self, name: &str) -> Option<u32> {
        self.teams
            .iter()
            .find(|t| t.has_player(name))
            .map(|t| t.team_number)
    }

    pub fn best_available(&self, position: Option<Position>, limit: Option<usize>) -> Vec<PlayerRecord> {
        self.pool
            .best_available(position, limit, self.config.score_mode, &self.drafted_names())
    }

    /// Every undrafted player best-first, paired with the rank used for
    /// scoring. Rank mode uses the record's score; points mode uses the
    /// player's 1-based place in the points ordering.
    pub(crate) fn ranked_available(&self) -> Vec<(PlayerRecord, f64)> {
        let mode = self.config.score_mode;
        self.best_available(None, None)
            .into_iter()
            .enumerate()
            .map(|(i, p)| {
                let rank = match mode {
                    ScoreMode::Rank => p.score,
                    ScoreMode::Points => (i + 1) as f64,
                };
                (p, rank)
            })
            .collect()
    }

    /// Priority-banded needs for a team, most urgent first.
    pub fn needs(&self, team: u32) -> Result<Vec<Need>, DraftError> {
        Ok(self.team(team)?.needs(&self.config.roster_limits))
    }

    /// Open roster spots per position for a team.
    pub fn roster_slots_remaining(&self, team: u32) -> Result<Vec<(Position, usize)>, DraftError> {
        Ok(self.team(team)?.slots_remaining(&self.config.roster_limits))
    }

    // -----------------------------------------------------------------------
    // Drafting
    // -----------------------------------------------------------------------

    /// Draft the player matching `query` to `team`.
    ///
    /// Ambiguous and unknown queries are reported back without touching the
    /// draft.
    pub fn draft(&mut self, query: &str, team: u32) -> Result<PlayerRecord, DraftError> {
        self.check_team(team)?;
        self.check_open()?;

        match self.pool.resolve(query) {
            Lookup::Unique(player) => self.commit(&player.name, team),
            Lookup::NotFound(query) => Err(DraftError::PlayerNotFound { query }),
            Lookup::Ambiguous(candidates) => Err(DraftError::AmbiguousPlayer {
                query: query.trim().to_string(),
                candidates,
            }),
        }
    }

    /// Draft for whichever team is on the clock.
    pub fn draft_current(&mut self, query: &str) -> Result<PlayerRecord, DraftError> {
        let team = self.current_drafter();
        self.draft(query, team)
    }

    /// Move the named pool record to `team` and advance the pick counter.
    pub(crate) fn commit(&mut self, name: &str, team: u32) -> Result<PlayerRecord, DraftError> {
        let player = self
            .pool
            .take(name)
            .ok_or_else(|| DraftError::PlayerNotFound {
                query: name.to_string(),
            })?;

        let pick = DraftPick {
            pick_number: self.current_pick,
            round: self.current_round(),
            team_number: team,
            player_name: player.name.clone(),
            position: player.position,
        };
        info!(
            "Pick {} (round {}): team {} drafts {}",
            pick.pick_number, pick.round, team, player
        );

        self.teams[(team - 1) as usize].push(player.clone());
        self.picks.push(pick);
        self.current_pick += 1;
        Ok(player)
    }

    /// Take back the most recent pick, returning its record to the pool.
    pub fn undo_last_pick(&mut self) -> Result<DraftPick, DraftError> {
        let pick = self.picks.pop().ok_or(DraftError::NothingToUndo)?;
        let roster = &mut self.teams[(pick.team_number - 1) as usize];
        if roster.pop().is_none() {
            warn!(
                "undo: team {} had no player for pick {}",
                pick.team_number, pick.pick_number
            );
        }
        // The record goes back as the active source knows it; a player the
        // source does not carry stays out of the pool.
        match self.source_record(&pick.player_name) {
            Some(player) => self.pool.restore(player),
            None => info!(
                "undo: {} is not in the active player source, not returned to the pool",
                pick.player_name
            ),
        }
        self.current_pick = self.current_pick.saturating_sub(1).max(1);
        info!("Undid pick {}: {}", pick.pick_number, pick.player_name);
        Ok(pick)
    }

    /// Rebuild the draft by replaying a saved pick log against the pool.
    ///
    /// Picks naming players the pool does not hold, or teams outside the
    /// league, are skipped with a warning. Returns the number applied.
    pub fn restore_from_picks(&mut self, picks: &[DraftPick]) -> usize {
        for roster in &mut self.teams {
            roster.clear();
        }
        self.pool = PlayerPool::new(self.source.clone());
        self.picks.clear();
        self.current_pick = 1;

        let mut applied = 0;
        for pick in picks {
            if self.check_team(pick.team_number).is_err() {
                warn!(
                    "replay: pick {} names unknown team {}, skipping",
                    pick.pick_number, pick.team_number
                );
                continue;
            }
            if self.is_complete() {
                warn!("replay: draft already complete, ignoring remaining picks");
                break;
            }
            match self.commit(&pick.player_name, pick.team_number) {
                Ok(_) => applied += 1,
                Err(_) => warn!(
                    "replay: {} is not in the player pool, skipping pick {}",
                    pick.player_name, pick.pick_number
                ),
            }
        }
        applied
    }

    /// Replace the pool with records from a different source, keeping every
    /// roster as it is. Already-drafted names are left out of the new pool.
    pub fn switch_source(&mut self, players: Vec<PlayerRecord>, mode: ScoreMode) -> Result<(), DraftError> {
        if players.is_empty() {
            return Err(DraftError::RankingsUnavailable {
                reason: "the new player source produced no records".into(),
            });
        }
        let drafted = self.drafted_names();
        self.source = PlayerPool::new(players).players().to_vec();
        let remaining: Vec<PlayerRecord> = self
            .source
            .iter()
            .filter(|p| !drafted.contains(&p.name.to_lowercase()))
            .cloned()
            .collect();
        self.pool = PlayerPool::new(remaining);
        self.config.score_mode = mode;
        info!(
            "Switched player source: {} available ({} mode)",
            self.pool.len(),
            mode.label()
        );
        Ok(())
    }

    fn source_record(&self, name: &str) -> Option<PlayerRecord> {
        self.source.iter().find(|p| p.name_matches(name)).cloned()
    }

    // -----------------------------------------------------------------------
    // Team names
    // -----------------------------------------------------------------------

    pub fn rename_team(&mut self, team: u32, name: &str) -> Result<(), DraftError> {
        self.check_team(team)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(DraftError::InvalidConfiguration {
                field: "team_name".into(),
                message: "must not be blank".into(),
            });
        }
        self.teams[(team - 1) as usize].display_name = name.to_string();
        Ok(())
    }

    pub fn use_team_names(&self) -> bool {
        self.use_team_names
    }

    pub fn set_use_team_names(&mut self, enabled: bool) {
        self.use_team_names = enabled;
    }

    /// "Team N", or the team's display name when names are switched on.
    pub fn team_label(&self, team: u32) -> String {
        match self.team(team) {
            Ok(roster) if self.use_team_names => roster.display_name.clone(),
            _ => format!("Team {team}"),
        }
    }

    // -----------------------------------------------------------------------
    // Tags
    // -----------------------------------------------------------------------

    /// Tag a player found by query among available or drafted players.
    /// Returns the canonical name that was tagged.
    pub fn tag_player(&mut self, query: &str, tag: PlayerTag) -> Result<String, DraftError> {
        let name = match self.pool.resolve(query) {
            Lookup::Unique(player) => player.name,
            Lookup::Ambiguous(candidates) => {
                return Err(DraftError::AmbiguousPlayer {
                    query: query.trim().to_string(),
                    candidates,
                })
            }
            Lookup::NotFound(query) => self
                .teams
                .iter()
                .flat_map(|t| t.players())
                .find(|p| p.name_matches(&query))
                .map(|p| p.name.clone())
                .ok_or(DraftError::PlayerNotFound { query })?,
        };
        self.tags.add(tag, &name);
        Ok(name)
    }

    pub fn untag_player(&mut self, name: &str, tag: PlayerTag) -> bool {
        self.tags.remove(tag, name)
    }

    pub fn is_tagged(&self, name: &str, tag: PlayerTag) -> bool {
        self.tags.has(tag, name)
    }

    /// Tagged players, available ones first in the active ordering, then
    /// drafted ones in pick order.
    pub fn tagged(&self, tag: PlayerTag) -> Vec<TaggedPlayer> {
        let mut out: Vec<TaggedPlayer> = self
            .best_available(None, None)
            .into_iter()
            .filter(|p| self.tags.has(tag, &p.name))
            .map(|player| TaggedPlayer {
                player,
                drafted_by: None,
            })
            .collect();

        for pick in &self.picks {
            if !self.tags.has(tag, &pick.player_name) {
                continue;
            }
            let roster = &self.teams[(pick.team_number - 1) as usize];
            if let Some(player) = roster.players().iter().find(|p| p.name_matches(&pick.player_name)) {
                out.push(TaggedPlayer {
                    player: player.clone(),
                    drafted_by: Some(pick.team_number),
                });
            }
        }
        out
    }

    // -----------------------------------------------------------------------
    // Guards
    // -----------------------------------------------------------------------

    pub(crate) fn check_team(&self, team: u32) -> Result<(), DraftError> {
        if team == 0 || team > self.config.total_teams {
            return Err(DraftError::InvalidConfiguration {
                field: "team".into(),
                message: format!(
                    "team must be between 1 and {}, got {team}",
                    self.config.total_teams
                ),
            });
        }
        Ok(())
    }

    pub(crate) fn check_open(&self) -> Result<(), DraftError> {
        if self.is_complete() {
            return Err(DraftError::DraftComplete {
                total_picks: self.total_picks(),
            });
        }
        Ok(())
    }
}
