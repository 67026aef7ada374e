// Console session: one draft, its persisted log, and the operator's commands.
//
// Every successful pick is written to the database as it happens, so a
// restarted session with the same draft id replays to the same state.

use std::io::Write;
use std::time::Duration;

use anyhow::Context;
use gridiron_core::config::{AutoDraftConfig, DataPaths};
use gridiron_core::db::Database;
use gridiron_core::{DraftError, DraftState, PlayerRecord, PlayerTag, ScoreMode};
use gridiron_data::StatsBook;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use crate::command::{Command, HELP};
use crate::render;

pub struct Session {
    state: DraftState,
    db: Database,
    draft_id: String,
    data_paths: DataPaths,
    stats: Option<StatsBook>,
    /// Candidates from the last ambiguous `draft`, for `choose`.
    candidates: Vec<PlayerRecord>,
    rng: ChaCha8Rng,
    pick_delay: Duration,
}

impl Session {
    pub fn new(
        state: DraftState,
        db: Database,
        draft_id: String,
        data_paths: DataPaths,
        stats: Option<StatsBook>,
        autodraft: &AutoDraftConfig,
    ) -> Self {
        let rng = match autodraft.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Session {
            state,
            db,
            draft_id,
            data_paths,
            stats,
            candidates: Vec::new(),
            rng,
            pick_delay: Duration::from_millis(autodraft.pick_delay_ms),
        }
    }

    pub fn state(&self) -> &DraftState {
        &self.state
    }

    pub fn draft_id(&self) -> &str {
        &self.draft_id
    }

    // -----------------------------------------------------------------------
    // Recovery
    // -----------------------------------------------------------------------

    /// Restore team names and replay the stored pick log for this draft id.
    /// Returns whether any picks were stored.
    pub fn recover(&mut self) -> anyhow::Result<bool> {
        let names = self.db.load_team_names(&self.draft_id)?;
        for (team, name) in (1u32..).zip(names.iter()) {
            if let Err(e) = self.state.rename_team(team, name) {
                warn!("Ignoring stored name for team {}: {}", team, e);
            }
        }

        if !self.db.has_draft_in_progress(&self.draft_id)? {
            info!("No draft in progress for draft_id={}, starting fresh", self.draft_id);
            return Ok(false);
        }

        let picks = self.db.load_picks(&self.draft_id)?;
        let applied = self.state.restore_from_picks(&picks);
        info!(
            "Recovery: replayed {} of {} stored picks for draft_id={}",
            applied,
            picks.len(),
            self.draft_id
        );

        // Skipped picks shift the numbering of everything after them. Store
        // the log as replayed so new picks never collide with stale rows.
        if self.state.picks() != picks.as_slice() {
            warn!(
                "Recovery: stored log for draft_id={} differs from the replay, rewriting it",
                self.draft_id
            );
            self.db
                .replace_picks(&self.draft_id, self.state.picks())
                .context("failed to rewrite the stored pick log")?;
        }
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Command dispatch
    // -----------------------------------------------------------------------

    /// Run one command, writing its output to `out`. Returns `false` when
    /// the operator asked to quit.
    pub async fn execute<W: Write>(&mut self, cmd: Command, out: &mut W) -> anyhow::Result<bool> {
        let mode = self.state.score_mode();
        match cmd {
            Command::Draft(query) => self.draft(&query, out)?,
            Command::Choose(n) => match n.checked_sub(1).and_then(|i| self.candidates.get(i)).cloned() {
                Some(player) => self.draft(&player.name, out)?,
                None => writeln!(out, "No candidate {n}; `draft` a name first.")?,
            },
            Command::Suggest(team) => {
                let team = team.unwrap_or(self.state.config().your_position);
                match self.state.suggest_for(team) {
                    Ok(list) => writeln!(
                        out,
                        "Suggestions for {} (round {}):\n{}",
                        self.state.team_label(team),
                        self.state.current_round(),
                        render::suggestions(&list, mode)
                    )?,
                    Err(e) => writeln!(out, "{e}")?,
                }
            }
            Command::Auto => self.auto_pick(out)?,
            Command::AutoDraft(limit) => self.auto_draft(limit, out).await?,
            Command::Best { position, limit } => {
                let heading = match position {
                    Some(pos) => format!("Best available {pos}:"),
                    None => "Best available:".to_string(),
                };
                let best = self.state.best_available(position, Some(limit));
                writeln!(out, "{heading}\n{}", render::numbered_players(&best, mode))?;
            }
            Command::Find(query) => {
                let mut found = self.state.find(&query);
                found.sort_by(|a, b| mode.compare(a, b));
                writeln!(out, "{}", render::numbered_players(&found, mode))?;
            }
            Command::Needs(team) => {
                let team = team.unwrap_or(self.state.config().your_position);
                match (self.state.needs(team), self.state.roster_slots_remaining(team)) {
                    (Ok(needs), Ok(slots)) => writeln!(
                        out,
                        "{}",
                        render::needs(&self.state.team_label(team), &needs, &slots)
                    )?,
                    (Err(e), _) | (_, Err(e)) => writeln!(out, "{e}")?,
                }
            }
            Command::Roster(team) => {
                let team = team.unwrap_or(self.state.config().your_position);
                writeln!(out, "{}", render::roster(&self.state, team))?;
            }
            Command::Board => {
                writeln!(out, "{}", render::board(&self.state, &self.state.draft_board()))?;
            }
            Command::Next => self.next_pick(out)?,
            Command::Undo => self.undo(out)?,
            Command::Rename { team, name } => self.rename(team, &name, out)?,
            Command::ToggleNames => {
                let enabled = !self.state.use_team_names();
                self.state.set_use_team_names(enabled);
                let shown = if enabled { "names" } else { "numbers" };
                writeln!(out, "Showing team {shown}.")?;
            }
            Command::Tag { tag, query } => match self.state.tag_player(&query, tag) {
                Ok(name) => writeln!(out, "Tagged {name} as {tag}.")?,
                Err(DraftError::AmbiguousPlayer { candidates, .. }) => writeln!(
                    out,
                    "Which one?\n{}",
                    render::numbered_players(&candidates, mode)
                )?,
                Err(e) => writeln!(out, "{e}")?,
            },
            Command::Untag { tag, query } => self.untag(tag, &query, out)?,
            Command::Tags(tag) => {
                let tags = match tag {
                    Some(t) => vec![t],
                    None => vec![PlayerTag::Favorite, PlayerTag::Bust],
                };
                for t in tags {
                    writeln!(out, "Tagged {t}:\n{}", render::tagged(&self.state, &self.state.tagged(t)))?;
                }
            }
            Command::Stats {
                query,
                available_only,
            } => self.stats(&query, available_only, out)?,
            Command::Source(new_mode) => self.switch_source(new_mode, out)?,
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => return Ok(false),
        }
        out.flush()?;
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Picks
    // -----------------------------------------------------------------------

    fn persist_last_pick(&self) {
        if let Some(pick) = self.state.picks().last() {
            if let Err(e) = self.db.record_pick(pick, &self.draft_id) {
                warn!("Failed to persist pick to DB: {}", e);
            }
        }
    }

    fn announce_last_pick<W: Write>(&self, out: &mut W) -> anyhow::Result<()> {
        if let Some(pick) = self.state.picks().last() {
            writeln!(
                out,
                "Pick {} (round {}): {} drafts {} {}",
                pick.pick_number,
                pick.round,
                self.state.team_label(pick.team_number),
                pick.player_name,
                pick.position
            )?;
        }
        Ok(())
    }

    fn draft<W: Write>(&mut self, query: &str, out: &mut W) -> anyhow::Result<()> {
        let mode = self.state.score_mode();
        match self.state.draft_current(query) {
            Ok(_) => {
                self.candidates.clear();
                self.persist_last_pick();
                self.announce_last_pick(out)?;
                writeln!(out, "{}", render::status(&self.state))?;
            }
            Err(DraftError::AmbiguousPlayer {
                query,
                mut candidates,
            }) => {
                candidates.sort_by(|a, b| mode.compare(a, b));
                writeln!(
                    out,
                    "'{query}' matches {} players; `choose <n>` or type the full name:\n{}",
                    candidates.len(),
                    render::numbered_players(&candidates, mode)
                )?;
                self.candidates = candidates;
            }
            Err(e) => writeln!(out, "{e}")?,
        }
        Ok(())
    }

    fn auto_pick<W: Write>(&mut self, out: &mut W) -> anyhow::Result<()> {
        let team = self.state.current_drafter();
        match self.state.auto_draft_pick(team, &mut self.rng) {
            Ok(_) => {
                self.persist_last_pick();
                self.announce_last_pick(out)?;
                writeln!(out, "{}", render::status(&self.state))?;
            }
            Err(e) => writeln!(out, "{e}")?,
        }
        Ok(())
    }

    /// Auto-draft for the other teams until the operator is on the clock,
    /// the draft ends, or `limit` picks have been made. Pauses between picks.
    async fn auto_draft<W: Write>(&mut self, limit: Option<u32>, out: &mut W) -> anyhow::Result<()> {
        let mut made = 0u32;
        while !self.state.is_complete()
            && !self.state.is_my_turn()
            && limit.map_or(true, |n| made < n)
        {
            if made > 0 && !self.pick_delay.is_zero() {
                tokio::time::sleep(self.pick_delay).await;
            }
            let team = self.state.current_drafter();
            match self.state.auto_draft_pick(team, &mut self.rng) {
                Ok(_) => {
                    self.persist_last_pick();
                    self.announce_last_pick(out)?;
                    out.flush()?;
                    made += 1;
                }
                Err(e) => {
                    warn!("Auto-draft stopped at pick {}: {}", self.state.current_pick(), e);
                    writeln!(out, "{e}")?;
                    break;
                }
            }
        }
        info!("Auto-drafted {} picks", made);
        writeln!(out, "{}", render::status(&self.state))?;
        Ok(())
    }

    fn undo<W: Write>(&mut self, out: &mut W) -> anyhow::Result<()> {
        match self.state.undo_last_pick() {
            Ok(pick) => {
                self.candidates.clear();
                if let Err(e) = self.db.delete_pick(pick.pick_number, &self.draft_id) {
                    warn!("Failed to remove pick {} from DB: {}", pick.pick_number, e);
                }
                writeln!(
                    out,
                    "Undid pick {}: {} back to the pool.\n{}",
                    pick.pick_number,
                    pick.player_name,
                    render::status(&self.state)
                )?;
            }
            Err(e) => writeln!(out, "{e}")?,
        }
        Ok(())
    }

    fn next_pick<W: Write>(&self, out: &mut W) -> anyhow::Result<()> {
        let me = self.state.config().your_position;
        if self.state.is_complete() {
            writeln!(out, "The draft is over.")?;
        } else if self.state.is_my_turn() {
            let next = self.state.next_pick_for_team(me)?;
            writeln!(out, "You are on the clock now; after this you pick at {next}.")?;
        } else {
            let next = self.state.next_pick_for_team(me)?;
            let waiting = self.state.order().picks_until_turn(self.state.current_pick(), me);
            writeln!(out, "Your next pick is {next} ({waiting} picks away).")?;
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Teams and tags
    // -----------------------------------------------------------------------

    fn rename<W: Write>(&mut self, team: u32, name: &str, out: &mut W) -> anyhow::Result<()> {
        if let Err(e) = self.state.rename_team(team, name) {
            writeln!(out, "{e}")?;
            return Ok(());
        }
        let names: Vec<String> = self
            .state
            .teams()
            .iter()
            .map(|t| t.display_name.clone())
            .collect();
        if let Err(e) = self.db.save_team_names(&self.draft_id, &names) {
            warn!("Failed to persist team names: {}", e);
        }
        writeln!(out, "Team {team} is now '{}'.", name.trim())?;
        if !self.state.use_team_names() {
            writeln!(out, "(`names` switches the display to team names.)")?;
        }
        Ok(())
    }

    fn untag<W: Write>(&mut self, tag: PlayerTag, query: &str, out: &mut W) -> anyhow::Result<()> {
        let needle = query.trim().to_lowercase();
        let matches: Vec<String> = self
            .state
            .tagged(tag)
            .into_iter()
            .map(|t| t.player.name)
            .filter(|name| name.to_lowercase().contains(&needle))
            .collect();
        match matches.as_slice() {
            [] => writeln!(out, "No player matching '{}' is tagged {tag}.", query.trim())?,
            [name] => {
                self.state.untag_player(name, tag);
                writeln!(out, "Removed the {tag} tag from {name}.")?;
            }
            several => writeln!(out, "'{}' matches {}; be more specific.", query.trim(), several.join(", "))?,
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Stats and sources
    // -----------------------------------------------------------------------

    fn stats<W: Write>(&self, query: &str, available_only: bool, out: &mut W) -> anyhow::Result<()> {
        let Some(book) = &self.stats else {
            writeln!(out, "No stats sheet loaded; set `stats` under [data] in draft.toml.")?;
            return Ok(());
        };
        let results = if available_only {
            book.search_available(query, &self.state)
        } else {
            book.search(query)
        };
        if results.is_empty() {
            writeln!(out, "No stats found for '{query}'.")?;
        }
        for history in &results {
            writeln!(out, "{}\n", render::history(history))?;
        }
        Ok(())
    }

    fn switch_source<W: Write>(&mut self, mode: ScoreMode, out: &mut W) -> anyhow::Result<()> {
        if mode == self.state.score_mode() {
            writeln!(out, "Already using {} ordering.", mode.label())?;
            return Ok(());
        }
        let switched = gridiron_data::load_player_source(&self.data_paths, mode)
            .map_err(DraftError::from)
            .and_then(|players| self.state.switch_source(players, mode));
        match switched {
            Ok(()) => {
                self.candidates.clear();
                writeln!(
                    out,
                    "Now ordering by {} ({} players available).",
                    mode.label(),
                    self.state.pool().len()
                )?;
            }
            Err(e) => writeln!(out, "Could not switch source: {e}")?,
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
