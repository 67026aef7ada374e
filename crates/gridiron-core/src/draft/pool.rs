// Available-player pool: lookup, ordering, and removal.

use std::collections::HashSet;

use tracing::warn;

use super::player::{PlayerRecord, Position, ScoreMode};

/// Result of resolving an operator's free-text query against the pool.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// Exactly one player answers to the query.
    Unique(PlayerRecord),
    NotFound(String),
    /// Several players match; the operator has to narrow the query.
    Ambiguous(Vec<PlayerRecord>),
}

/// The undrafted players. A name is never in the pool and on a roster at
/// the same time; `DraftState` maintains that.
#[derive(Debug, Clone, Default)]
pub struct PlayerPool {
    players: Vec<PlayerRecord>,
}

impl PlayerPool {
    /// Build a pool from a source's records. Later duplicates of a name are
    /// dropped so that names stay unique.
    pub fn new(players: Vec<PlayerRecord>) -> Self {
        let mut seen = HashSet::new();
        let players = players
            .into_iter()
            .filter(|p| {
                let fresh = seen.insert(p.name.to_lowercase());
                if !fresh {
                    warn!("skipping duplicate player row: {}", p);
                }
                fresh
            })
            .collect();
        PlayerPool { players }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn players(&self) -> &[PlayerRecord] {
        &self.players
    }

    pub fn contains(&self, name: &str) -> bool {
        self.players.iter().any(|p| p.name_matches(name))
    }

    pub fn get(&self, name: &str) -> Option<&PlayerRecord> {
        self.players.iter().find(|p| p.name_matches(name))
    }

    /// Case-insensitive fuzzy search.
    ///
    /// A record matches when the query equals one of its name tokens, when a
    /// name token starts with the query, or when the query appears anywhere in
    /// the full name. Blank queries match nothing.
    pub fn find(&self, query: &str) -> Vec<PlayerRecord> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.players
            .iter()
            .filter(|p| {
                let name = p.name.to_lowercase();
                name.split_whitespace()
                    .any(|token| token == needle || token.starts_with(&needle))
                    || name.contains(&needle)
            })
            .cloned()
            .collect()
    }

    /// Resolve a query to at most one player.
    ///
    /// Among several matches, a record whose full name equals the query wins,
    /// so typing a complete name always disambiguates.
    pub fn resolve(&self, query: &str) -> Lookup {
        let mut matches = self.find(query);
        match matches.len() {
            0 => Lookup::NotFound(query.trim().to_string()),
            1 => Lookup::Unique(matches.remove(0)),
            _ => {
                let exact: Vec<usize> = matches
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.name_matches(query))
                    .map(|(i, _)| i)
                    .collect();
                if let &[only] = exact.as_slice() {
                    Lookup::Unique(matches.swap_remove(only))
                } else {
                    Lookup::Ambiguous(matches)
                }
            }
        }
    }

    /// Remove and return the record with exactly this name.
    pub fn take(&mut self, name: &str) -> Option<PlayerRecord> {
        let idx = self.players.iter().position(|p| p.name_matches(name))?;
        Some(self.players.remove(idx))
    }

    /// Return a record to the pool, e.g. after an undo.
    pub fn restore(&mut self, player: PlayerRecord) {
        if !self.contains(&player.name) {
            self.players.push(player);
        }
    }

    /// Undrafted players sorted best-first under `mode`, optionally restricted
    /// to one position. Records named in `drafted` are skipped even if they
    /// are still present, so a stale pool never leaks a rostered player.
    pub fn best_available(
        &self,
        position: Option<Position>,
        limit: Option<usize>,
        mode: ScoreMode,
        drafted: &HashSet<String>,
    ) -> Vec<PlayerRecord> {
        let mut ranked: Vec<&PlayerRecord> = self
            .players
            .iter()
            .filter(|p| position.map_or(true, |pos| p.position == pos))
            .filter(|p| !drafted.contains(&p.name.to_lowercase()))
            .collect();
        // Stable: equal scores keep source order.
        ranked.sort_by(|a, b| mode.compare(a, b));

        ranked
            .into_iter()
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_pool() -> PlayerPool {
        PlayerPool::new(vec![
            PlayerRecord::new("Josh Allen", Position::Quarterback, 20.0),
            PlayerRecord::new("Josh Jacobs", Position::RunningBack, 15.0),
            PlayerRecord::new("Justin Jefferson", Position::WideReceiver, 2.0),
            PlayerRecord::new("Christian McCaffrey", Position::RunningBack, 1.0),
            PlayerRecord::new("Harrison Butker", Position::Kicker, 150.0),
            PlayerRecord::new("Amon-Ra St. Brown", Position::WideReceiver, 6.0),
        ])
    }

    #[test]
    fn find_by_token_prefix_and_substring() {
        let pool = sample_pool();
        assert_eq!(pool.find("josh").len(), 2);
        assert_eq!(pool.find("jeff")[0].name, "Justin Jefferson");
        assert_eq!(pool.find("ccaff")[0].name, "Christian McCaffrey");
        assert_eq!(pool.find("st. brown")[0].name, "Amon-Ra St. Brown");
    }

    #[test]
    fn duplicate_names_keep_first_record() {
        let pool = PlayerPool::new(vec![
            PlayerRecord::new("Josh Allen", Position::Quarterback, 20.0),
            PlayerRecord::new("JOSH ALLEN", Position::Quarterback, 99.0),
            PlayerRecord::new("Josh Jacobs", Position::RunningBack, 15.0),
        ]);
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.get("josh allen").map(|p| p.score), Some(20.0));
    }

    #[test]
    fn find_blank_query_matches_nothing() {
        let pool = sample_pool();
        assert!(pool.find("").is_empty());
        assert!(pool.find("   ").is_empty());
    }

    #[test]
    fn resolve_reports_ambiguity() {
        let pool = sample_pool();
        match pool.resolve("Josh") {
            Lookup::Ambiguous(candidates) => {
                let names: Vec<&str> = candidates.iter().map(|p| p.name.as_str()).collect();
                assert_eq!(names, vec!["Josh Allen", "Josh Jacobs"]);
            }
            other => panic!("expected Ambiguous, got: {other:?}"),
        }
    }

    #[test]
    fn resolve_not_found_echoes_query() {
        let pool = sample_pool();
        assert_eq!(pool.resolve(" Nobody "), Lookup::NotFound("Nobody".to_string()));
    }

    #[test]
    fn exact_full_name_beats_longer_matches() {
        let pool = PlayerPool::new(vec![
            PlayerRecord::new("Mike Williams", Position::WideReceiver, 60.0),
            PlayerRecord::new("Mike Williams Jr.", Position::WideReceiver, 200.0),
        ]);
        match pool.resolve("mike williams") {
            Lookup::Unique(p) => assert_eq!(p.name, "Mike Williams"),
            other => panic!("expected Unique, got: {other:?}"),
        }
    }

    #[test]
    fn new_drops_duplicate_names() {
        let pool = PlayerPool::new(vec![
            PlayerRecord::new("Tyreek Hill", Position::WideReceiver, 5.0),
            PlayerRecord::new("tyreek hill", Position::WideReceiver, 9.0),
        ]);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.players()[0].score, 5.0);
    }

    #[test]
    fn best_available_orders_by_mode() {
        let pool = sample_pool();
        let none = HashSet::new();

        let by_rank = pool.best_available(None, Some(3), ScoreMode::Rank, &none);
        let names: Vec<&str> = by_rank.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Christian McCaffrey", "Justin Jefferson", "Amon-Ra St. Brown"]);

        let by_points = pool.best_available(None, Some(1), ScoreMode::Points, &none);
        assert_eq!(by_points[0].name, "Harrison Butker");
    }

    #[test]
    fn best_available_filters_position_and_drafted() {
        let pool = sample_pool();
        let mut drafted = HashSet::new();
        drafted.insert("christian mccaffrey".to_string());

        let rbs = pool.best_available(Some(Position::RunningBack), None, ScoreMode::Rank, &drafted);
        assert_eq!(rbs.len(), 1);
        assert_eq!(rbs[0].name, "Josh Jacobs");
    }

    #[test]
    fn best_available_keeps_source_order_on_ties() {
        let pool = PlayerPool::new(vec![
            PlayerRecord::new("B Kicker", Position::Kicker, 999.0),
            PlayerRecord::new("A Kicker", Position::Kicker, 999.0),
        ]);
        let ranked = pool.best_available(None, None, ScoreMode::Rank, &HashSet::new());
        assert_eq!(ranked[0].name, "B Kicker");
    }

    #[test]
    fn take_and_restore() {
        let mut pool = sample_pool();
        let taken = pool.take("josh allen").unwrap();
        assert_eq!(taken.name, "Josh Allen");
        assert!(!pool.contains("Josh Allen"));
        assert!(pool.take("Josh Allen").is_none());

        pool.restore(taken.clone());
        pool.restore(taken);
        assert_eq!(pool.len(), 6);
    }
}
