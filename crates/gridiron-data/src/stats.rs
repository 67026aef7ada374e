// Historical season stats, read-only.
//
// One row per player-season with the pro-football-reference style columns
// (Player, Year, Tm, FantPos, G, GS, Cmp, Yds, RushYds, RecYds, PPR, ...).
// Rows are kept as raw cells; numeric reads happen on demand.

use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::Path;

use gridiron_core::DraftState;
use tracing::{info, warn};

use crate::error::{read_source, LoadError};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One player-season.
#[derive(Debug, Clone, PartialEq)]
pub struct StatLine {
    pub player: String,
    pub year: u16,
    pub team: String,
    pub position: String,
    values: BTreeMap<String, String>,
}

impl StatLine {
    /// Raw cell for a column, if the sheet has it.
    pub fn raw(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }

    /// Numeric value of a column. Blank or non-numeric cells read as `None`.
    pub fn stat(&self, column: &str) -> Option<f64> {
        self.raw(column)
            .and_then(|s| s.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
    }

    /// Games played; a missing cell counts as one game.
    pub fn games(&self) -> f64 {
        self.stat("G").unwrap_or(1.0)
    }

    fn per_game(&self, column: &str) -> f64 {
        let games = self.games();
        if games <= 0.0 {
            return 0.0;
        }
        self.stat(column).unwrap_or(0.0) / games
    }

    pub fn rushing_yards_per_game(&self) -> f64 {
        self.per_game("RushYds")
    }

    pub fn receiving_yards_per_game(&self) -> f64 {
        self.per_game("RecYds")
    }

    /// Passing yards per game; `Yds` is the passing column.
    pub fn passing_yards_per_game(&self) -> f64 {
        self.per_game("Yds")
    }

    pub fn yards_per_completion(&self) -> f64 {
        match self.stat("Cmp") {
            Some(cmp) if cmp > 0.0 => self.stat("Yds").unwrap_or(0.0) / cmp,
            _ => 0.0,
        }
    }

    pub fn is_quarterback(&self) -> bool {
        self.position.eq_ignore_ascii_case("QB")
    }
}

/// Every season on file for one player, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerHistory {
    pub player: String,
    pub seasons: Vec<StatLine>,
}

/// Sums across a player's seasons.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CareerTotals {
    pub games: f64,
    pub starts: f64,
    pub fantasy_points: f64,
}

impl PlayerHistory {
    pub fn career_totals(&self) -> CareerTotals {
        self.seasons.iter().fold(CareerTotals::default(), |mut t, s| {
            t.games += s.stat("G").unwrap_or(0.0);
            t.starts += s.stat("GS").unwrap_or(0.0);
            t.fantasy_points += s.stat("PPR").unwrap_or(0.0);
            t
        })
    }
}

/// All loaded seasons, in file order.
#[derive(Debug, Clone, Default)]
pub struct StatsBook {
    lines: Vec<StatLine>,
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// A term matches a name when it is a substring of one of the name's parts,
/// or one of the parts is a substring of it.
fn name_matches_terms(name: &str, terms: &[String]) -> bool {
    let lower = name.to_lowercase();
    let parts: Vec<&str> = lower.split_whitespace().collect();
    terms
        .iter()
        .any(|term| parts.iter().any(|part| part.contains(term.as_str()) || term.contains(part)))
}

impl StatsBook {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Matching players grouped with their seasons newest first. Players
    /// appear in the order their first row appears in the sheet.
    pub fn search(&self, query: &str) -> Vec<PlayerHistory> {
        let terms: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
        if terms.is_empty() {
            return Vec::new();
        }

        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut out: Vec<PlayerHistory> = Vec::new();
        for line in self.lines.iter().filter(|l| name_matches_terms(&l.player, &terms)) {
            let slot = *index.entry(line.player.as_str()).or_insert_with(|| {
                out.push(PlayerHistory {
                    player: line.player.clone(),
                    seasons: Vec::new(),
                });
                out.len() - 1
            });
            out[slot].seasons.push(line.clone());
        }

        for history in &mut out {
            history.seasons.sort_by(|a, b| b.year.cmp(&a.year));
        }
        out
    }

    /// Like `search`, restricted to players still in the draft pool.
    pub fn search_available(&self, query: &str, state: &DraftState) -> Vec<PlayerHistory> {
        self.search(query)
            .into_iter()
            .filter(|h| state.pool().contains(&h.player) && state.drafted_by(&h.player).is_none())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

pub(crate) fn load_stats_from_reader<R: Read>(rdr: R) -> Result<StatsBook, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();

    let mut lines = Vec::new();
    for result in reader.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!("skipping malformed stats row: {}", e);
                continue;
            }
        };
        let values: BTreeMap<String, String> = headers
            .iter()
            .cloned()
            .zip(record.iter().map(|v| v.trim().to_string()))
            .collect();

        let player = values.get("Player").cloned().unwrap_or_default();
        if player.is_empty() {
            warn!("skipping stats row with a blank player name");
            continue;
        }
        let Some(year) = values.get("Year").and_then(|y| y.parse::<u16>().ok()) else {
            warn!("skipping stats row for '{}': bad or missing Year", player);
            continue;
        };

        lines.push(StatLine {
            team: values.get("Tm").cloned().unwrap_or_default(),
            position: values.get("FantPos").cloned().unwrap_or_default(),
            player,
            year,
            values,
        });
    }
    Ok(StatsBook { lines })
}

/// Load the stats sheet. An empty sheet is allowed; lookups just find nothing.
pub fn load_stats(path: &Path) -> Result<StatsBook, LoadError> {
    let text = read_source(path)?;
    let book = load_stats_from_reader(text.as_bytes()).map_err(|e| LoadError::Csv {
        path: path.display().to_string(),
        source: e,
    })?;
    info!("Loaded {} player-seasons from {}", book.len(), path.display());
    Ok(book)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use gridiron_core::{DraftConfiguration, PlayerRecord, Position};

    const SHEET: &str = "\
Player,Year,Tm,FantPos,G,GS,Cmp,Att,Yds,RushYds,RecYds,PPR
Josh Allen,2022,BUF,QB,16,16,359,567,4283,762,0,395.4
Josh Allen,2023,BUF,QB,17,17,385,579,4306,524,0,392.6
Josh Jacobs,2023,LVR,RB,13,13,0,0,0,805,296,191.2
Allen Robinson,2021,LAR,WR,12,10,0,0,0,0,339,77.0
Tyreek Hill,2023,MIA,WR,0,0,0,0,0,15,1799,376.4
";

    fn book() -> StatsBook {
        load_stats_from_reader(SHEET.as_bytes()).unwrap()
    }

    #[test]
    fn rows_load_with_identity_columns() {
        let book = book();
        assert_eq!(book.len(), 5);
        let first = &book.lines[0];
        assert_eq!(first.player, "Josh Allen");
        assert_eq!(first.year, 2022);
        assert_eq!(first.team, "BUF");
        assert!(first.is_quarterback());
        assert_eq!(first.raw("Cmp"), Some("359"));
        assert_eq!(first.stat("PPR"), Some(395.4));
        assert_eq!(first.stat("Missing"), None);
    }

    #[test]
    fn search_groups_seasons_newest_first() {
        let results = book().search("josh");
        let names: Vec<&str> = results.iter().map(|h| h.player.as_str()).collect();
        assert_eq!(names, vec!["Josh Allen", "Josh Jacobs"]);
        let years: Vec<u16> = results[0].seasons.iter().map(|s| s.year).collect();
        assert_eq!(years, vec![2023, 2022]);
    }

    #[test]
    fn search_matches_any_name_part() {
        // "allen" is a part of both "Josh Allen" and "Allen Robinson".
        let results = book().search("Allen");
        assert_eq!(results.len(), 2);
        // A term longer than a name part still matches when it contains it.
        assert_eq!(book().search("hilly")[0].player, "Tyreek Hill");
        assert!(book().search("   ").is_empty());
        assert!(book().search("zzz").is_empty());
    }

    #[test]
    fn per_game_helpers() {
        let book = book();
        let allen_2022 = &book.lines[0];
        assert!((allen_2022.passing_yards_per_game() - 4283.0 / 16.0).abs() < 1e-9);
        assert!((allen_2022.rushing_yards_per_game() - 762.0 / 16.0).abs() < 1e-9);
        assert!((allen_2022.yards_per_completion() - 4283.0 / 359.0).abs() < 1e-9);

        let jacobs = &book.lines[2];
        assert!((jacobs.receiving_yards_per_game() - 296.0 / 13.0).abs() < 1e-9);
        assert_eq!(jacobs.yards_per_completion(), 0.0);

        // Zero games played.
        let hill = &book.lines[4];
        assert_eq!(hill.receiving_yards_per_game(), 0.0);
    }

    #[test]
    fn career_totals_sum_seasons() {
        let history = &book().search("Josh Allen")[0];
        let totals = history.career_totals();
        assert_eq!(totals.games, 33.0);
        assert_eq!(totals.starts, 33.0);
        assert!((totals.fantasy_points - 788.0).abs() < 1e-9);
    }

    #[test]
    fn bad_year_rows_skipped() {
        let book = load_stats_from_reader("Player,Year\nA,2020\nB,twenty\n,2021\n".as_bytes()).unwrap();
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn available_view_drops_drafted_and_unranked() {
        let players = vec![
            PlayerRecord::new("Josh Allen", Position::Quarterback, 20.0),
            PlayerRecord::new("Josh Jacobs", Position::RunningBack, 30.0),
        ];
        let mut state = DraftState::new(DraftConfiguration::new(2, 1, 2), players).unwrap();
        let book = book();

        // Allen Robinson is not in the pool at all.
        let names: Vec<String> = book.search_available("allen", &state).into_iter().map(|h| h.player).collect();
        assert_eq!(names, vec!["Josh Allen"]);

        state.draft_current("Josh Allen").unwrap();
        let names: Vec<String> = book.search_available("josh", &state).into_iter().map(|h| h.player).collect();
        assert_eq!(names, vec!["Josh Jacobs"]);
    }
}
