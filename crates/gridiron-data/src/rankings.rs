// Expert rankings sheet loading.
//
// Rows are `Player,POS,Team,Bye,Rank`. POS carries a positional-depth suffix
// ("RB12") that is stripped to the base position. A missing or unparseable
// Rank becomes the unranked sentinel so the player sorts last.

use std::io::Read;
use std::path::Path;

use gridiron_core::{PlayerRecord, Position, UNRANKED_SENTINEL};
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{read_source, LoadError};

// ---------------------------------------------------------------------------
// Raw CSV serde struct (private)
// ---------------------------------------------------------------------------

/// One rankings row. Extra columns (tiers, ADP, ECR spreads) are ignored.
#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawRanking {
    #[serde(alias = "PLAYER NAME", alias = "Name")]
    Player: String,
    #[serde(default, alias = "Pos", alias = "POSITION")]
    POS: String,
    #[serde(default, alias = "TEAM", alias = "Tm")]
    Team: String,
    #[serde(default, alias = "BYE", alias = "BYE WEEK")]
    Bye: String,
    #[serde(default, alias = "RK")]
    Rank: Option<String>,
}

/// Parse a rank cell, falling back to the sentinel.
pub fn parse_rank(raw: Option<&str>) -> f64 {
    raw.map(|s| s.trim().trim_matches('"'))
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(UNRANKED_SENTINEL)
}

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

pub(crate) fn load_rankings_from_reader<R: Read>(rdr: R) -> Result<Vec<PlayerRecord>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut players = Vec::new();
    for result in reader.deserialize::<RawRanking>() {
        match result {
            Ok(raw) => {
                let name = raw.Player.trim();
                if name.is_empty() {
                    warn!("skipping rankings row with a blank player name");
                    continue;
                }
                let Some(position) = Position::from_rank_tag(&raw.POS) else {
                    warn!("skipping '{}': unknown POS '{}'", name, raw.POS.trim());
                    continue;
                };
                let score = parse_rank(raw.Rank.as_deref());
                players.push(
                    PlayerRecord::new(name, position, score).with_team(raw.Team.trim(), raw.Bye.trim()),
                );
            }
            Err(e) => {
                warn!("skipping malformed rankings row: {}", e);
            }
        }
    }
    Ok(players)
}

/// Load the rankings sheet. Zero usable rows is an error.
pub fn load_rankings(path: &Path) -> Result<Vec<PlayerRecord>, LoadError> {
    let text = read_source(path)?;
    let players = load_rankings_from_reader(text.as_bytes()).map_err(|e| LoadError::Csv {
        path: path.display().to_string(),
        source: e,
    })?;
    if players.is_empty() {
        return Err(LoadError::Validation(format!(
            "rankings file {} produced zero valid rows",
            path.display()
        )));
    }
    info!("Loaded {} ranked players from {}", players.len(), path.display());
    Ok(players)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn load(csv_data: &str) -> Vec<PlayerRecord> {
        load_rankings_from_reader(csv_data.as_bytes()).unwrap()
    }

    #[test]
    fn rankings_rows_map_to_records() {
        let players = load(
            "Player,POS,Team,Bye,Rank\n\
             Christian McCaffrey,RB1,SF,9,1\n\
             Tyreek Hill,WR1,MIA,6,2.5\n",
        );
        assert_eq!(players.len(), 2);
        assert_eq!(players[0].name, "Christian McCaffrey");
        assert_eq!(players[0].position, Position::RunningBack);
        assert_eq!(players[0].team, "SF");
        assert_eq!(players[0].bye, "9");
        assert_eq!(players[0].score, 1.0);
        assert_eq!(players[1].score, 2.5);
    }

    #[test]
    fn depth_suffix_stripped_from_pos() {
        let players = load("Player,POS,Team,Bye,Rank\nA,DST12,DAL,7,150\nB,TE3,KC,10,20\n");
        assert_eq!(players[0].position, Position::Defense);
        assert_eq!(players[1].position, Position::TightEnd);
    }

    #[test]
    fn bad_or_missing_rank_uses_sentinel() {
        let players = load("Player,POS,Team,Bye,Rank\nA,QB1,BUF,7,n/a\nB,QB2,PHI,5,\n");
        assert_eq!(players[0].score, UNRANKED_SENTINEL);
        assert_eq!(players[1].score, UNRANKED_SENTINEL);

        let no_rank_column = load("Player,POS,Team,Bye\nC,WR4,LAR,6\n");
        assert_eq!(no_rank_column[0].score, UNRANKED_SENTINEL);
    }

    #[test]
    fn unknown_position_and_blank_name_skipped() {
        let players = load("Player,POS,Team,Bye,Rank\nA,LB1,NYG,11,50\n,RB9,NYJ,12,60\nB,WR9,SEA,10,70\n");
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].name, "B");
    }

    #[test]
    fn names_and_cells_trimmed() {
        let players = load("Player,POS,Team,Bye,Rank\n  Justin Jefferson  ,WR2, MIN , 6 , 4 \n");
        assert_eq!(players[0].name, "Justin Jefferson");
        assert_eq!(players[0].team, "MIN");
        assert_eq!(players[0].bye, "6");
        assert_eq!(players[0].score, 4.0);
    }

    #[test]
    fn fantasypros_headers_accepted() {
        let players = load("RK,PLAYER NAME,TEAM,POS,BYE WEEK\n1,Bijan Robinson,ATL,RB1,12\n");
        assert_eq!(players[0].name, "Bijan Robinson");
        assert_eq!(players[0].team, "ATL");
        assert_eq!(players[0].score, 1.0);
    }

    #[test]
    fn empty_csv_returns_empty_vec() {
        assert!(load("Player,POS,Team,Bye,Rank\n").is_empty());
    }

    #[test]
    fn parse_rank_values() {
        assert_eq!(parse_rank(Some("12")), 12.0);
        assert_eq!(parse_rank(Some(" \"7.5\" ")), 7.5);
        assert_eq!(parse_rank(Some("NaN")), UNRANKED_SENTINEL);
        assert_eq!(parse_rank(None), UNRANKED_SENTINEL);
    }
}
