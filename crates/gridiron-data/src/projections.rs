// Projected fantasy points loading.
//
// Rows are `Player,Predicted_FP`. A player may appear more than once (one row
// per model run or per source); duplicates are averaged so the pool sees a
// single record per name. Position, team and bye come from the rankings
// sheet, joined by name.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use gridiron_core::PlayerRecord;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{read_source, LoadError};

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawProjection {
    #[serde(alias = "Name")]
    Player: String,
    #[serde(alias = "FPTS", alias = "Points")]
    Predicted_FP: f64,
}

/// Running sum and count per lowercased name, keeping the first spelling.
#[derive(Default)]
struct Accumulator {
    name: String,
    total: f64,
    count: u32,
}

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

pub(crate) fn load_projections_from_reader<R: Read>(rdr: R) -> Result<HashMap<String, f64>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut acc: HashMap<String, Accumulator> = HashMap::new();
    for result in reader.deserialize::<RawProjection>() {
        match result {
            Ok(raw) => {
                let name = raw.Player.trim();
                if name.is_empty() {
                    warn!("skipping projection row with a blank player name");
                    continue;
                }
                if !raw.Predicted_FP.is_finite() {
                    warn!("skipping projection for '{}': non-finite value", name);
                    continue;
                }
                let entry = acc.entry(name.to_lowercase()).or_insert_with(|| Accumulator {
                    name: name.to_string(),
                    ..Accumulator::default()
                });
                if entry.count > 0 {
                    debug!("duplicate projection for '{}', averaging", name);
                }
                entry.total += raw.Predicted_FP;
                entry.count += 1;
            }
            Err(e) => {
                warn!("skipping malformed projection row: {}", e);
            }
        }
    }
    Ok(acc
        .into_values()
        .map(|a| (a.name, a.total / f64::from(a.count)))
        .collect())
}

/// Load projected points keyed by player name, duplicates averaged.
pub fn load_projections(path: &Path) -> Result<HashMap<String, f64>, LoadError> {
    let text = read_source(path)?;
    let map = load_projections_from_reader(text.as_bytes()).map_err(|e| LoadError::Csv {
        path: path.display().to_string(),
        source: e,
    })?;
    if map.is_empty() {
        return Err(LoadError::Validation(format!(
            "projections file {} produced zero valid rows",
            path.display()
        )));
    }
    info!("Loaded projections for {} players from {}", map.len(), path.display());
    Ok(map)
}

/// Build a points-mode player source: every ranked player that has a
/// projection, with the projection as its score. Ranked players without a
/// projection and projections without a ranking row are dropped.
pub fn apply_projections(rankings: &[PlayerRecord], points: &HashMap<String, f64>) -> Vec<PlayerRecord> {
    let by_name: HashMap<String, f64> = points
        .iter()
        .map(|(name, &fp)| (name.to_lowercase(), fp))
        .collect();

    let projected: Vec<PlayerRecord> = rankings
        .iter()
        .filter_map(|p| {
            by_name.get(&p.name.to_lowercase()).map(|&fp| PlayerRecord {
                score: fp,
                ..p.clone()
            })
        })
        .collect();

    let unmatched = points.len().saturating_sub(projected.len());
    if unmatched > 0 {
        debug!("{} projection rows had no rankings entry", unmatched);
    }
    projected
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
