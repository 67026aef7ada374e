// Configuration loading and parsing (draft.toml).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::draft::player::{Position, ScoreMode};
use crate::error::DraftError;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("no config/draft.toml and no defaults/draft.toml under {dir}; run from the project root")]
    NoDefaults { dir: PathBuf },

    #[error("failed to install default config at {path}: {source}")]
    InstallFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl From<DraftError> for ConfigError {
    fn from(err: DraftError) -> Self {
        match err {
            DraftError::InvalidConfiguration { field, message } => {
                ConfigError::ValidationError { field, message }
            }
            other => ConfigError::ValidationError {
                field: "draft".into(),
                message: other.to_string(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub draft: DraftConfiguration,
    pub data_paths: DataPaths,
    pub db_path: String,
    pub autodraft: AutoDraftConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// League shape
// ---------------------------------------------------------------------------

/// Starting lineup slot counts. Field names are UPPERCASE to match the TOML
/// keys (QB, RB, ..., FLEX).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_snake_case)]
#[serde(default)]
pub struct LineupSettings {
    pub QB: usize,
    pub RB: usize,
    pub WR: usize,
    pub TE: usize,
    pub K: usize,
    pub DST: usize,
    pub FLEX: usize,
}

impl Default for LineupSettings {
    fn default() -> Self {
        LineupSettings {
            QB: 1,
            RB: 2,
            WR: 2,
            TE: 1,
            K: 1,
            DST: 1,
            FLEX: 1,
        }
    }
}

impl LineupSettings {
    /// Dedicated starting slots for a position (FLEX not included).
    pub fn starters(&self, position: Position) -> usize {
        match position {
            Position::Quarterback => self.QB,
            Position::RunningBack => self.RB,
            Position::WideReceiver => self.WR,
            Position::TightEnd => self.TE,
            Position::Kicker => self.K,
            Position::Defense => self.DST,
        }
    }
}

/// Maximum players a team may roster at each position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_snake_case)]
pub struct RosterLimits {
    pub QB: usize,
    pub RB: usize,
    pub WR: usize,
    pub TE: usize,
    pub K: usize,
    pub DST: usize,
}

impl RosterLimits {
    pub fn get(&self, position: Position) -> usize {
        match position {
            Position::Quarterback => self.QB,
            Position::RunningBack => self.RB,
            Position::WideReceiver => self.WR,
            Position::TightEnd => self.TE,
            Position::Kicker => self.K,
            Position::Defense => self.DST,
        }
    }

    /// Limits used when the configuration does not list any: room for a
    /// backup QB and TE, FLEX-inflated depth at RB and WR, one K and DST.
    pub fn from_lineup(lineup: &LineupSettings) -> Self {
        RosterLimits {
            QB: lineup.QB.max(2),
            RB: (lineup.RB + lineup.FLEX).max(6),
            WR: (lineup.WR + lineup.FLEX).max(6),
            TE: lineup.TE.max(2),
            K: lineup.K.max(1),
            DST: lineup.DST.max(1),
        }
    }
}

/// Everything the draft engine needs to know about the league.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftConfiguration {
    pub total_teams: u32,
    /// The operator's own team number (1-based).
    pub your_position: u32,
    pub total_rounds: u32,
    pub lineup: LineupSettings,
    pub roster_limits: RosterLimits,
    pub score_mode: ScoreMode,
}

impl DraftConfiguration {
    /// Build a configuration with roster limits derived from the lineup.
    pub fn new(total_teams: u32, your_position: u32, total_rounds: u32) -> Self {
        let lineup = LineupSettings::default();
        DraftConfiguration {
            total_teams,
            your_position,
            total_rounds,
            lineup,
            roster_limits: RosterLimits::from_lineup(&lineup),
            score_mode: ScoreMode::Rank,
        }
    }

    pub fn total_picks(&self) -> u32 {
        self.total_teams * self.total_rounds
    }

    /// Reject configurations a draft cannot be run with. Called before any
    /// draft state is built.
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.total_teams == 0 {
            return Err(DraftError::InvalidConfiguration {
                field: "draft.total_teams".into(),
                message: "must be greater than 0".into(),
            });
        }

        if self.your_position == 0 || self.your_position > self.total_teams {
            return Err(DraftError::InvalidConfiguration {
                field: "draft.your_position".into(),
                message: format!(
                    "must be between 1 and {}, got {}",
                    self.total_teams, self.your_position
                ),
            });
        }

        if self.total_rounds == 0 {
            return Err(DraftError::InvalidConfiguration {
                field: "draft.total_rounds".into(),
                message: "must be greater than 0".into(),
            });
        }

        for position in Position::ALL {
            let limit = self.roster_limits.get(position);
            let starters = self.lineup.starters(position);
            if limit < starters {
                return Err(DraftError::InvalidConfiguration {
                    field: format!("draft.roster_limits.{position}"),
                    message: format!(
                        "roster limit {limit} is below the {starters} starting lineup slot(s)"
                    ),
                });
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// draft.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire draft.toml file.
#[derive(Debug, Clone, Deserialize)]
struct DraftFile {
    draft: DraftSection,
    data: DataPaths,
    database: DatabaseSection,
    #[serde(default)]
    autodraft: AutoDraftConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
struct DraftSection {
    total_teams: u32,
    your_position: u32,
    total_rounds: u32,
    #[serde(default)]
    score_mode: ScoreMode,
    #[serde(default)]
    lineup: LineupSettings,
    #[serde(default)]
    roster_limits: Option<RosterLimits>,
}

#[derive(Debug, Clone, Deserialize)]
struct DatabaseSection {
    path: String,
}

/// Input files. Only the rankings sheet is required.
#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub rankings: String,
    #[serde(default)]
    pub projections: Option<String>,
    #[serde(default)]
    pub stats: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AutoDraftConfig {
    /// Pause between consecutive automated picks, in milliseconds.
    pub pick_delay_ms: u64,
    /// Fixed seed for reproducible auto-drafts; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for AutoDraftConfig {
    fn default() -> Self {
        AutoDraftConfig {
            pick_delay_ms: 500,
            seed: None,
        }
    }
}

/// Where the log file goes and which targets it records. `RUST_LOG`, when
/// set, overrides `filter`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: String,
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            dir: "logs".into(),
            filter: "gridiron=info,warn".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

const CONFIG_FILE: &str = "draft.toml";

/// Load and validate configuration from `config/draft.toml` relative to
/// `base_dir`. Does not copy defaults; see `load_config()`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let draft_path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&draft_path)?;
    let file: DraftFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: draft_path.clone(),
        source: e,
    })?;

    let section = file.draft;
    let roster_limits = section
        .roster_limits
        .unwrap_or_else(|| RosterLimits::from_lineup(&section.lineup));

    let config = Config {
        draft: DraftConfiguration {
            total_teams: section.total_teams,
            your_position: section.your_position,
            total_rounds: section.total_rounds,
            lineup: section.lineup,
            roster_limits,
            score_mode: section.score_mode,
        },
        data_paths: file.data,
        db_path: file.database.path,
        autodraft: file.autodraft,
        logging: file.logging,
    };

    validate(&config)?;

    Ok(config)
}

/// Copy `defaults/draft.toml` to `config/draft.toml` when the operator has
/// no copy yet. Returns whether a file was installed. An existing copy is
/// never touched.
pub fn install_default_config(base_dir: &Path) -> Result<bool, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.exists() {
        return Ok(false);
    }

    let source = base_dir.join("defaults").join(CONFIG_FILE);
    if !source.is_file() {
        return Err(ConfigError::NoDefaults {
            dir: base_dir.to_path_buf(),
        });
    }

    let install_err = |e| ConfigError::InstallFailed {
        path: target.clone(),
        source: e,
    };
    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir).map_err(install_err)?;
    }
    std::fs::copy(&source, &target).map_err(install_err)?;
    Ok(true)
}

/// Load config relative to the current working directory, copying defaults
/// first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    if install_default_config(&cwd)? {
        tracing::info!("Installed default config at config/{}", CONFIG_FILE);
    }
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    config.draft.validate()?;

    if config.data_paths.rankings.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data.rankings".into(),
            message: "must name a rankings CSV file".into(),
        });
    }

    if config.draft.score_mode == ScoreMode::Points && config.data_paths.projections.is_none() {
        return Err(ConfigError::ValidationError {
            field: "data.projections".into(),
            message: "score_mode = \"points\" requires a projections file".into(),
        });
    }

    if config.db_path.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "database.path".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
