// Load errors for the CSV sources.

use gridiron_core::DraftError;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

impl From<LoadError> for DraftError {
    fn from(e: LoadError) -> Self {
        DraftError::RankingsUnavailable {
            reason: e.to_string(),
        }
    }
}

/// Read a whole source file, dropping a leading byte-order mark.
pub(crate) fn read_source(path: &std::path::Path) -> Result<String, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    })
}
