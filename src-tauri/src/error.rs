use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

#[derive(Debug, thiserror::Error)]
pub enum ScorecardError {
    #[error("{target} index {index} is out of range (have {len})")]
    InvalidIndex {
        target: &'static str,
        index: usize,
        len: usize,
    },
    #[error("score {value} is outside the allowed range {min}..={max}")]
    InvalidValue { value: i64, min: u8, max: u8 },
    #[error("invalid competitor name: {0}")]
    InvalidName(String),
    #[error("maximum of {max} competitors reached")]
    CapacityExceeded { max: usize },
    #[error("import rejected: {0}")]
    ImportRejected(String),
    #[error("scorecard store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("export failed: {0}")]
    ExportFailed(String),
}

impl ScorecardError {
    pub fn kind(&self) -> &'static str {
        match self {
            ScorecardError::InvalidIndex { .. } => "InvalidIndex",
            ScorecardError::InvalidValue { .. } => "InvalidValue",
            ScorecardError::InvalidName(_) => "InvalidName",
            ScorecardError::CapacityExceeded { .. } => "CapacityExceeded",
            ScorecardError::ImportRejected(_) => "ImportRejected",
            ScorecardError::StoreUnavailable(_) => "StoreUnavailable",
            ScorecardError::ExportFailed(_) => "ExportFailed",
        }
    }

    pub(crate) fn index(target: &'static str, index: usize, len: usize) -> Self {
        ScorecardError::InvalidIndex { target, index, len }
    }
}

impl From<rusqlite::Error> for ScorecardError {
    fn from(err: rusqlite::Error) -> Self {
        ScorecardError::StoreUnavailable(err.to_string())
    }
}

impl From<std::io::Error> for ScorecardError {
    fn from(err: std::io::Error) -> Self {
        ScorecardError::StoreUnavailable(err.to_string())
    }
}

// Commands hand errors to the front end as `{ kind, message }`.
impl Serialize for ScorecardError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ScorecardError", 2)?;
        state.serialize_field("kind", self.kind())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}
