use thiserror::Error;

/// Failures reaching or decoding the catalog sources.
///
/// `Clone` because one collection load is shared by every caller awaiting
/// it and all of them receive the same outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("malformed data: {0}")]
    MalformedData(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl CatalogError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Transport(_) => "transport",
            Self::MalformedData(_) => "malformed_data",
            Self::InvalidArgument(_) => "invalid_argument",
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedData(err.to_string())
    }
}
