use thiserror::Error;

/// Why a lookup produced nothing. Only visible inside the crate's logs; the
/// public lookups report absence as `None`.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("catalog request failed: {0:#}")]
    Transport(#[from] anyhow::Error),
    #[error("malformed catalog payload: {0}")]
    Malformed(String),
    #[error("catalog returned no results")]
    Empty,
    #[error("invalid lookup input: {0}")]
    InvalidInput(String),
    #[error("no valid movie on page {page} after {tried} candidates")]
    Exhausted { page: u32, tried: usize },
}

impl LookupError {
    /// Outcomes that are a normal "nothing found" rather than a fault.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            LookupError::Empty | LookupError::InvalidInput(_) | LookupError::Exhausted { .. }
        )
    }
}

pub type LookupResult<T> = std::result::Result<T, LookupError>;
