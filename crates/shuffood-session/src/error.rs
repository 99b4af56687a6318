use shuffood_core::CoreError;
use shuffood_places::PlacesError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    /// A shuffle was requested over zero candidates.
    #[error("nothing to pick from: no candidates match the current filters")]
    EmptyCandidateSet,
}

/// Everything a session entry point can report back to its caller.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Places(#[from] PlacesError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error("no origin set; provide a location before searching")]
    NoOrigin,

    #[error("no candidate with id {0} in the current results")]
    UnknownCandidate(String),

    #[error("invalid filter: {0}")]
    Filter(#[from] CoreError),
}

impl SessionError {
    /// `true` when the same action may succeed if the user simply tries again.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Places(e) if e.is_retryable())
    }
}
