use thiserror::Error;
use trail_store::StoreError;

/// Every way an engine operation can be rejected.
///
/// Rejection always happens before anything is committed: callers fix the
/// violated condition and resubmit.
#[derive(Debug, Error)]
pub enum TrailError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("outside voting window: {0}")]
    OutOfWindow(String),

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("stored state is inconsistent: {0}")]
    Corrupted(String),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

/// Fieldless classification of a [`TrailError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    Unauthorized,
    InvalidState,
    InvalidAmount,
    OutOfWindow,
    LimitExceeded,
    InvalidArgument,
    Unsupported,
    Corrupted,
    Store,
}

impl TrailError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::AlreadyExists(_) => ErrorKind::AlreadyExists,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::InvalidState(_) => ErrorKind::InvalidState,
            Self::InvalidAmount(_) => ErrorKind::InvalidAmount,
            Self::OutOfWindow(_) => ErrorKind::OutOfWindow,
            Self::LimitExceeded(_) => ErrorKind::LimitExceeded,
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::Unsupported(_) => ErrorKind::Unsupported,
            Self::Corrupted(_) => ErrorKind::Corrupted,
            Self::Store(_) => ErrorKind::Store,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(
            TrailError::LimitExceeded("x".into()).kind(),
            ErrorKind::LimitExceeded
        );
        let store: TrailError = StoreError::Backend("disk".into()).into();
        assert_eq!(store.kind(), ErrorKind::Store);
        assert!(store.to_string().contains("disk"));
    }
}
