/// Errors raised by the transformation core.
///
/// Callers only ever need to branch on two outcomes: the input could not be
/// turned into a valid post, or the targeted post does not exist. Every
/// decoding, normalization and validation failure is folded into
/// [`Error::InvalidPost`] together with a human-readable cause.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid post: {0}")]
    InvalidPost(String),

    #[error("not found: {0}")]
    NotFound(String),
}

impl Error {
    pub fn invalid(cause: impl Into<String>) -> Self {
        Error::InvalidPost(cause.into())
    }

    pub fn not_found(url: impl Into<String>) -> Self {
        Error::NotFound(url.into())
    }

    pub fn is_invalid_post(&self) -> bool {
        matches!(self, Error::InvalidPost(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
