// src/error.rs
//! Failure vocabulary for page fetching and engine configuration.
//!
//! The page source fails with a [`FetchError`]; the presentation layer never
//! sees that error directly, only its [`ErrorKind`] classification carried by
//! the derived display state.

use thiserror::Error;

/// How a settled load should be presented, as a typed vocabulary.
///
/// Instead of matching on error strings, the classification is encoded in the
/// type system: a transient network-shaped failure is worth a retry
/// affordance, anything else is not, and an empty-but-successful result is a
/// presentation concern rather than a failure at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorKind {
    /// Nothing went wrong.
    #[default]
    None,
    /// Transient network-shaped failure — retrying may help.
    Communication,
    /// Any other failure, including bugs surfaced through the page source.
    Unhandled,
    /// A successful fetch that yielded zero total items.
    NoResults,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Communication => write!(f, "communication"),
            Self::Unhandled => write!(f, "unhandled"),
            Self::NoResults => write!(f, "no results"),
        }
    }
}

/// What a caller-supplied page source may fail with.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transient network-shaped failure (timeout, unreachable host, 5xx).
    #[error("communication failure: {0}")]
    Communication(String),

    /// The fetch was torn down by the caller before it settled.
    ///
    /// The engine never initiates cancellation itself; this variant exists so
    /// an externally cancelled operation can surface as a `Canceled` observer
    /// status instead of a fault.
    #[error("fetch canceled by caller")]
    Canceled,

    /// Anything else the source ran into.
    #[error("page source failure: {message}")]
    Source {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl FetchError {
    /// A communication failure with the given description.
    pub fn communication(message: impl Into<String>) -> Self {
        Self::Communication(message.into())
    }

    /// A non-communication failure wrapping its cause.
    pub fn unhandled(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Source {
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// A non-communication failure described only by a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self::Source {
            message: message.into(),
            source: None,
        }
    }

    /// Whether this is the transient, retry-worthy failure kind.
    pub fn is_communication(&self) -> bool {
        matches!(self, Self::Communication(_))
    }

    /// Classifies this failure for display purposes.
    ///
    /// `Canceled` classifies as [`ErrorKind::Unhandled`]: the display layer
    /// has no dedicated affordance for a torn-down fetch with no data.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Communication(_) => ErrorKind::Communication,
            Self::Canceled | Self::Source { .. } => ErrorKind::Unhandled,
        }
    }
}

/// Rejected paginator construction parameters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("page size must be greater than {min}, got {given}")]
    PageSizeTooSmall { given: u32, min: u32 },

    #[error("max item count must be greater than {min}, got {given}")]
    MaxItemCountTooSmall { given: usize, min: usize },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn communication_failures_classify_as_communication() {
        let err = FetchError::communication("socket reset");
        assert!(err.is_communication());
        assert_eq!(err.kind(), ErrorKind::Communication);
    }

    #[test]
    fn other_failures_classify_as_unhandled() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        assert_eq!(FetchError::unhandled(io).kind(), ErrorKind::Unhandled);
        assert_eq!(FetchError::message("bad payload").kind(), ErrorKind::Unhandled);
        assert_eq!(FetchError::Canceled.kind(), ErrorKind::Unhandled);
    }

    #[test]
    fn unhandled_preserves_the_cause_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let err = FetchError::unhandled(io);
        assert_eq!(err.to_string(), "page source failure: disk on fire");
        assert!(std::error::Error::source(&err).is_some());
    }
}
