// Recoverable errors reported back to the caller as guidance text.
//
// None of these are fatal and none leave a draft state half-updated: the
// dispatcher discards the working copy whenever a handler returns one.

use thiserror::Error;

use crate::players::resolver::ResolveError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    /// Player or team text could not be resolved.
    #[error("{message}")]
    Validation { message: String },

    /// More than one reference player matched.
    #[error(
        "'{query}' matches several players: {}. Use more of the name.",
        .candidates.join(", ")
    )]
    AmbiguousMatch {
        query: String,
        candidates: Vec<String>,
    },

    /// Input did not match any accepted shape.
    #[error("{message}")]
    Format { message: String },

    /// A query was issued before there was anything to report.
    #[error("{message}")]
    State { message: String },
}

impl DraftError {
    pub fn format(message: impl Into<String>) -> Self {
        DraftError::Format {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        DraftError::Validation {
            message: message.into(),
        }
    }
}

impl From<ResolveError> for DraftError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::Ambiguous { query, candidates } => {
                DraftError::AmbiguousMatch { query, candidates }
            }
            ResolveError::Suggestion { .. } | ResolveError::NotFound { .. } => {
                DraftError::Validation {
                    message: format!(
                        "{err} If they are missing from the player list, record them with \
                         .force <player> <POS> <TEAM>."
                    ),
                }
            }
        }
    }
}
