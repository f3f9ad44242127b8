//! Error types for Concierge.
//!
//! Load-time faults surface as `ConciergeError`. Collaborator faults are
//! `CollaboratorError` and never reach the end user as-is: the engine folds
//! them into a user-facing `Response`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConciergeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid knowledge record #{index}: {reason}")]
    InvalidKnowledge { index: usize, reason: String },

    #[error("Config error: {0}")]
    Config(String),
}

impl ConciergeError {
    pub fn code(&self) -> i32 {
        match self {
            ConciergeError::Io(_) => -32006,
            ConciergeError::Json(_) => -32700,
            ConciergeError::Toml(_) => -32701,
            ConciergeError::InvalidKnowledge { .. } => -32010,
            ConciergeError::Config(_) => -32011,
        }
    }
}

/// Failure reported by an external collaborator (auth, catalog, orders).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, ConciergeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_error_codes_are_distinct() {
        let errors = vec![
            ConciergeError::Io(std::io::Error::new(std::io::ErrorKind::Other, "x")),
            ConciergeError::Json(serde_json::from_str::<u32>("nope").unwrap_err()),
            ConciergeError::Toml(toml::from_str::<toml::Value>("[broken").unwrap_err()),
            ConciergeError::InvalidKnowledge {
                index: 0,
                reason: "empty".to_string(),
            },
            ConciergeError::Config("bad".to_string()),
        ];
        let codes: HashSet<i32> = errors.iter().map(|e| e.code()).collect();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_invalid_knowledge_message() {
        let err = ConciergeError::InvalidKnowledge {
            index: 4,
            reason: "intent name is empty".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid knowledge record #4: intent name is empty"
        );
    }
}
