//! Error types shared by the aggregation and progress components.

use std::error::Error as StdError;

use thiserror::Error;

use crate::record::Domain;

/// A collaborator (storage, repository, counter source) failed to answer.
///
/// Collaborators live outside this crate, so the underlying error is boxed.
#[derive(Debug, Error)]
#[error("{context}: {source}")]
pub struct SourceError {
    context: String,
    #[source]
    source: Box<dyn StdError + Send + Sync>,
}

impl SourceError {
    /// Wraps a collaborator error with a short description of the failed call.
    pub fn new(
        context: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self {
            context: context.into(),
            source: source.into(),
        }
    }

    /// Description of the call that failed.
    pub fn context(&self) -> &str {
        &self.context
    }
}

/// A record whose date fields cannot be resolved to a calendar day.
///
/// Malformed records are dropped from aggregation and logged; they are never
/// fatal and the stored record is never modified.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{domain} record {record_id}: {reason}")]
pub struct MalformedRecord {
    pub domain: Domain,
    pub record_id: String,
    pub reason: MalformedReason,
}

/// Why a record could not be placed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    #[error("missing {field}")]
    Missing { field: &'static str },
    #[error("unparseable {field}: {value:?}")]
    Unparseable { field: &'static str, value: String },
    #[error("unsupported journal type {value:?}")]
    JournalType { value: String },
}

/// Errors from applying achievement progress.
#[derive(Debug, Error)]
pub enum AchievementError {
    /// Reading or writing stored progress failed.
    #[error("progress store failed for {achievement_id}: {source}")]
    Persistence {
        achievement_id: String,
        #[source]
        source: SourceError,
    },

    /// Listing stored progress failed.
    #[error("progress store failed: {0}")]
    Store(#[source] SourceError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_error_keeps_context_and_cause() {
        let err = SourceError::new("fetch tasks", "disk on fire");
        assert_eq!(err.context(), "fetch tasks");
        assert_eq!(err.to_string(), "fetch tasks: disk on fire");
        assert!(err.source().is_some());
    }

    #[test]
    fn malformed_record_message_names_domain_and_field() {
        let err = MalformedRecord {
            domain: Domain::Tasks,
            record_id: "t-1".into(),
            reason: MalformedReason::Unparseable {
                field: "due_date",
                value: "soon".into(),
            },
        };
        assert_eq!(
            err.to_string(),
            "tasks record t-1: unparseable due_date: \"soon\""
        );
    }
}
