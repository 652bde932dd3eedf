//! Error types for page assertions and browser lookups
//!
//! Two layers are kept apart:
//! - [`DriverError`]: a single transport command was rejected or failed. Element lookups
//!   recover from these by treating the lookup as "no matches".
//! - [`BrowserError`]: user-facing failures that end the current chain (bad page status,
//!   missing interaction targets, failed assertions, misuse of a collection).

use crate::browser::By;
use std::fmt;
use thiserror::Error;

/// Failure reported by the browser transport for one command
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DriverError {
    /// The driver refused a lookup criterion/value pair (malformed CSS or XPath, invalid class name, ...)
    #[error("The driver rejected {by} [{value}]: {reason}")]
    InvalidSelector { by: By, value: String, reason: String },

    /// A remote command failed or timed out
    #[error("Driver command failed: {0}")]
    CommandFailed(String),
}

impl DriverError {
    pub fn invalid_selector(by: By, value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSelector {
            by,
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn command(reason: impl fmt::Display) -> Self {
        Self::CommandFailed(reason.to_string())
    }
}

/// Expected and observed element counts of a count-bearing constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountMismatch {
    pub expected: usize,
    pub actual: usize,
}

/// A page constraint did not hold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionFailure {
    /// Description of what was asserted, e.g. "the page contains the text [Login]"
    pub description: String,

    /// Additional context appended after the description
    pub detail: Option<String>,

    /// Expected vs actual count, for constraints that count elements
    pub counts: Option<CountMismatch>,
}

impl AssertionFailure {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            detail: None,
            counts: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_counts(mut self, counts: Option<CountMismatch>) -> Self {
        self.counts = counts;
        self
    }
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed asserting that {}", self.description)?;
        if let Some(detail) = &self.detail {
            write!(f, ": {}", detail)?;
        }
        Ok(())
    }
}

impl std::error::Error for AssertionFailure {}

/// Errors surfaced to the test author
#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    #[error("Failed to connect to browser: {0}")]
    ConnectionFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// The status check of a visited page failed at the transport level
    #[error("A request to [{uri}] could not be checked: {reason}")]
    PageLoadFailed { uri: String, reason: String },

    /// The visited page answered with a status outside the accepted set
    #[error("A request to [{uri}] failed. Received status code [{status}].")]
    Http { uri: String, status: String },

    #[error(transparent)]
    Driver(#[from] DriverError),

    /// A required lookup found nothing, or an interaction was redundant
    #[error("{0}")]
    InvalidArgument(String),

    /// Malformed use of a collection (empty-collection accessors, foreign documents)
    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Assertion(#[from] AssertionFailure),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl BrowserError {
    /// Whether this error is an assertion that evaluated the wrong way
    pub fn is_assertion(&self) -> bool {
        matches!(self, Self::Assertion(_))
    }
}

pub type Result<T> = std::result::Result<T, BrowserError>;

pub type DriverResult<T> = std::result::Result<T, DriverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assertion_failure_display() {
        let failure = AssertionFailure::new("the page contains the text [Login]");
        assert_eq!(failure.to_string(), "Failed asserting that the page contains the text [Login]");

        let failure = failure.with_detail("There is no input with the name or ID [email]");
        assert_eq!(
            failure.to_string(),
            "Failed asserting that the page contains the text [Login]: There is no input with the name or ID [email]"
        );
    }

    #[test]
    fn test_http_error_message() {
        let err = BrowserError::Http {
            uri: "/missing".to_string(),
            status: "404".to_string(),
        };
        assert_eq!(err.to_string(), "A request to [/missing] failed. Received status code [404].");
        assert!(!err.is_assertion());
    }

    #[test]
    fn test_driver_error_conversion() {
        let err: BrowserError = DriverError::invalid_selector(By::Css, "#a[", "unterminated attribute").into();
        assert!(matches!(err, BrowserError::Driver(DriverError::InvalidSelector { by: By::Css, .. })));
        assert_eq!(err.to_string(), "The driver rejected css selector [#a[]: unterminated attribute");
    }
}
