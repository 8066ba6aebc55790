//! Error types for the dashboard client.
//!
//! Every failure is handled at the boundary where it occurs; these variants
//! only travel as far as the dashboard orchestrator.

use thiserror::Error;

/// Errors raised while loading or rendering dashboard data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DashboardError {
    /// Non-success HTTP status or transport failure.
    #[error("Network error: {0}")]
    Network(String),

    /// Response body was not valid JSON or lacks an expected field.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Missing or malformed request parameters.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The cloud renderer failed.
    #[error("Render error: {0}")]
    Render(String),
}

impl DashboardError {
    /// Whether this failure should be surfaced to the user as a banner.
    pub fn is_user_visible(&self) -> bool {
        matches!(self, DashboardError::Network(_) | DashboardError::Parse(_))
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_visible_variants() {
        assert!(DashboardError::Network("503".into()).is_user_visible());
        assert!(DashboardError::Parse("eof".into()).is_user_visible());
        assert!(!DashboardError::Validation("empty year".into()).is_user_visible());
        assert!(!DashboardError::Render("grid".into()).is_user_visible());
    }

    #[test]
    fn test_display() {
        let err = DashboardError::Network("HTTP 500".to_string());
        assert_eq!(err.to_string(), "Network error: HTTP 500");
    }
}
