//! Error types for parsing and navigating feeds.

/// Errors that can occur while parsing responses or walking feeds.
#[derive(thiserror::Error, Debug)]
pub enum FeedError {
    #[error("Invalid structure: {0}")]
    InvalidStructure(String),

    #[error("Tab \"{requested}\" not found (available: {})", .available.join(", "))]
    TabNotFound {
        requested: String,
        available: Vec<String>,
    },

    #[error("Filter \"{requested}\" not found (available: {})", .available_filters.join(", "))]
    FilterNotFound {
        requested: String,
        available_filters: Vec<String>,
    },

    #[error("Option \"{requested}\" not found (available: {})", .available_options.join(", "))]
    OptionNotFound {
        requested: String,
        available_options: Vec<String>,
    },

    #[error("Sidebar item \"{requested}\" not found (available: {})", .available_items.join(", "))]
    SidebarItemNotFound {
        requested: String,
        available_items: Vec<String>,
    },

    #[error("Sidebar not available")]
    SidebarUnavailable,

    /// End of feed. Not a failure of the transport or the parser.
    #[error("No continuation available")]
    NoContinuation,

    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("Missing endpoint: {0}")]
    MissingEndpoint(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FeedError {
    pub fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        FeedError::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Whether the error belongs to the recoverable not-found family.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            FeedError::TabNotFound { .. }
                | FeedError::FilterNotFound { .. }
                | FeedError::OptionNotFound { .. }
                | FeedError::SidebarItemNotFound { .. }
                | FeedError::SidebarUnavailable
        )
    }

    /// The valid keys a caller can pick from after a not-found error.
    pub fn alternatives(&self) -> Option<&[String]> {
        match self {
            FeedError::TabNotFound { available, .. } => Some(available.as_slice()),
            FeedError::FilterNotFound {
                available_filters, ..
            } => Some(available_filters.as_slice()),
            FeedError::OptionNotFound {
                available_options, ..
            } => Some(available_options.as_slice()),
            FeedError::SidebarItemNotFound {
                available_items, ..
            } => Some(available_items.as_slice()),
            _ => None,
        }
    }
}

/// Convenience result type.
pub type FeedResult<T> = Result<T, FeedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_carries_alternatives() {
        let err = FeedError::FilterNotFound {
            requested: "Live".to_string(),
            available_filters: vec!["All".to_string(), "Videos".to_string()],
        };
        assert!(err.is_not_found());
        assert_eq!(err.alternatives().unwrap(), ["All", "Videos"]);
        assert_eq!(
            err.to_string(),
            "Filter \"Live\" not found (available: All, Videos)"
        );
    }

    #[test]
    fn test_no_continuation_is_not_a_lookup_error() {
        let err = FeedError::NoContinuation;
        assert!(!err.is_not_found());
        assert!(err.alternatives().is_none());
    }
}
