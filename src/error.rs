use thiserror::Error;

/// Errors raised while driving the host page
#[derive(Debug, Error)]
pub enum BulkError {
    /// Chrome could not be started
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    /// Could not attach to an already running Chrome
    #[error("Failed to connect to browser: {0}")]
    ConnectionFailed(String),

    #[error("Tab operation failed: {0}")]
    TabOperationFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// A script sent to the tab threw or could not be evaluated
    #[error("JavaScript evaluation failed: {0}")]
    EvaluationFailed(String),

    /// The tab answered with something we could not decode
    #[error("Failed to parse page response: {0}")]
    DomParseFailed(String),

    /// A required element was not present or not visible
    #[error("{0} not found or not visible")]
    LocatorMiss(String),

    /// A control was found but reports itself as disabled
    #[error("{0} is disabled")]
    DisabledTarget(String),

    /// A stored element reference no longer points at a live node
    #[error("{0} is detached from the document")]
    DetachedHandle(String),

    /// The run configuration was rejected before any item was touched
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// A session or run is already in progress
    #[error("A bulk action session is already active")]
    AlreadyActive,

    #[error("Unexpected failure: {0}")]
    Unexpected(String),
}

impl BulkError {
    /// Whether this error only concerns the item being processed.
    ///
    /// Item-scoped errors mark that item as failed and the run continues with
    /// the next one. Everything else is a session level problem.
    pub fn is_item_scoped(&self) -> bool {
        matches!(
            self,
            BulkError::LocatorMiss(_)
                | BulkError::DisabledTarget(_)
                | BulkError::DetachedHandle(_)
                | BulkError::EvaluationFailed(_)
                | BulkError::DomParseFailed(_)
                | BulkError::Unexpected(_)
        )
    }
}

/// Result type alias for bulk action operations
pub type Result<T> = std::result::Result<T, BulkError>;
