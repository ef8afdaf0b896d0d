//! Error types for accelerator resolution.

/// Result type alias for accelerator operations.
pub type Result<T> = std::result::Result<T, AccelError>;

/// Errors that can occur while mutating the element tree or dispatching
/// accelerators.
///
/// Resolution itself never surfaces errors to the key-event pipeline: a
/// failing invoked handler is caught by the dispatcher and degrades to
/// "not handled" (see [`crate::resolve::AcceleratorDispatcher`]).
#[derive(Debug, thiserror::Error)]
pub enum AccelError {
    /// The element ID is invalid or the element has been destroyed.
    #[error("invalid or destroyed element id")]
    InvalidElementId,

    /// Attempted to set an element as its own parent or ancestor.
    #[error("cannot set an element as its own parent or ancestor")]
    CircularParentage,

    /// The operation requires a widget, but the element is a plain node.
    #[error("element is not a widget")]
    NotAWidget,

    /// An accelerator invoked handler reported a failure.
    #[error("accelerator invoked handler failed: {0}")]
    Notification(String),
}

impl AccelError {
    /// Create a notification failure from a handler.
    pub fn notification(message: impl Into<String>) -> Self {
        Self::Notification(message.into())
    }
}
