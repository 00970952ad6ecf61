//! Error handling for the dialer core
//!
//! A single error type covers every component. Each component handles the
//! errors it detects at its own boundary:
//!
//! - `Fetch` is surfaced by the contact list as a visible error state.
//! - `Timeout` never leaves a call session; it becomes the `Failed` phase.
//! - `Audio` is logged with `warn!` and swallowed, it never blocks a transition.
//!
//! ## Error Propagation
//!
//! ```rust
//! use cosmic_dialer_core::Result;
//!
//! fn parse_page(data: &str) -> Result<serde_json::Value> {
//!     // JSON errors are converted automatically
//!     let value: serde_json::Value = serde_json::from_str(data)?;
//!     Ok(value)
//! }
//! ```

use thiserror::Error;

/// Result type for dialer operations
pub type Result<T> = std::result::Result<T, DialerError>;

/// Errors that can occur in the dialer core
///
/// # Examples
///
/// ```rust
/// use cosmic_dialer_core::DialerError;
///
/// let error = DialerError::Fetch("service unavailable".to_string());
/// assert_eq!(error.to_string(), "Failed to fetch contacts: service unavailable");
///
/// let error = DialerError::ContactNotFound("+1 555 0100".to_string());
/// assert_eq!(error.to_string(), "Contact not found: +1 555 0100");
/// ```
#[derive(Error, Debug)]
pub enum DialerError {
    /// I/O error (file system, contact source files, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The contact source could not produce a page of contacts
    #[error("Failed to fetch contacts: {0}")]
    Fetch(String),

    /// A call could not be connected in time
    ///
    /// Internal to call sessions, which represent it as the `Failed` phase.
    #[error("Connection timeout: {0}")]
    Timeout(String),

    /// Audio playback or setup failed
    #[error("Audio error: {0}")]
    Audio(String),

    /// Contact not present in the current list
    #[error("Contact not found: {0}")]
    ContactNotFound(String),

    /// Operation attempted in a state that does not allow it
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Configuration is invalid or missing
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Operation cancelled
    ///
    /// A fetch whose result arrived after the screen moved on, or after a newer
    /// fetch was started.
    #[error("Operation cancelled: {0}")]
    Cancelled(String),
}

impl DialerError {
    /// Check if this error is transient and the operation could be retried
    ///
    /// Nothing in the core retries automatically; callers may wrap fetches
    /// with their own retry policy.
    ///
    /// ```rust
    /// use cosmic_dialer_core::DialerError;
    ///
    /// assert!(DialerError::Fetch("offline".to_string()).is_recoverable());
    /// assert!(!DialerError::InvalidState("ended".to_string()).is_recoverable());
    /// ```
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DialerError::Fetch(_) | DialerError::Timeout(_) | DialerError::Io(_)
        )
    }

    /// Get a user-friendly message suitable for display on screen
    pub fn user_message(&self) -> String {
        match self {
            DialerError::Fetch(_) => "Error loading contacts".to_string(),
            DialerError::Timeout(_) => "No money left :(".to_string(),
            DialerError::Audio(msg) => format!("Audio unavailable: {}.", msg),
            DialerError::ContactNotFound(phone) => {
                format!("Contact '{}' is no longer in the list.", phone)
            }
            DialerError::InvalidState(msg) => format!("Invalid state: {}.", msg),
            DialerError::Configuration(msg) => {
                format!("Configuration error: {}. Check your settings.", msg)
            }
            DialerError::Cancelled(msg) => format!("Operation cancelled: {}.", msg),
            DialerError::Io(e) => format!("I/O error: {}.", e),
            DialerError::Json(e) => format!("Data format error: {}.", e),
        }
    }

    /// Create an invalid state error
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        DialerError::InvalidState(msg.into())
    }

    /// Create a fetch error
    pub fn fetch(msg: impl Into<String>) -> Self {
        DialerError::Fetch(msg.into())
    }

    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        DialerError::Configuration(msg.into())
    }
}
