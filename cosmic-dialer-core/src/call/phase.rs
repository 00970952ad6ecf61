//! Call phases and on-screen status text

/// Lifecycle phase of a call session
///
/// ```text
/// Connecting → Ringing → Active → Ending → Ended
///      │                              ↑
///      ├──────────── end-call ────────┘
///      └──→ Failed (connect timeout)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallPhase {
    Connecting,
    Ringing,
    Active,
    Ending,
    Ended,
    Failed,
}

impl CallPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connecting => "connecting",
            Self::Ringing => "ringing",
            Self::Active => "active",
            Self::Ending => "ending",
            Self::Ended => "ended",
            Self::Failed => "failed",
        }
    }

    /// Whether the user may still hang up
    pub fn can_end(&self) -> bool {
        matches!(self, Self::Connecting | Self::Ringing | Self::Active)
    }

    /// Whether the session has nothing left to do but leave the screen
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Ended | Self::Failed)
    }

    /// Status line shown under the callee's number
    pub fn status_text(&self, elapsed_seconds: u64) -> String {
        match self {
            Self::Connecting => "Connecting...".to_string(),
            Self::Ringing => "Calling...".to_string(),
            Self::Active => format_duration(elapsed_seconds),
            Self::Ending | Self::Ended => "Call Ended".to_string(),
            Self::Failed => "No money left :(".to_string(),
        }
    }
}

/// Format seconds as `mm:ss`
///
/// Minutes are not wrapped into hours.
///
/// ```rust
/// use cosmic_dialer_core::call::format_duration;
///
/// assert_eq!(format_duration(0), "00:00");
/// assert_eq!(format_duration(75), "01:15");
/// assert_eq!(format_duration(3600), "60:00");
/// ```
pub fn format_duration(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_end() {
        assert!(CallPhase::Connecting.can_end());
        assert!(CallPhase::Ringing.can_end());
        assert!(CallPhase::Active.can_end());
        assert!(!CallPhase::Ending.can_end());
        assert!(!CallPhase::Ended.can_end());
        assert!(!CallPhase::Failed.can_end());
    }

    #[test]
    fn test_is_terminal() {
        assert!(CallPhase::Ended.is_terminal());
        assert!(CallPhase::Failed.is_terminal());
        assert!(!CallPhase::Ending.is_terminal());
        assert!(!CallPhase::Active.is_terminal());
    }

    #[test]
    fn test_status_text() {
        assert_eq!(CallPhase::Connecting.status_text(0), "Connecting...");
        assert_eq!(CallPhase::Ringing.status_text(0), "Calling...");
        assert_eq!(CallPhase::Active.status_text(9), "00:09");
        assert_eq!(CallPhase::Ending.status_text(42), "Call Ended");
        assert_eq!(CallPhase::Failed.status_text(0), "No money left :(");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(59), "00:59");
        assert_eq!(format_duration(61), "01:01");
        assert_eq!(format_duration(600), "10:00");
    }
}
