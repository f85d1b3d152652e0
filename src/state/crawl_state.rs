/// Lifecycle state definitions for a crawl run
///
/// This module defines the states the crawl driver moves through.
use std::fmt;

/// Represents the current state of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    // ===== Active States =====
    /// Frontier entries are being processed and new links admitted
    Running,

    /// Entries at the depth ceiling are being processed; nothing new can be admitted
    Draining,

    // ===== Terminal States =====
    /// The frontier was exhausted
    Finished,

    /// The crawl was cancelled externally
    Interrupted,
}

impl CrawlState {
    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Interrupted)
    }

    /// Returns true if the driver may still pop frontier entries
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Running | Self::Draining)
    }

    /// Checks whether moving from `self` to `next` is a legal transition
    ///
    /// Staying in the same active state is allowed; terminal states are final.
    pub fn can_transition_to(&self, next: CrawlState) -> bool {
        match (self, next) {
            (Self::Running, Self::Running | Self::Draining | Self::Finished | Self::Interrupted) => {
                true
            }
            (Self::Draining, Self::Draining | Self::Finished | Self::Interrupted) => true,
            _ => false,
        }
    }

    /// Converts the state to a stable string representation
    ///
    /// Used in reports and for the run table of the SQLite store.
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Draining => "draining",
            Self::Finished => "finished",
            Self::Interrupted => "interrupted",
        }
    }

    /// Parses a state from its string representation
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "draining" => Some(Self::Draining),
            "finished" => Some(Self::Finished),
            "interrupted" => Some(Self::Interrupted),
            _ => None,
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_terminal() {
        assert!(!CrawlState::Running.is_terminal());
        assert!(!CrawlState::Draining.is_terminal());
        assert!(CrawlState::Finished.is_terminal());
        assert!(CrawlState::Interrupted.is_terminal());
    }

    #[test]
    fn test_is_active() {
        assert!(CrawlState::Running.is_active());
        assert!(CrawlState::Draining.is_active());
        assert!(!CrawlState::Finished.is_active());
        assert!(!CrawlState::Interrupted.is_active());
    }

    #[test]
    fn test_forward_transitions() {
        assert!(CrawlState::Running.can_transition_to(CrawlState::Draining));
        assert!(CrawlState::Running.can_transition_to(CrawlState::Finished));
        assert!(CrawlState::Draining.can_transition_to(CrawlState::Finished));
    }

    #[test]
    fn test_interruption_from_active_states() {
        assert!(CrawlState::Running.can_transition_to(CrawlState::Interrupted));
        assert!(CrawlState::Draining.can_transition_to(CrawlState::Interrupted));
    }

    #[test]
    fn test_no_backward_transitions() {
        assert!(!CrawlState::Draining.can_transition_to(CrawlState::Running));
        assert!(!CrawlState::Finished.can_transition_to(CrawlState::Running));
        assert!(!CrawlState::Finished.can_transition_to(CrawlState::Interrupted));
        assert!(!CrawlState::Interrupted.can_transition_to(CrawlState::Finished));
    }

    #[test]
    fn test_db_string_values() {
        assert_eq!(CrawlState::Running.to_db_string(), "running");
        assert_eq!(CrawlState::Interrupted.to_string(), "interrupted");
        assert_eq!(
            CrawlState::from_db_string("draining"),
            Some(CrawlState::Draining)
        );
        assert_eq!(CrawlState::from_db_string("paused"), None);
    }
}
