/// Fetch state definitions for tracking a single request
///
/// Every request walks `Pending -> Fetching -> {Parsed, Failed}` exactly once.
use crate::HarvestError;
use std::fmt;

/// Represents the current state of one fetch request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchState {
    /// Request created from the identifier list, not yet started
    Pending,

    /// Request holds a pool permit and is being retrieved
    Fetching,

    /// Document was retrieved and a record extracted
    Parsed,

    /// Retrieval failed; a failure outcome was produced
    Failed,
}

impl FetchState {
    /// Returns true if no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Parsed | Self::Failed)
    }

    /// Returns true if the transition `self -> next` is allowed
    pub fn can_transition_to(&self, next: FetchState) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Fetching)
                | (Self::Fetching, Self::Parsed)
                | (Self::Fetching, Self::Failed)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fetching => "fetching",
            Self::Parsed => "parsed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for FetchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tracks the state of one request through its lifecycle
#[derive(Debug)]
pub struct FetchTracker {
    state: FetchState,
}

impl FetchTracker {
    pub fn new() -> Self {
        Self {
            state: FetchState::Pending,
        }
    }

    pub fn state(&self) -> FetchState {
        self.state
    }

    /// Moves to `next`, rejecting anything outside the lifecycle
    pub fn advance(&mut self, next: FetchState) -> Result<(), HarvestError> {
        if !self.state.can_transition_to(next) {
            return Err(HarvestError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        Ok(())
    }
}

impl Default for FetchTracker {
    fn default() -> Self {
        Self::new()
    }
}
