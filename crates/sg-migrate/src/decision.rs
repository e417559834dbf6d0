//! The per-run skip/execute decision.

use crate::state::MigrationState;
use std::fmt;

/// Which way a migration is being run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Forward: apply the change and record the target version.
    Up,
    /// Reversal: undo the change and record the previous version.
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// Outcome of [`MigrationGate::prepare`](crate::MigrationGate::prepare).
///
/// Computed once per run and passed back into `operations` and `finish`;
/// only the gate constructs one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionDecision {
    direction: Direction,
    skip: bool,
    ambiguous: bool,
    current_version: Option<String>,
    installed_version: Option<String>,
}

impl ExecutionDecision {
    pub(crate) fn forward(skip: bool, ambiguous: bool, current_version: Option<String>) -> Self {
        Self {
            direction: Direction::Up,
            skip,
            ambiguous,
            current_version,
            installed_version: None,
        }
    }

    /// Attach the normalized installed version an install migration will
    /// record on success.
    pub(crate) fn with_installed_version(mut self, version: String) -> Self {
        self.installed_version = Some(version);
        self
    }

    pub(crate) fn reverse() -> Self {
        Self {
            direction: Direction::Down,
            skip: false,
            ambiguous: false,
            current_version: None,
            installed_version: None,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// True when the payload must not run and nothing is recorded.
    pub fn skip(&self) -> bool {
        self.skip
    }

    /// True for an update migration skipped only because the package has no
    /// recorded baseline yet (normalized policy).
    pub fn ambiguous(&self) -> bool {
        self.ambiguous
    }

    /// Stored version the decision was made against (forward runs only).
    pub fn current_version(&self) -> Option<&str> {
        self.current_version.as_deref()
    }

    /// Normalized installed version resolved for an install migration that
    /// is about to run.
    pub fn installed_version(&self) -> Option<&str> {
        self.installed_version.as_deref()
    }

    /// The lifecycle state this decision puts a migration in.
    pub fn state(&self) -> MigrationState {
        MigrationState::Decided {
            direction: self.direction,
            skip: self.skip,
        }
    }
}
