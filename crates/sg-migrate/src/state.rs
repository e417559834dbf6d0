//! Lifecycle state machine of a single gated migration.
//!
//! ```text
//! Pending --prepare(up)--> Decided --finish--> Applied
//! Applied --prepare(down)--> Decided --finish--> Reversed
//! Applied --prepare(down), irreversible--> Blocked
//! ```
//!
//! A failed payload returns a migration to where it was before `prepare`.
//! `Blocked` is terminal.

use crate::decision::{Direction, ExecutionDecision};
use crate::error::{MigrateError, MigrateResult};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationState {
    /// Not yet prepared in this process.
    Pending,
    /// Prepared; the decision is fixed until `finish`.
    Decided { direction: Direction, skip: bool },
    /// Forward run finished. `skipped` when the payload was a no-op.
    Applied { skipped: bool },
    /// Reversal finished and the previous version recorded.
    Reversed,
    /// Reversal refused; needs manual intervention.
    Blocked,
}

impl MigrationState {
    /// Enter `Decided` from a freshly computed decision.
    ///
    /// Re-preparing in the same direction without finishing is allowed and
    /// replaces the earlier decision.
    pub fn prepare(self, decision: &ExecutionDecision) -> MigrateResult<Self> {
        let allowed = match (self, decision.direction()) {
            (MigrationState::Pending, _) => true,
            (MigrationState::Reversed, Direction::Up) => true,
            (MigrationState::Applied { .. }, Direction::Down) => true,
            (MigrationState::Decided { direction, .. }, requested) => direction == requested,
            _ => false,
        };
        if !allowed {
            return Err(self.invalid(format!("prepare {}", decision.direction())));
        }
        Ok(decision.state())
    }

    /// Enter `Blocked` after an irreversible reversal was refused.
    pub fn block(self) -> MigrateResult<Self> {
        match self {
            MigrationState::Pending | MigrationState::Applied { .. } => Ok(MigrationState::Blocked),
            MigrationState::Decided {
                direction: Direction::Down,
                ..
            } => Ok(MigrationState::Blocked),
            other => Err(other.invalid("block".to_string())),
        }
    }

    /// Leave `Decided` once the runner reports the payload outcome.
    pub fn finish(self, success: bool) -> MigrateResult<Self> {
        match (self, success) {
            (MigrationState::Decided { direction: Direction::Up, skip }, true) => {
                Ok(MigrationState::Applied { skipped: skip })
            }
            (MigrationState::Decided { direction: Direction::Down, .. }, true) => {
                Ok(MigrationState::Reversed)
            }
            (MigrationState::Decided { direction: Direction::Up, .. }, false) => {
                Ok(MigrationState::Pending)
            }
            (MigrationState::Decided { direction: Direction::Down, .. }, false) => {
                Ok(MigrationState::Applied { skipped: false })
            }
            (other, _) => Err(other.invalid("finish".to_string())),
        }
    }

    /// True once no further transition is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, MigrationState::Blocked)
    }

    fn invalid(self, event: String) -> MigrateError {
        MigrateError::InvalidTransition {
            state: self.to_string(),
            event,
        }
    }
}

impl fmt::Display for MigrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationState::Pending => write!(f, "pending"),
            MigrationState::Decided { direction, skip } => {
                let verdict = if *skip { "skip" } else { "run" };
                write!(f, "decided ({direction}, {verdict})")
            }
            MigrationState::Applied { skipped: true } => write!(f, "applied (skipped)"),
            MigrationState::Applied { skipped: false } => write!(f, "applied"),
            MigrationState::Reversed => write!(f, "reversed"),
            MigrationState::Blocked => write!(f, "blocked"),
        }
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
