use super::*;

fn run_up() -> ExecutionDecision {
    ExecutionDecision::forward(false, false, None)
}

fn skip_up() -> ExecutionDecision {
    ExecutionDecision::forward(true, false, Some("2.0".to_string()))
}

#[test]
fn test_forward_run_path() {
    let state = MigrationState::Pending.prepare(&run_up()).unwrap();
    assert_eq!(
        state,
        MigrationState::Decided {
            direction: Direction::Up,
            skip: false
        }
    );
    assert_eq!(state.finish(true).unwrap(), MigrationState::Applied { skipped: false });
}

#[test]
fn test_forward_skip_path() {
    let state = MigrationState::Pending.prepare(&skip_up()).unwrap();
    assert_eq!(state.finish(true).unwrap(), MigrationState::Applied { skipped: true });
}

#[test]
fn test_reverse_path() {
    let applied = MigrationState::Applied { skipped: false };
    let state = applied.prepare(&ExecutionDecision::reverse()).unwrap();
    assert_eq!(state.finish(true).unwrap(), MigrationState::Reversed);
}

#[test]
fn test_reprepare_same_direction() {
    let state = MigrationState::Pending.prepare(&run_up()).unwrap();
    let again = state.prepare(&skip_up()).unwrap();
    assert_eq!(
        again,
        MigrationState::Decided {
            direction: Direction::Up,
            skip: true
        }
    );
}

#[test]
fn test_reprepare_other_direction_rejected() {
    let state = MigrationState::Pending.prepare(&run_up()).unwrap();
    let err = state.prepare(&ExecutionDecision::reverse()).unwrap_err();
    assert!(matches!(err, MigrateError::InvalidTransition { .. }));
}

#[test]
fn test_failed_payload_returns_to_prior_state() {
    let up = MigrationState::Pending.prepare(&run_up()).unwrap();
    assert_eq!(up.finish(false).unwrap(), MigrationState::Pending);

    let down = MigrationState::Applied { skipped: false }
        .prepare(&ExecutionDecision::reverse())
        .unwrap();
    assert_eq!(
        down.finish(false).unwrap(),
        MigrationState::Applied { skipped: false }
    );
}

#[test]
fn test_finish_without_prepare_rejected() {
    let err = MigrationState::Pending.finish(true).unwrap_err();
    assert_eq!(
        err.to_string(),
        "[G006] Invalid lifecycle transition: cannot finish while pending"
    );
}

#[test]
fn test_applied_cannot_prepare_up_again() {
    let applied = MigrationState::Applied { skipped: false };
    assert!(applied.prepare(&run_up()).is_err());
}

#[test]
fn test_reversed_can_be_reapplied() {
    let state = MigrationState::Reversed.prepare(&run_up()).unwrap();
    assert_eq!(state.finish(true).unwrap(), MigrationState::Applied { skipped: false });
}

#[test]
fn test_blocked_is_terminal() {
    let blocked = MigrationState::Applied { skipped: false }.block().unwrap();
    assert!(blocked.is_terminal());
    assert!(blocked.prepare(&run_up()).is_err());
    assert!(blocked.prepare(&ExecutionDecision::reverse()).is_err());
    assert!(blocked.finish(true).is_err());
    assert!(blocked.block().is_err());
}

#[test]
fn test_state_display() {
    assert_eq!(MigrationState::Pending.to_string(), "pending");
    assert_eq!(run_up().state().to_string(), "decided (up, run)");
    assert_eq!(
        MigrationState::Applied { skipped: true }.to_string(),
        "applied (skipped)"
    );
}
