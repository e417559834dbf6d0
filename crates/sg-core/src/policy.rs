//! Skip/run policy selection.

use serde::{Deserialize, Serialize};

/// Which decision rules a gate applies to migrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    /// Every migration declares a target; a migration runs when nothing is
    /// recorded yet or the recorded version is older than the target.
    /// Versions are compared as written and reversal records the declared
    /// previous version verbatim.
    #[default]
    Monotonic,

    /// Install migrations (no target) run only on a fresh package; update
    /// migrations run only once a baseline is recorded and it is older than
    /// the target. Versions are normalized before comparison and update
    /// migrations without a previous version cannot be reversed.
    Normalized,
}

impl std::fmt::Display for Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Policy::Monotonic => write!(f, "monotonic"),
            Policy::Normalized => write!(f, "normalized"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_default_is_monotonic() {
        assert_eq!(Policy::default(), Policy::Monotonic);
    }

    #[test]
    fn test_policy_yaml() {
        let p: Policy = serde_yaml::from_str("normalized").unwrap();
        assert_eq!(p, Policy::Normalized);
        assert_eq!(p.to_string(), "normalized");
        assert!(serde_yaml::from_str::<Policy>("semver").is_err());
    }
}
