//! Skip/run rules and the versions recorded by each policy.

use sg_core::version::{compare_normalized, compare_versions, normalize_version};
use sg_core::{MigrationDescriptor, Policy};
use std::cmp::Ordering;

/// Forward-run verdict before it is wrapped into an `ExecutionDecision`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Verdict {
    pub skip: bool,
    pub ambiguous: bool,
}

impl Verdict {
    const RUN: Verdict = Verdict {
        skip: false,
        ambiguous: false,
    };
    const SKIP: Verdict = Verdict {
        skip: true,
        ambiguous: false,
    };
}

/// Decide a forward run against the stored version.
pub(crate) fn forward_verdict(
    policy: Policy,
    descriptor: &MigrationDescriptor,
    current: Option<&str>,
) -> Verdict {
    match policy {
        Policy::Monotonic => match (current, descriptor.target_version()) {
            (None, _) => Verdict::RUN,
            (Some(current), Some(target)) if compare_versions(current, target) == Ordering::Less => {
                Verdict::RUN
            }
            _ => Verdict::SKIP,
        },
        Policy::Normalized => match (current, descriptor.target_version()) {
            // Install migrations only ever run on a fresh package.
            (None, None) => Verdict::RUN,
            (Some(_), None) => Verdict::SKIP,
            // Update migrations need a recorded baseline.
            (None, Some(_)) => Verdict {
                skip: true,
                ambiguous: true,
            },
            (Some(current), Some(target)) => {
                if compare_normalized(current, target) == Ordering::Less {
                    Verdict::RUN
                } else {
                    Verdict::SKIP
                }
            }
        },
    }
}

/// Normalize a stored version as read, per policy.
pub(crate) fn read_version(policy: Policy, stored: Option<String>) -> Option<String> {
    match policy {
        Policy::Monotonic => stored,
        Policy::Normalized => stored.map(|v| normalize_version(&v)),
    }
}

/// True when reversing `descriptor` would leave no version to record.
pub(crate) fn is_irreversible(policy: Policy, descriptor: &MigrationDescriptor) -> bool {
    policy == Policy::Normalized && !descriptor.is_install() && descriptor.previous().is_none()
}
