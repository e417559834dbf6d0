//! Version normalization and dotted-numeric ordering.
//!
//! Package versions are opaque labels supplied by package managers
//! (`v1.2.0`, `1.x-dev`, `2.0.0-alpha`). Stored schema versions are compared
//! segment by segment; a shorter version is padded with zero segments so
//! that `1.2` and `1.2.0` are equal.

use crate::error::{CoreError, CoreResult};
use std::cmp::Ordering;

/// Numeric value substituted for a wildcard segment (`1.x` -> `1.99999`).
pub const WILDCARD_SEGMENT: u64 = 99_999;

/// Normalize a package version for storage and comparison.
///
/// - everything from the first `-` on is dropped (`1.0.0-alpha` -> `1.0.0`)
/// - a leading `v` is stripped (`v2.1` -> `2.1`)
/// - whole `x`, `X` or `*` segments become [`WILDCARD_SEGMENT`]
pub fn normalize_version(version: &str) -> String {
    let base = version.split('-').next().unwrap_or_default().trim();
    let base = base.trim_start_matches(['v', 'V']);

    base.split('.')
        .map(|segment| match segment {
            "x" | "X" | "*" => WILDCARD_SEGMENT.to_string(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(".")
}

/// Check that a version is usable as a stored label.
pub fn validate_version(version: &str) -> CoreResult<()> {
    if version.trim().is_empty() {
        return Err(CoreError::InvalidVersion {
            version: version.to_string(),
            reason: "version must not be empty".to_string(),
        });
    }
    if version.split('.').any(str::is_empty) {
        return Err(CoreError::InvalidVersion {
            version: version.to_string(),
            reason: "version contains an empty segment".to_string(),
        });
    }
    Ok(())
}

/// Compare two versions segment by segment.
///
/// Each segment is split into its leading digits and a trailing suffix.
/// Digits compare numerically; on a tie a segment without suffix sorts after
/// one with a suffix (`0rc1 < 0`), and two suffixes compare lexicographically.
/// Missing segments count as `0`.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let left: Vec<Segment<'_>> = a.split('.').map(Segment::parse).collect();
    let right: Vec<Segment<'_>> = b.split('.').map(Segment::parse).collect();
    let len = left.len().max(right.len());

    for i in 0..len {
        let l = left.get(i).copied().unwrap_or(Segment::ZERO);
        let r = right.get(i).copied().unwrap_or(Segment::ZERO);
        match l.cmp(&r) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

/// Compare two versions after normalizing both.
pub fn compare_normalized(a: &str, b: &str) -> Ordering {
    compare_versions(&normalize_version(a), &normalize_version(b))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Segment<'a> {
    number: u64,
    suffix: &'a str,
}

impl<'a> Segment<'a> {
    const ZERO: Segment<'static> = Segment {
        number: 0,
        suffix: "",
    };

    fn parse(raw: &'a str) -> Self {
        let raw = raw.trim();
        let split = raw
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(raw.len());
        let (digits, suffix) = raw.split_at(split);
        let number = if digits.is_empty() {
            0
        } else {
            digits.parse().unwrap_or(u64::MAX)
        };
        Segment { number, suffix }
    }
}

impl Ord for Segment<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.number
            .cmp(&other.number)
            .then_with(|| match (self.suffix.is_empty(), other.suffix.is_empty()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => self.suffix.cmp(other.suffix),
            })
    }
}

impl PartialOrd for Segment<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
#[path = "version_test.rs"]
mod tests;
