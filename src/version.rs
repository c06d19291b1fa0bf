//! Server version gating
//!
//! Versions are compared the way build tools order artifact versions: dotted
//! or dashed segments, numbers compared as numbers, trailing zeros ignored,
//! and pre-release qualifiers ordered before the release they qualify.

use crate::error::{BridgeError, BridgeResult};
use std::cmp::Ordering;
use std::fmt;
use tracing::debug;

/// Oldest analysis server the bridge talks to
pub const DEFAULT_MIN_SERVER_VERSION: &str = "5.6";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Item {
    Number(u64),
    Qualifier(String),
}

// Position of a qualifier relative to the release; unknown qualifiers sort last.
const QUALIFIER_RANKS: &[(&str, u8)] = &[
    ("alpha", 0),
    ("beta", 1),
    ("milestone", 2),
    ("rc", 3),
    ("cr", 3),
    ("snapshot", 4),
    ("", 5),
    ("ga", 5),
    ("final", 5),
    ("release", 5),
    ("sp", 6),
];
const RELEASE_RANK: u8 = 5;
const UNKNOWN_RANK: u8 = 7;

fn qualifier_rank(qualifier: &str) -> u8 {
    QUALIFIER_RANKS
        .iter()
        .find(|(name, _)| *name == qualifier)
        .map(|(_, rank)| *rank)
        .unwrap_or(UNKNOWN_RANK)
}

fn compare_qualifiers(a: &str, b: &str) -> Ordering {
    qualifier_rank(a)
        .cmp(&qualifier_rank(b))
        .then_with(|| a.cmp(b))
}

impl Item {
    /// Compares against a missing item on the other side
    fn cmp_to_absent(&self) -> Ordering {
        match self {
            Item::Number(n) => n.cmp(&0),
            Item::Qualifier(q) => qualifier_rank(q).cmp(&RELEASE_RANK),
        }
    }

    fn is_null(&self) -> bool {
        self.cmp_to_absent() == Ordering::Equal
    }
}

impl Ord for Item {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Item::Number(a), Item::Number(b)) => a.cmp(b),
            (Item::Number(_), Item::Qualifier(_)) => Ordering::Greater,
            (Item::Qualifier(_), Item::Number(_)) => Ordering::Less,
            (Item::Qualifier(a), Item::Qualifier(b)) => compare_qualifiers(a, b),
        }
    }
}

impl PartialOrd for Item {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A parsed, comparable version string
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    items: Vec<Item>,
}

impl Version {
    pub fn parse(raw: &str) -> Self {
        let mut items = Vec::new();
        let mut token = String::new();
        let mut token_is_digit = false;

        let flush = |token: &mut String, is_digit: bool, items: &mut Vec<Item>| {
            if token.is_empty() {
                return;
            }
            let item = if is_digit {
                Item::Number(token.parse().unwrap_or(u64::MAX))
            } else {
                Item::Qualifier(token.clone())
            };
            items.push(item);
            token.clear();
        };

        for ch in raw.trim().to_ascii_lowercase().chars() {
            if ch == '.' || ch == '-' || ch == '_' || ch == '+' {
                flush(&mut token, token_is_digit, &mut items);
                continue;
            }
            let is_digit = ch.is_ascii_digit();
            if !token.is_empty() && is_digit != token_is_digit {
                flush(&mut token, token_is_digit, &mut items);
            }
            token_is_digit = is_digit;
            token.push(ch);
        }
        flush(&mut token, token_is_digit, &mut items);

        while items.last().map_or(false, Item::is_null) {
            items.pop();
        }

        Self {
            raw: raw.to_string(),
            items,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.items.len().max(other.items.len());
        for i in 0..len {
            let ordering = match (self.items.get(i), other.items.get(i)) {
                (Some(a), Some(b)) => a.cmp(b),
                (Some(a), None) => a.cmp_to_absent(),
                (None, Some(b)) => b.cmp_to_absent().reverse(),
                (None, None) => Ordering::Equal,
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

/// True when `server_version` is older than `min_version`. An unknown
/// server version is treated as older.
pub fn is_below(server_version: Option<&str>, min_version: &str) -> bool {
    match server_version {
        None => true,
        Some(server) => Version::parse(server) < Version::parse(min_version),
    }
}

/// Refuses servers older than a configured minimum
#[derive(Debug, Clone)]
pub struct VersionGate {
    min_version: String,
}

impl Default for VersionGate {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_SERVER_VERSION)
    }
}

impl VersionGate {
    pub fn new(min_version: impl Into<String>) -> Self {
        Self {
            min_version: min_version.into(),
        }
    }

    pub fn min_version(&self) -> &str {
        &self.min_version
    }

    pub fn check(&self, server_version: Option<&str>) -> BridgeResult<()> {
        debug!(
            server_version = server_version.unwrap_or("<unknown>"),
            min_version = %self.min_version,
            "Checking server version"
        );
        if is_below(server_version, &self.min_version) {
            return Err(BridgeError::UnsupportedServer {
                server_version: server_version.map(str::to_string),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[test]
    fn test_absent_version_is_below() {
        assert!(is_below(None, "5.6"));
    }

    #[test]
    fn test_equal_version_is_not_below() {
        assert!(!is_below(Some("5.6"), "5.6"));
    }

    #[test]
    fn test_numeric_segments_compare_numerically() {
        assert!(!is_below(Some("5.10"), "5.6"));
        assert!(is_below(Some("5.5.9"), "5.6"));
    }

    #[parameterized(
        trailing_zero = { "5.6.0", "5.6", Ordering::Equal },
        ga_qualifier = { "5.6-ga", "5.6", Ordering::Equal },
        snapshot_before_release = { "5.6-SNAPSHOT", "5.6", Ordering::Less },
        rc_before_snapshot = { "5.6-rc1", "5.6-SNAPSHOT", Ordering::Less },
        alpha_before_beta = { "1.0-alpha", "1.0-beta", Ordering::Less },
        sp_after_release = { "1.0-sp1", "1.0", Ordering::Greater },
        build_number = { "9.9.0.65466", "9.9", Ordering::Greater },
        major_wins = { "10.0", "9.9.9", Ordering::Greater },
        unknown_qualifier_after_release = { "1.0-foo", "1.0", Ordering::Greater },
        number_after_qualifier = { "1.0.1", "1.0-sp", Ordering::Greater },
        mixed_token = { "1.0rc2", "1.0-rc-1", Ordering::Greater },
    )]
    fn test_version_ordering(left: &str, right: &str, expected: Ordering) {
        assert_eq!(Version::parse(left).cmp(&Version::parse(right)), expected);
    }

    #[test]
    fn test_gate_rejects_old_server_with_remediation() {
        let gate = VersionGate::default();
        let err = gate.check(Some("5.5")).unwrap_err();
        assert!(matches!(
            err,
            BridgeError::UnsupportedServer { ref server_version } if server_version.as_deref() == Some("5.5")
        ));
        assert_eq!(err.to_string(), crate::error::UNSUPPORTED_SERVER_MESSAGE);
    }

    #[test]
    fn test_gate_rejects_unknown_server() {
        assert!(VersionGate::default().check(None).is_err());
    }

    #[test]
    fn test_gate_accepts_supported_server() {
        assert!(VersionGate::new("5.6").check(Some("10.4.1")).is_ok());
        assert_eq!(VersionGate::default().min_version(), "5.6");
    }
}
