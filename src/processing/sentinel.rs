//! Caller-supplied sentinel code sets.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Integer codes that mean "don't know", "refused" and the like for a continuous column.
///
/// Sentinels are always supplied by the caller per column; they are never read from the
/// codebook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentinelSet(BTreeSet<i64>);

impl SentinelSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `code` is a sentinel.
    pub fn contains(&self, code: i64) -> bool {
        self.0.contains(&code)
    }

    /// Number of sentinel codes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no sentinel codes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate codes in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<i64> for SentinelSet {
    fn from_iter<T: IntoIterator<Item = i64>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[i64; N]> for SentinelSet {
    fn from(codes: [i64; N]) -> Self {
        codes.into_iter().collect()
    }
}

impl From<&[i64]> for SentinelSet {
    fn from(codes: &[i64]) -> Self {
        codes.iter().copied().collect()
    }
}

impl fmt::Display for SentinelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for code in &self.0 {
            if !first {
                f.write_str(",")?;
            }
            write!(f, "{code}")?;
            first = false;
        }
        Ok(())
    }
}

/// Error parsing a comma-separated sentinel list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid sentinel code '{0}'")]
pub struct ParseSentinelError(pub String);

impl FromStr for SentinelSet {
    type Err = ParseSentinelError;

    /// Parse `"98,99"`. Whitespace around codes is ignored; empty input is an empty set.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| part.parse::<i64>().map_err(|_| ParseSentinelError(part.to_string())))
            .collect()
    }
}
