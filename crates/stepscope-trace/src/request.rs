#![forbid(unsafe_code)]

//! Search requests and the algorithm selector.

use std::fmt;
use std::str::FromStr;

/// Which search algorithm a trace should demonstrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Algorithm {
    /// Left-to-right scan over the whole array.
    Linear,
    /// Halving search over a non-decreasing array.
    Binary,
}

impl Algorithm {
    /// Human-readable name, as shown in status lines.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear search",
            Self::Binary => "binary search",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an [`Algorithm`] from text fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAlgorithm(pub String);

impl fmt::Display for UnknownAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown algorithm '{}' (expected 'linear' or 'binary')", self.0)
    }
}

impl std::error::Error for UnknownAlgorithm {}

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "binary" => Ok(Self::Binary),
            other => Err(UnknownAlgorithm(other.to_string())),
        }
    }
}

/// A validated search run: the array, the target, and the algorithm.
///
/// For [`Algorithm::Binary`], `values` is non-decreasing. The validator in
/// [`crate::validate`] enforces that before a request is ever built from user
/// input; [`SearchRequest::new`] is for programmatic construction and checks
/// the same invariant in debug builds.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchRequest {
    /// The array being searched. May be empty.
    pub values: Vec<i64>,
    /// The value being searched for.
    pub target: i64,
    /// Which algorithm's steps to generate.
    pub algorithm: Algorithm,
}

impl SearchRequest {
    /// Create a request directly from typed values.
    #[must_use]
    pub fn new(values: Vec<i64>, target: i64, algorithm: Algorithm) -> Self {
        debug_assert!(
            algorithm != Algorithm::Binary || values.windows(2).all(|w| w[0] <= w[1]),
            "binary search request requires a non-decreasing array"
        );
        Self {
            values,
            target,
            algorithm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_parses_case_insensitively() {
        assert_eq!("linear".parse::<Algorithm>(), Ok(Algorithm::Linear));
        assert_eq!("Binary".parse::<Algorithm>(), Ok(Algorithm::Binary));
        assert_eq!(" BINARY ".parse::<Algorithm>(), Ok(Algorithm::Binary));
    }

    #[test]
    fn algorithm_rejects_unknown_names() {
        let err = "bogo".parse::<Algorithm>().unwrap_err();
        assert_eq!(err, UnknownAlgorithm("bogo".to_string()));
        assert!(err.to_string().contains("bogo"));
    }

    #[test]
    fn algorithm_display_names() {
        assert_eq!(Algorithm::Linear.to_string(), "linear search");
        assert_eq!(Algorithm::Binary.to_string(), "binary search");
    }

    #[test]
    fn request_construction() {
        let req = SearchRequest::new(vec![1, 2, 3], 2, Algorithm::Binary);
        assert_eq!(req.values, vec![1, 2, 3]);
        assert_eq!(req.target, 2);
        assert_eq!(req.algorithm, Algorithm::Binary);
    }
}
