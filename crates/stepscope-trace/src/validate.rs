#![forbid(unsafe_code)]

//! Raw-text input validation.
//!
//! Turns the array and target text fields into a typed [`SearchRequest`],
//! enforcing algorithm preconditions. Errors are values, never panics; the
//! frontend renders them as status text.

use std::fmt;

use crate::request::{Algorithm, SearchRequest};

/// Which input field a parse failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// The comma-separated array field.
    Array,
    /// The target value field.
    Target,
}

impl Field {
    const fn label(self) -> &'static str {
        match self {
            Self::Array => "array",
            Self::Target => "target",
        }
    }
}

/// Validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidateError {
    /// A token in one of the input fields is not a number.
    ParseError {
        /// The offending token, trimmed.
        token: String,
        /// Which field it came from.
        field: Field,
    },
    /// Binary search requires a non-decreasing array; this pair violates it.
    UnsortedError {
        /// First index `i` with `values[i] > values[i + 1]`.
        index: usize,
    },
}

impl fmt::Display for ValidateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParseError { token, field } => {
                write!(f, "{} contains '{token}', which is not a number", field.label())
            }
            Self::UnsortedError { index } => write!(
                f,
                "binary search needs a sorted array, but position {} is greater than position {}",
                index + 1,
                index + 2
            ),
        }
    }
}

impl std::error::Error for ValidateError {}

/// Validate raw text into a [`SearchRequest`].
///
/// The array text is split on commas and each trimmed token parsed as an
/// integer. Empty or whitespace-only array text yields an empty array, which
/// is valid for both algorithms (vacuously sorted). For
/// [`Algorithm::Binary`] the parsed array is additionally checked for
/// non-decreasing order.
///
/// # Errors
///
/// [`ValidateError::ParseError`] for a non-numeric token, or
/// [`ValidateError::UnsortedError`] when a binary-search array is out of
/// order. No trace is produced on error.
pub fn validate(
    array_text: &str,
    target_text: &str,
    algorithm: Algorithm,
) -> Result<SearchRequest, ValidateError> {
    let values = parse_array(array_text)?;

    let target = target_text
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidateError::ParseError {
            token: target_text.trim().to_string(),
            field: Field::Target,
        })?;

    if algorithm == Algorithm::Binary
        && let Some(index) = first_unsorted_pair(&values)
    {
        return Err(ValidateError::UnsortedError { index });
    }

    Ok(SearchRequest {
        values,
        target,
        algorithm,
    })
}

fn parse_array(text: &str) -> Result<Vec<i64>, ValidateError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    text.split(',')
        .map(str::trim)
        .map(|token| {
            token.parse::<i64>().map_err(|_| ValidateError::ParseError {
                token: token.to_string(),
                field: Field::Array,
            })
        })
        .collect()
}

fn first_unsorted_pair(values: &[i64]) -> Option<usize> {
    values.windows(2).position(|pair| pair[0] > pair[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_values() {
        let req = validate("1, 3,5 , 7", "5", Algorithm::Linear).unwrap();
        assert_eq!(req.values, vec![1, 3, 5, 7]);
        assert_eq!(req.target, 5);
        assert_eq!(req.algorithm, Algorithm::Linear);
    }

    #[test]
    fn parses_negative_values() {
        let req = validate("-5,-2,0,9", "-2", Algorithm::Binary).unwrap();
        assert_eq!(req.values, vec![-5, -2, 0, 9]);
        assert_eq!(req.target, -2);
    }

    #[test]
    fn empty_array_text_is_valid_for_both_algorithms() {
        assert_eq!(validate("", "5", Algorithm::Linear).unwrap().values, Vec::<i64>::new());
        assert_eq!(validate("  ", "5", Algorithm::Binary).unwrap().values, Vec::<i64>::new());
    }

    #[test]
    fn rejects_non_numeric_array_token() {
        let err = validate("1,two,3", "5", Algorithm::Linear).unwrap_err();
        assert_eq!(
            err,
            ValidateError::ParseError {
                token: "two".to_string(),
                field: Field::Array,
            }
        );
        assert!(err.to_string().contains("two"));
    }

    #[test]
    fn rejects_non_numeric_target() {
        let err = validate("1,2,3", "x", Algorithm::Linear).unwrap_err();
        assert_eq!(
            err,
            ValidateError::ParseError {
                token: "x".to_string(),
                field: Field::Target,
            }
        );
    }

    #[test]
    fn rejects_empty_token_between_commas() {
        let err = validate("1,,3", "5", Algorithm::Linear).unwrap_err();
        assert!(matches!(err, ValidateError::ParseError { field: Field::Array, .. }));
    }

    #[test]
    fn unsorted_array_fails_binary_but_not_linear() {
        let err = validate("5,2,9", "2", Algorithm::Binary).unwrap_err();
        assert_eq!(err, ValidateError::UnsortedError { index: 0 });

        let req = validate("5,2,9", "2", Algorithm::Linear).unwrap();
        assert_eq!(req.values, vec![5, 2, 9]);
    }

    #[test]
    fn unsorted_error_reports_first_violating_pair() {
        let err = validate("1,2,9,3,4", "3", Algorithm::Binary).unwrap_err();
        assert_eq!(err, ValidateError::UnsortedError { index: 2 });
        assert!(err.to_string().contains("position 3"));
    }

    #[test]
    fn duplicates_are_sorted() {
        // Non-decreasing, not strictly increasing.
        assert!(validate("1,1,2,2", "2", Algorithm::Binary).is_ok());
    }

    #[test]
    fn single_element_is_sorted() {
        assert!(validate("42", "42", Algorithm::Binary).is_ok());
    }
}
