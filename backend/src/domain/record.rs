//! Shared pieces of catalogue records: identifiers and field validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Positive integer primary key of a catalogue record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct RecordId(i32);

/// Rejected record identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("record id must be a positive integer")]
pub struct InvalidRecordId;

impl RecordId {
    /// Wrap a positive key.
    pub const fn new(value: i32) -> Result<Self, InvalidRecordId> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(InvalidRecordId)
        }
    }

    /// Raw key.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for RecordId {
    type Error = InvalidRecordId;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RecordId> for i32 {
    fn from(value: RecordId) -> Self {
        value.0
    }
}

impl FromStr for RecordId {
    type Err = InvalidRecordId;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        raw.parse::<i32>()
            .map_err(|_| InvalidRecordId)
            .and_then(Self::new)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Why a submitted record body was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RecordValidationError {
    /// Required text was empty once trimmed.
    #[error("{field} must not be blank")]
    Blank {
        /// Offending field.
        field: &'static str,
    },
    /// A count or reference was zero or negative.
    #[error("{field} must be positive")]
    NotPositive {
        /// Offending field.
        field: &'static str,
    },
    /// A later bound precedes the earlier one.
    #[error("{field} must not be earlier than {earlier}")]
    OutOfOrder {
        /// Offending field.
        field: &'static str,
        /// Field it must not precede.
        earlier: &'static str,
    },
    /// Text exceeded the stored column width.
    #[error("{field} must be at most {max} characters")]
    TooLong {
        /// Offending field.
        field: &'static str,
        /// Maximum length in characters.
        max: usize,
    },
    /// A monetary amount was negative or not finite.
    #[error("{field} must be a non-negative amount")]
    InvalidAmount {
        /// Offending field.
        field: &'static str,
    },
}

impl RecordValidationError {
    /// Field the error refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Blank { field }
            | Self::NotPositive { field }
            | Self::OutOfOrder { field, .. }
            | Self::TooLong { field, .. }
            | Self::InvalidAmount { field } => field,
        }
    }

    /// Stable machine-readable code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Blank { .. } => "blank",
            Self::NotPositive { .. } => "not_positive",
            Self::OutOfOrder { .. } => "out_of_order",
            Self::TooLong { .. } => "too_long",
            Self::InvalidAmount { .. } => "invalid_amount",
        }
    }
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), RecordValidationError> {
    if value.trim().is_empty() {
        Err(RecordValidationError::Blank { field })
    } else {
        Ok(())
    }
}

/// Widest short text column, in characters.
pub const SHORT_TEXT_MAX: usize = 255;
/// Width of the ephemera `type` column, in characters.
pub const KIND_MAX: usize = 64;

pub(crate) fn require_max_len(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), RecordValidationError> {
    if value.chars().count() > max {
        Err(RecordValidationError::TooLong { field, max })
    } else {
        Ok(())
    }
}

pub(crate) fn require_positive(
    field: &'static str,
    value: Option<i32>,
) -> Result<(), RecordValidationError> {
    match value {
        Some(number) if number <= 0 => Err(RecordValidationError::NotPositive { field }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", Some(1))]
    #[case("42", Some(42))]
    #[case("0", None)]
    #[case("-7", None)]
    #[case("abc", None)]
    #[case("1.5", None)]
    #[case("99999999999", None)]
    fn record_ids_must_be_positive_integers(#[case] raw: &str, #[case] expected: Option<i32>) {
        assert_eq!(raw.parse::<RecordId>().ok().map(RecordId::get), expected);
    }

    #[rstest]
    #[case("", true)]
    #[case("ab", true)]
    #[case("abc", true)]
    #[case("abcd", false)]
    #[case("ééé", true)]
    fn length_is_counted_in_characters(#[case] value: &str, #[case] ok: bool) {
        let result = require_max_len("name", value, 3);
        assert_eq!(result.is_ok(), ok);
        if let Err(err) = result {
            assert_eq!(err, RecordValidationError::TooLong { field: "name", max: 3 });
            assert_eq!(err.code(), "too_long");
        }
    }

    #[rstest]
    fn errors_expose_field_and_code() {
        let err = RecordValidationError::OutOfOrder {
            field: "year_discontinued",
            earlier: "year_introduced",
        };
        assert_eq!(err.field(), "year_discontinued");
        assert_eq!(err.code(), "out_of_order");
        assert_eq!(
            err.to_string(),
            "year_discontinued must not be earlier than year_introduced"
        );
    }
}
