//! Printed ephemera: catalogues, manuals, advertisements and the like.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::{
    KIND_MAX, RecordId, RecordValidationError, SHORT_TEXT_MAX, require_max_len, require_positive,
    require_text,
};

/// Editable ephemera attributes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EphemeraDetails {
    /// Category such as `catalog`, `manual` or `advertisement`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Title as printed.
    pub title: String,
    /// Publication year.
    pub year: i32,
    /// Page count, if known.
    pub pages: Option<i32>,
    /// Long-form description.
    pub description: String,
    /// Full-resolution scan locator.
    pub scan_url: String,
    /// Thumbnail locator.
    pub thumbnail_url: String,
    /// Cameras featured in the item.
    pub related_cameras: Vec<RecordId>,
}

/// Ephemera details that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EphemeraDraft(EphemeraDetails);

impl EphemeraDraft {
    /// Validate `details`.
    pub fn try_new(details: EphemeraDetails) -> Result<Self, RecordValidationError> {
        require_text("type", &details.kind)?;
        require_text("title", &details.title)?;
        require_max_len("type", &details.kind, KIND_MAX)?;
        require_max_len("title", &details.title, SHORT_TEXT_MAX)?;
        require_positive("pages", details.pages)?;
        Ok(Self(details))
    }

    /// Validated attributes.
    #[must_use]
    pub const fn details(&self) -> &EphemeraDetails {
        &self.0
    }
}

/// A stored ephemera item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ephemera {
    /// Primary key.
    pub id: RecordId,
    /// Attributes.
    pub details: EphemeraDetails,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn catalogue() -> EphemeraDetails {
        EphemeraDetails {
            kind: "catalog".to_owned(),
            title: "Thornton-Pickard Catalogue 1912".to_owned(),
            year: 1912,
            pages: Some(64),
            ..EphemeraDetails::default()
        }
    }

    #[rstest]
    #[case(EphemeraDetails { kind: " ".to_owned(), ..catalogue() }, "type")]
    #[case(EphemeraDetails { title: String::new(), ..catalogue() }, "title")]
    #[case(EphemeraDetails { pages: Some(0), ..catalogue() }, "pages")]
    #[case(EphemeraDetails { kind: "k".repeat(65), ..catalogue() }, "type")]
    #[case(EphemeraDetails { title: "t".repeat(256), ..catalogue() }, "title")]
    fn invalid_items_name_the_field(#[case] details: EphemeraDetails, #[case] field: &str) {
        let err = EphemeraDraft::try_new(details).expect_err("item must fail");
        assert_eq!(err.field(), field);
    }

    #[rstest]
    fn kind_serialises_as_type() {
        let value = serde_json::to_value(catalogue()).expect("details serialise");
        assert_eq!(value.get("type").and_then(|v| v.as_str()), Some("catalog"));
        assert!(value.get("kind").is_none());
    }

    #[rstest]
    fn unknown_page_counts_are_allowed() {
        let details = EphemeraDetails {
            pages: None,
            ..catalogue()
        };
        assert!(EphemeraDraft::try_new(details).is_ok());
    }
}
