//! Camera catalogue records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::{
    RecordId, RecordValidationError, SHORT_TEXT_MAX, require_max_len, require_text,
};

/// Editable camera attributes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CameraDetails {
    /// Model name.
    pub name: String,
    /// Maker, as free text.
    pub manufacturer: String,
    /// Year the model went on sale.
    pub year_introduced: i32,
    /// Year production stopped, if known.
    pub year_discontinued: Option<i32>,
    /// Film or plate format.
    pub format: String,
    /// Supported plate sizes.
    pub plate_sizes: Vec<String>,
    /// Lens description.
    pub lens: String,
    /// Shutter description.
    pub shutter: String,
    /// Notable features.
    pub features: Vec<String>,
    /// Long-form description.
    pub description: String,
    /// Image locators, typically from the upload endpoint.
    pub image_urls: Vec<String>,
    /// Collector rarity label.
    pub rarity: String,
    /// Lower valuation bound.
    pub estimated_value_min: Option<f64>,
    /// Upper valuation bound.
    pub estimated_value_max: Option<f64>,
}

impl CameraDetails {
    /// Human-readable valuation, or `None` when no bound is set.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::CameraDetails;
    ///
    /// let details = CameraDetails {
    ///     estimated_value_min: Some(500.0),
    ///     estimated_value_max: Some(800.0),
    ///     ..CameraDetails::default()
    /// };
    /// assert_eq!(details.estimated_value_range().as_deref(), Some("500 - 800"));
    /// ```
    #[must_use]
    pub fn estimated_value_range(&self) -> Option<String> {
        match (self.estimated_value_min, self.estimated_value_max) {
            (Some(min), Some(max)) => Some(format!("{min} - {max}")),
            (Some(min), None) => Some(format!("from {min}")),
            (None, Some(max)) => Some(format!("up to {max}")),
            (None, None) => None,
        }
    }

    fn validate(&self) -> Result<(), RecordValidationError> {
        require_text("name", &self.name)?;
        require_text("manufacturer", &self.manufacturer)?;
        for (field, value) in [
            ("name", &self.name),
            ("manufacturer", &self.manufacturer),
            ("format", &self.format),
            ("rarity", &self.rarity),
        ] {
            require_max_len(field, value, SHORT_TEXT_MAX)?;
        }
        if self
            .year_discontinued
            .is_some_and(|year| year < self.year_introduced)
        {
            return Err(RecordValidationError::OutOfOrder {
                field: "year_discontinued",
                earlier: "year_introduced",
            });
        }
        for (field, amount) in [
            ("estimated_value_min", self.estimated_value_min),
            ("estimated_value_max", self.estimated_value_max),
        ] {
            if amount.is_some_and(|value| !value.is_finite() || value < 0.0) {
                return Err(RecordValidationError::InvalidAmount { field });
            }
        }
        if let (Some(min), Some(max)) = (self.estimated_value_min, self.estimated_value_max) {
            if max < min {
                return Err(RecordValidationError::OutOfOrder {
                    field: "estimated_value_max",
                    earlier: "estimated_value_min",
                });
            }
        }
        Ok(())
    }
}

/// Camera details that passed validation and may be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraDraft(CameraDetails);

impl CameraDraft {
    /// Validate `details`.
    pub fn try_new(details: CameraDetails) -> Result<Self, RecordValidationError> {
        details.validate()?;
        Ok(Self(details))
    }

    /// Validated attributes.
    #[must_use]
    pub const fn details(&self) -> &CameraDetails {
        &self.0
    }
}

/// A stored camera.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Primary key.
    pub id: RecordId,
    /// Attributes.
    pub details: CameraDetails,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn ruby_reflex() -> CameraDetails {
        CameraDetails {
            name: "Ruby Reflex".to_owned(),
            manufacturer: "Thornton-Pickard".to_owned(),
            year_introduced: 1909,
            year_discontinued: Some(1926),
            estimated_value_min: Some(500.0),
            estimated_value_max: Some(800.0),
            ..CameraDetails::default()
        }
    }

    #[rstest]
    fn valid_details_become_drafts() {
        let details = ruby_reflex();
        let draft = CameraDraft::try_new(details.clone()).expect("valid camera");
        assert_eq!(draft.details(), &details);
    }

    #[rstest]
    #[case::blank_name(
        CameraDetails { name: "  ".to_owned(), ..ruby_reflex() },
        RecordValidationError::Blank { field: "name" }
    )]
    #[case::blank_manufacturer(
        CameraDetails { manufacturer: String::new(), ..ruby_reflex() },
        RecordValidationError::Blank { field: "manufacturer" }
    )]
    #[case::discontinued_first(
        CameraDetails { year_discontinued: Some(1900), ..ruby_reflex() },
        RecordValidationError::OutOfOrder { field: "year_discontinued", earlier: "year_introduced" }
    )]
    #[case::negative_value(
        CameraDetails { estimated_value_min: Some(-1.0), ..ruby_reflex() },
        RecordValidationError::InvalidAmount { field: "estimated_value_min" }
    )]
    #[case::infinite_value(
        CameraDetails { estimated_value_max: Some(f64::INFINITY), ..ruby_reflex() },
        RecordValidationError::InvalidAmount { field: "estimated_value_max" }
    )]
    #[case::inverted_values(
        CameraDetails { estimated_value_min: Some(900.0), ..ruby_reflex() },
        RecordValidationError::OutOfOrder { field: "estimated_value_max", earlier: "estimated_value_min" }
    )]
    #[case::long_name(
        CameraDetails { name: "x".repeat(256), ..ruby_reflex() },
        RecordValidationError::TooLong { field: "name", max: 255 }
    )]
    #[case::long_rarity(
        CameraDetails { rarity: "r".repeat(300), ..ruby_reflex() },
        RecordValidationError::TooLong { field: "rarity", max: 255 }
    )]
    fn invalid_details_are_rejected(
        #[case] details: CameraDetails,
        #[case] expected: RecordValidationError,
    ) {
        assert_eq!(
            CameraDraft::try_new(details).expect_err("camera must fail"),
            expected
        );
    }

    #[rstest]
    fn names_at_the_column_width_are_accepted() {
        let details = CameraDetails {
            name: "é".repeat(255),
            ..ruby_reflex()
        };
        assert!(CameraDraft::try_new(details).is_ok());
    }

    #[rstest]
    #[case(Some(300.0), Some(600.0), Some("300 - 600"))]
    #[case(Some(250.5), None, Some("from 250.5"))]
    #[case(None, Some(90.0), Some("up to 90"))]
    #[case(None, None, None)]
    fn value_range_formats_known_bounds(
        #[case] min: Option<f64>,
        #[case] max: Option<f64>,
        #[case] expected: Option<&str>,
    ) {
        let details = CameraDetails {
            estimated_value_min: min,
            estimated_value_max: max,
            ..CameraDetails::default()
        };
        assert_eq!(details.estimated_value_range().as_deref(), expected);
    }
}
