//! Camera manufacturers. Read-only reference data.

use serde::{Deserialize, Serialize};

use super::record::RecordId;

/// A camera maker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manufacturer {
    /// Primary key.
    pub id: RecordId,
    /// Unique trading name.
    pub name: String,
    /// Year founded.
    pub founded: i32,
    /// Year the business ceased, if it has.
    pub defunct: Option<i32>,
    /// Country of origin.
    pub country: String,
    /// Long-form history.
    pub description: String,
}

/// Attributes for seeding a manufacturer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewManufacturer {
    /// Unique trading name.
    pub name: String,
    /// Year founded.
    pub founded: i32,
    /// Year the business ceased, if it has.
    pub defunct: Option<i32>,
    /// Country of origin.
    pub country: String,
    /// Long-form history.
    pub description: String,
}
