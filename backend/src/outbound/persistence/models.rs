//! Diesel row structs. Internal to the persistence layer; repositories
//! convert them to domain types before returning.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{cameras, ephemera, manufacturers, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = manufacturers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ManufacturerRow {
    pub id: i32,
    pub name: String,
    pub founded: i32,
    pub defunct: Option<i32>,
    pub country: String,
    pub description: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = manufacturers)]
pub(crate) struct NewManufacturerRow<'a> {
    pub name: &'a str,
    pub founded: i32,
    pub defunct: Option<i32>,
    pub country: &'a str,
    pub description: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = cameras)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CameraRow {
    pub id: i32,
    pub name: String,
    pub manufacturer: String,
    pub year_introduced: i32,
    pub year_discontinued: Option<i32>,
    pub format: String,
    pub plate_sizes: Vec<String>,
    pub lens: String,
    pub shutter: String,
    pub features: Vec<String>,
    pub description: String,
    pub image_urls: Vec<String>,
    pub rarity: String,
    pub estimated_value_min: Option<f64>,
    pub estimated_value_max: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert and full-replacement changeset. `None` clears the column.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = cameras)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct CameraChangeset<'a> {
    pub name: &'a str,
    pub manufacturer: &'a str,
    pub year_introduced: i32,
    pub year_discontinued: Option<i32>,
    pub format: &'a str,
    pub plate_sizes: &'a [String],
    pub lens: &'a str,
    pub shutter: &'a str,
    pub features: &'a [String],
    pub description: &'a str,
    pub image_urls: &'a [String],
    pub rarity: &'a str,
    pub estimated_value_min: Option<f64>,
    pub estimated_value_max: Option<f64>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = ephemera)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EphemeraRow {
    pub id: i32,
    pub kind: String,
    pub title: String,
    pub year: i32,
    pub pages: Option<i32>,
    pub description: String,
    pub scan_url: String,
    pub thumbnail_url: String,
    pub related_cameras: Vec<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert and full-replacement changeset for ephemera.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = ephemera)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct EphemeraChangeset<'a> {
    pub kind: &'a str,
    pub title: &'a str,
    pub year: i32,
    pub pages: Option<i32>,
    pub description: &'a str,
    pub scan_url: &'a str,
    pub thumbnail_url: &'a str,
    pub related_cameras: Vec<i32>,
    pub updated_at: DateTime<Utc>,
}
