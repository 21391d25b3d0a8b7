//! Request and response bodies, with their OpenAPI schemas.
//!
//! Domain record types stay free of `utoipa`. These wrappers mirror them at
//! the HTTP edge and convert in both directions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Account, AuthenticatedSession, Camera, CameraDetails, Ephemera, EphemeraDetails, Manufacturer,
    RecordId,
};

/// Public view of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AccountBody {
    /// Stable account identifier.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    /// Normalised login email.
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// Granted role.
    #[schema(example = "user")]
    pub role: String,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountBody {
    fn from(account: Account) -> Self {
        Self {
            id: account.id.to_string(),
            email: account.email.as_str().to_owned(),
            role: account.role.as_str().to_owned(),
            created_at: account.created_at,
        }
    }
}

/// Bearer token plus the account it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SessionBody {
    /// Token to send as `Authorization: Bearer <token>`.
    pub token: String,
    /// When the token stops verifying.
    pub expires_at: DateTime<Utc>,
    /// Account the token speaks for.
    pub account: AccountBody,
}

impl From<AuthenticatedSession> for SessionBody {
    fn from(session: AuthenticatedSession) -> Self {
        Self {
            token: session.token.token,
            expires_at: session.token.expires_at,
            account: session.account.into(),
        }
    }
}

/// Editable camera attributes, as submitted and as returned.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct CameraFields {
    #[schema(example = "Ruby Reflex")]
    pub name: String,
    #[schema(example = "Thornton-Pickard")]
    pub manufacturer: String,
    #[schema(example = 1912)]
    pub year_introduced: i32,
    pub year_discontinued: Option<i32>,
    #[schema(example = "plate")]
    pub format: String,
    pub plate_sizes: Vec<String>,
    pub lens: String,
    pub shutter: String,
    pub features: Vec<String>,
    pub description: String,
    pub image_urls: Vec<String>,
    #[schema(example = "uncommon")]
    pub rarity: String,
    pub estimated_value_min: Option<f64>,
    pub estimated_value_max: Option<f64>,
}

impl From<CameraFields> for CameraDetails {
    fn from(fields: CameraFields) -> Self {
        Self {
            name: fields.name,
            manufacturer: fields.manufacturer,
            year_introduced: fields.year_introduced,
            year_discontinued: fields.year_discontinued,
            format: fields.format,
            plate_sizes: fields.plate_sizes,
            lens: fields.lens,
            shutter: fields.shutter,
            features: fields.features,
            description: fields.description,
            image_urls: fields.image_urls,
            rarity: fields.rarity,
            estimated_value_min: fields.estimated_value_min,
            estimated_value_max: fields.estimated_value_max,
        }
    }
}

impl From<CameraDetails> for CameraFields {
    fn from(details: CameraDetails) -> Self {
        Self {
            name: details.name,
            manufacturer: details.manufacturer,
            year_introduced: details.year_introduced,
            year_discontinued: details.year_discontinued,
            format: details.format,
            plate_sizes: details.plate_sizes,
            lens: details.lens,
            shutter: details.shutter,
            features: details.features,
            description: details.description,
            image_urls: details.image_urls,
            rarity: details.rarity,
            estimated_value_min: details.estimated_value_min,
            estimated_value_max: details.estimated_value_max,
        }
    }
}

/// A stored camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CameraBody {
    #[schema(value_type = i32, example = 1)]
    pub id: RecordId,
    #[serde(flatten)]
    pub fields: CameraFields,
    /// Valuation summary, present when either bound is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "500 - 800")]
    pub estimated_value_range: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Camera> for CameraBody {
    fn from(camera: Camera) -> Self {
        let estimated_value_range = camera.details.estimated_value_range();
        Self {
            id: camera.id,
            fields: camera.details.into(),
            estimated_value_range,
            created_at: camera.created_at,
            updated_at: camera.updated_at,
        }
    }
}

/// Editable ephemera attributes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct EphemeraFields {
    /// Category such as `catalog`, `manual` or `advertisement`.
    #[serde(rename = "type")]
    #[schema(example = "catalog")]
    pub kind: String,
    #[schema(example = "Thornton-Pickard 1912 Catalogue")]
    pub title: String,
    pub year: i32,
    pub pages: Option<i32>,
    pub description: String,
    pub scan_url: String,
    pub thumbnail_url: String,
    #[schema(value_type = Vec<i32>)]
    pub related_cameras: Vec<RecordId>,
}

impl From<EphemeraFields> for EphemeraDetails {
    fn from(fields: EphemeraFields) -> Self {
        Self {
            kind: fields.kind,
            title: fields.title,
            year: fields.year,
            pages: fields.pages,
            description: fields.description,
            scan_url: fields.scan_url,
            thumbnail_url: fields.thumbnail_url,
            related_cameras: fields.related_cameras,
        }
    }
}

impl From<EphemeraDetails> for EphemeraFields {
    fn from(details: EphemeraDetails) -> Self {
        Self {
            kind: details.kind,
            title: details.title,
            year: details.year,
            pages: details.pages,
            description: details.description,
            scan_url: details.scan_url,
            thumbnail_url: details.thumbnail_url,
            related_cameras: details.related_cameras,
        }
    }
}

/// A stored ephemera item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EphemeraBody {
    #[schema(value_type = i32, example = 1)]
    pub id: RecordId,
    #[serde(flatten)]
    pub fields: EphemeraFields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Ephemera> for EphemeraBody {
    fn from(item: Ephemera) -> Self {
        Self {
            id: item.id,
            fields: item.details.into(),
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

/// A camera maker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ManufacturerBody {
    #[schema(value_type = i32)]
    pub id: RecordId,
    #[schema(example = "Thornton-Pickard")]
    pub name: String,
    pub founded: i32,
    pub defunct: Option<i32>,
    pub country: String,
    pub description: String,
}

impl From<Manufacturer> for ManufacturerBody {
    fn from(value: Manufacturer) -> Self {
        Self {
            id: value.id,
            name: value.name,
            founded: value.founded,
            defunct: value.defunct,
            country: value.country,
            description: value.description,
        }
    }
}

/// Locator and size of a stored upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UploadBody {
    #[schema(example = "/uploads/0b9c1c7e-8f3a-4c1e-9a57-3f7c1f0e2d44_1767268800.jpg")]
    pub url: String,
    /// Name the client sent the file under.
    #[schema(example = "ruby-reflex.jpg")]
    pub filename: String,
    /// Stored size in bytes.
    pub size: usize,
}

/// Locators of the files stored by a multi-file upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MultiUploadBody {
    pub urls: Vec<String>,
    /// Number of files stored; invalid files are not counted.
    pub count: usize,
}

/// OpenAPI schema for the single-file upload form.
#[derive(ToSchema)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct UploadForm {
    /// JPG, PNG, GIF or WebP image, at most 5 MiB.
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

/// OpenAPI schema for the multi-file upload form.
#[derive(ToSchema)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct MultiUploadForm {
    /// Up to ten images; invalid ones are skipped.
    #[schema(value_type = Vec<String>)]
    files: Vec<Vec<u8>>,
}

/// OpenAPI schema for a page of cameras (`pagination::Paginated<CameraBody>`).
#[derive(ToSchema)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct CameraPageSchema {
    /// Effective page number, after clamping.
    page: u32,
    /// Effective page size, after clamping.
    page_size: u32,
    /// Matches across all pages.
    total: i64,
    /// `ceil(total / page_size)`.
    total_pages: u64,
    data: Vec<CameraBody>,
}

/// OpenAPI schema for a page of ephemera (`pagination::Paginated<EphemeraBody>`).
#[derive(ToSchema)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct EphemeraPageSchema {
    page: u32,
    page_size: u32,
    total: i64,
    total_pages: u64,
    data: Vec<EphemeraBody>,
}
