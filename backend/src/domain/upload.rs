//! Image upload rules: accepted formats, size ceiling and stored names.

use std::fmt;

/// Largest accepted upload, in bytes.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Image formats accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    /// `image/jpeg`, stored as `.jpg`.
    Jpeg,
    /// `image/png`.
    Png,
    /// `image/gif`.
    Gif,
    /// `image/webp`.
    Webp,
}

impl ImageFormat {
    /// Match a `Content-Type` essence, ignoring case and parameters.
    #[must_use]
    pub fn from_content_type(raw: &str) -> Option<Self> {
        let essence = raw.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/gif" => Some(Self::Gif),
            "image/webp" => Some(Self::Webp),
            _ => None,
        }
    }

    /// Match a file extension without the dot, ignoring case.
    #[must_use]
    pub fn from_extension(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            "webp" => Some(Self::Webp),
            _ => None,
        }
    }

    /// Extension used for stored files.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Webp => "webp",
        }
    }

    /// MIME type served back to clients.
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
        }
    }
}

/// Name of a stored image: a single path component made of ASCII
/// alphanumerics, `-` and `_`, followed by a known image extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageName {
    name: String,
    format: ImageFormat,
}

impl ImageName {
    /// Validate a client-supplied name. Anything that could traverse
    /// directories is rejected.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let (stem, extension) = raw.rsplit_once('.')?;
        let format = ImageFormat::from_extension(extension)?;
        let stem_ok = !stem.is_empty()
            && stem
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        stem_ok.then(|| Self {
            name: raw.to_owned(),
            format,
        })
    }

    /// Compose a name from a generated stem.
    #[must_use]
    pub fn generated(stem: &str, format: ImageFormat) -> Self {
        Self {
            name: format!("{stem}.{}", format.extension()),
            format,
        }
    }

    /// File name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.name.as_str()
    }

    /// Format implied by the extension.
    #[must_use]
    pub const fn format(&self) -> ImageFormat {
        self.format
    }

    /// Public locator under which the image is served.
    #[must_use]
    pub fn locator(&self) -> String {
        format!("/uploads/{}", self.name)
    }
}

impl fmt::Display for ImageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
