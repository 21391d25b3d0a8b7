//! Port for uploaded image bytes.

use async_trait::async_trait;

use crate::domain::{ImageFormat, ImageName};

use super::define_port_error;

define_port_error! {
    /// Errors raised by image storage adapters.
    pub enum ImageStoreError {
        /// Reading or writing the backing store failed.
        Io { message: String } => "image storage failed: {message}",
    }
}

/// Where image bytes live. Durability is whatever the backend offers.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist `bytes` under a freshly generated name.
    async fn store(&self, format: ImageFormat, bytes: Vec<u8>)
    -> Result<ImageName, ImageStoreError>;

    /// Read back a stored image, `None` when absent.
    async fn fetch(&self, name: &ImageName) -> Result<Option<Vec<u8>>, ImageStoreError>;
}
