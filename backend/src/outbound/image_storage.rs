//! Filesystem-backed image storage confined to one directory.
//!
//! Writes go to a hidden staging file first and are renamed into place, so
//! a reader never observes a partially written image. All access goes
//! through a `cap_std` directory handle; names are validated
//! [`ImageName`]s, so nothing can resolve outside the upload root.

use std::io;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use mockable::Clock;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{ImageStore, ImageStoreError};
use crate::domain::{ImageFormat, ImageName};

/// [`ImageStore`] writing files named `<uuid>_<unix-seconds>.<ext>`.
#[derive(Clone)]
pub struct CapStdImageStore {
    root: Arc<Dir>,
    clock: Arc<dyn Clock>,
}

impl CapStdImageStore {
    /// Open `path`, creating it when missing.
    pub fn open(path: &Path, clock: Arc<dyn Clock>) -> io::Result<Self> {
        Dir::create_ambient_dir_all(path, ambient_authority())?;
        let root = Dir::open_ambient_dir(path, ambient_authority())?;
        Ok(Self {
            root: Arc::new(root),
            clock,
        })
    }

    fn next_name(&self, format: ImageFormat) -> ImageName {
        let stem = format!(
            "{}_{}",
            Uuid::new_v4().simple(),
            self.clock.utc().timestamp()
        );
        ImageName::generated(&stem, format)
    }
}

async fn blocking<T, F>(work: F) -> Result<T, ImageStoreError>
where
    F: FnOnce() -> io::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| ImageStoreError::io(format!("image task failed: {err}")))?
        .map_err(|err| ImageStoreError::io(err.to_string()))
}

#[async_trait]
impl ImageStore for CapStdImageStore {
    async fn store(
        &self,
        format: ImageFormat,
        bytes: Vec<u8>,
    ) -> Result<ImageName, ImageStoreError> {
        let name = self.next_name(format);
        let root = Arc::clone(&self.root);
        let final_name = name.as_str().to_owned();
        let staging = format!(".staging-{final_name}");
        blocking(move || {
            root.write(&staging, &bytes)?;
            root.rename(&staging, &root, &final_name).inspect_err(|_| {
                let _cleanup = root.remove_file(&staging);
            })
        })
        .await?;
        debug!(image = %name, "image stored");
        Ok(name)
    }

    async fn fetch(&self, name: &ImageName) -> Result<Option<Vec<u8>>, ImageStoreError> {
        let root = Arc::clone(&self.root);
        let file = name.as_str().to_owned();
        blocking(move || match root.read(&file) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        })
        .await
    }
}
