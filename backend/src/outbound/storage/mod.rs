//! Upload directory adapter for the `ImageStore` port.
//!
//! Files are written through a capability handle on the upload directory,
//! so a crafted url can never reach outside it. Stored files are named
//! `car-<unix millis>-<random>.<ext>` and served as `/uploads/<name>`.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use chrono::Utc;
use rand::Rng;
use tracing::debug;

use crate::domain::ValidatedUpload;
use crate::domain::ports::{ImageStore, ImageStoreError};

/// Public path prefix under which stored images are served.
pub const UPLOADS_URL_PREFIX: &str = "/uploads/";

/// `ImageStore` writing into a local directory.
#[derive(Clone)]
pub struct CapStdImageStore {
    dir: Arc<Dir>,
    root: PathBuf,
}

impl CapStdImageStore {
    /// Open (creating if needed) the upload directory at `root`.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the directory cannot be created
    /// or opened.
    pub fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        Dir::create_ambient_dir_all(&root, ambient_authority())?;
        let dir = Dir::open_ambient_dir(&root, ambient_authority())?;
        Ok(Self {
            dir: Arc::new(dir),
            root,
        })
    }

    /// Directory the files are written to.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn generate_file_name(upload: &ValidatedUpload) -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
    format!(
        "car-{}-{suffix}.{}",
        Utc::now().timestamp_millis(),
        upload.content_type.extension()
    )
}

/// File name addressed by `url`, if it is one of ours.
fn file_name_for(url: &str) -> Option<&str> {
    url.strip_prefix(UPLOADS_URL_PREFIX)
        .filter(|name| !name.is_empty() && !name.contains(['/', '\\']) && *name != "..")
}

fn io_error(err: &io::Error) -> ImageStoreError {
    ImageStoreError::io(err.to_string())
}

async fn on_blocking_pool<T, F>(work: F) -> Result<T, ImageStoreError>
where
    T: Send + 'static,
    F: FnOnce() -> io::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| ImageStoreError::io(err.to_string()))?
        .map_err(|err| io_error(&err))
}

#[async_trait]
impl ImageStore for CapStdImageStore {
    async fn store(&self, upload: &ValidatedUpload) -> Result<String, ImageStoreError> {
        let name = generate_file_name(upload);
        let dir = Arc::clone(&self.dir);
        let bytes = upload.bytes.clone();
        let target = name.clone();
        on_blocking_pool(move || dir.write(&target, bytes)).await?;
        debug!(file = %name, "stored image");
        Ok(format!("{UPLOADS_URL_PREFIX}{name}"))
    }

    async fn remove(&self, url: &str) -> Result<(), ImageStoreError> {
        let name = file_name_for(url)
            .ok_or_else(|| ImageStoreError::foreign_url(url))?
            .to_owned();
        let dir = Arc::clone(&self.dir);
        on_blocking_pool(move || match dir.remove_file(&name) {
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        })
        .await
    }
}
