//! Port for the file store holding uploaded images.

use async_trait::async_trait;

use crate::domain::{Error, ValidatedUpload};

use super::define_port_error;

define_port_error! {
    /// Errors raised by image store adapters.
    pub enum ImageStoreError {
        /// Reading or writing the underlying storage failed.
        Io { message: String } => "image store i/o failed: {message}",
        /// The url does not name a file inside the store.
        ForeignUrl { url: String } => "url is not served by this store: {url}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist the upload under a fresh name and return its public url.
    async fn store(&self, upload: &ValidatedUpload) -> Result<String, ImageStoreError>;

    /// Remove the file behind `url`. Removing a missing file succeeds.
    async fn remove(&self, url: &str) -> Result<(), ImageStoreError>;
}

impl From<ImageStoreError> for Error {
    fn from(err: ImageStoreError) -> Self {
        Error::internal(err.to_string())
    }
}
