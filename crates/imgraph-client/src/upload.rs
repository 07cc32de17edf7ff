//! Upload preparation
//!
//! Reads image files, base64-encodes them and names each one after its file
//! name plus a content-hash suffix, ready for [`UploadRequest`].

use crate::config::Segmentation;
use crate::error::BackendError;
use crate::wire::UploadRequest;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use imgraph_model::hashed_image_name;
use std::path::Path;

/// One encoded image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadImage {
    /// Hash-suffixed image name
    pub name: String,
    /// Base64 body
    pub base64: String,
}

impl UploadImage {
    /// Encode raw image bytes under `file_name`
    #[must_use]
    pub fn from_bytes(file_name: &str, bytes: &[u8]) -> Self {
        let base64 = STANDARD.encode(bytes);
        Self {
            name: hashed_image_name(file_name, &base64),
            base64,
        }
    }
}

/// Images uploaded together in one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadBatch {
    images: Vec<UploadImage>,
}

impl UploadBatch {
    /// Create empty batch
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an encoded image
    #[inline]
    pub fn push(&mut self, image: UploadImage) {
        self.images.push(image);
    }

    /// Add an encoded image (builder form)
    #[inline]
    #[must_use]
    pub fn with_image(mut self, image: UploadImage) -> Self {
        self.push(image);
        self
    }

    /// Read and encode image files
    ///
    /// # Errors
    /// Returns [`BackendError::Io`] for the first file that cannot be read
    pub async fn from_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Self, BackendError> {
        let mut batch = Self::new();
        for path in paths {
            let path = path.as_ref();
            let bytes = tokio::fs::read(path).await.map_err(|source| BackendError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let file_name = path
                .file_name()
                .map_or_else(|| path.to_string_lossy(), |name| name.to_string_lossy());
            tracing::debug!("Encoded {} ({} bytes)", file_name, bytes.len());
            batch.push(UploadImage::from_bytes(&file_name, &bytes));
        }
        Ok(batch)
    }

    /// Encoded images
    #[inline]
    #[must_use]
    pub fn images(&self) -> &[UploadImage] {
        &self.images
    }

    /// Hash-suffixed names
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.images.iter().map(|image| image.name.as_str())
    }

    /// Number of images
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Check if batch is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Build the upload request body
    #[must_use]
    pub fn into_request(self, segmentation: Segmentation) -> UploadRequest {
        let (image_name_array, image_base64_array) = self
            .images
            .into_iter()
            .map(|image| (image.name, image.base64))
            .unzip();

        UploadRequest {
            image_base64_array,
            image_name_array,
            rows: segmentation.rows,
            cols: segmentation.cols,
            overlap: segmentation.overlap,
        }
    }
}
