//! Mock image upload.
//!
//! Accepts the upload, checks it looks like an image, waits like a real
//! object store would, and hands back the shared placeholder reference.

use std::time::Duration;

use log::info;

use super::errors::DomainError;

pub const PLACEHOLDER_IMAGE_URL: &str = "/placeholder.svg?height=200&width=200";
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

#[derive(Clone)]
pub struct ImageService {
    latency: Duration,
}

impl ImageService {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    /// Store an uploaded image and return the reference to put in
    /// `Cat::image_url`
    pub async fn upload_image(
        &self,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<String, DomainError> {
        let is_image = content_type
            .map(|ct| ct.trim().to_ascii_lowercase().starts_with("image/"))
            .unwrap_or(false);
        if !is_image {
            return Err(DomainError::invalid_field(
                "file",
                "Only image uploads are supported",
            ));
        }
        if bytes.is_empty() {
            return Err(DomainError::invalid_field("file", "Image is empty"));
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(DomainError::invalid_field(
                "file",
                "Image cannot exceed 5 MB",
            ));
        }

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        info!("Accepted image upload of {} bytes", bytes.len());
        Ok(PLACEHOLDER_IMAGE_URL.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_returns_placeholder() {
        let service = ImageService::new(Duration::ZERO);
        let url = service
            .upload_image(Some("image/png"), &[0x89, 0x50, 0x4e, 0x47])
            .await
            .unwrap();
        assert_eq!(url, PLACEHOLDER_IMAGE_URL);
    }

    #[tokio::test]
    async fn test_upload_rejects_non_images() {
        let service = ImageService::new(Duration::ZERO);
        for content_type in [None, Some("text/plain")] {
            let err = service.upload_image(content_type, b"hello").await.unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)));
        }
        let err = service.upload_image(Some("image/jpeg"), &[]).await.unwrap_err();
        assert_eq!(err, DomainError::invalid_field("file", "Image is empty"));
    }
}
