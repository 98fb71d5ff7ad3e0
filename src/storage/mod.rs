//! Supabase Storage collaborator for request photo attachments.
//!
//! Only the upload half lives server-side; downloads go straight from the
//! client to the public bucket URL.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("upload failed: {0}")]
    Upload(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

#[derive(Clone)]
pub struct StorageClient {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
    bucket: String,
}

impl StorageClient {
    pub fn new(supabase_url: &str, service_key: &str, bucket: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: supabase_url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
            bucket: bucket.to_string(),
        }
    }

    pub fn from_env() -> Self {
        let supabase_url = std::env::var("SUPABASE_URL").expect("SUPABASE_URL must be set");
        let service_key =
            std::env::var("SUPABASE_SERVICE_KEY").expect("SUPABASE_SERVICE_KEY must be set");
        let bucket =
            std::env::var("STORAGE_BUCKET").unwrap_or_else(|_| "request-photos".to_string());
        Self::new(&supabase_url, &service_key, &bucket)
    }

    /// Upload a blob and return its public URL.
    pub async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let upload_url = format!("{}/storage/v1/object/{}/{path}", self.base_url, self.bucket);

        let response = self
            .client
            .post(&upload_url)
            .bearer_auth(&self.service_key)
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Upload(format!("HTTP {status}: {body}")));
        }

        Ok(format!(
            "{}/storage/v1/object/public/{}/{path}",
            self.base_url, self.bucket
        ))
    }
}
