//! Image storage in the hosted object-storage bucket.
//!
//! Uploads go straight to the bucket's HTTP API and come back as a
//! public URL plus the object path; the path is stored on the event row
//! so deleting the event can best-effort delete the object too.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{GrangeError, GrangeResult};

/// A stored media object: where the public can fetch it, and where it
/// lives inside the bucket.
#[derive(Debug, Clone)]
pub struct StoredMedia {
    pub url: String,
    pub path: String,
}

/// Object-storage collaborator.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Upload `bytes` under `path` and return its public URL.
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str)
        -> GrangeResult<String>;

    /// Delete the object at `path`.
    async fn delete(&self, path: &str) -> GrangeResult<()>;
}

/// Build a bucket object key from an uploaded filename: a lowercased
/// alphanumeric slug with a random suffix, keeping the extension.
/// The suffix makes collisions a non-issue without a round trip to the
/// bucket.
pub fn object_key(filename: &str) -> String {
    let (stem, ext) = match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (filename, None),
    };

    let slug: String = stem
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    let slug = if slug.is_empty() { "upload".to_string() } else { slug };

    let suffix = Uuid::new_v4().simple().to_string();
    match ext {
        Some(ext) => format!("{slug}-{}.{}", &suffix[..8], ext.to_lowercase()),
        None => format!("{slug}-{}", &suffix[..8]),
    }
}

/// Passthrough to the hosted object-storage HTTP API.
pub struct RestMediaStore {
    client: reqwest::Client,
    base_url: String,
    bucket: String,
    api_key: String,
}

impl RestMediaStore {
    pub fn new(base_url: &str, bucket: &str, api_key: &str) -> Self {
        RestMediaStore {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            bucket: bucket.to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn object_url(&self, path: &str) -> String {
        format!("{}/object/{}/{}", self.base_url, self.bucket, path)
    }

    /// Where the public can fetch an object in this bucket.
    pub fn public_url(&self, path: &str) -> String {
        format!("{}/object/public/{}/{}", self.base_url, self.bucket, path)
    }
}

#[async_trait]
impl MediaStore for RestMediaStore {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> GrangeResult<String> {
        let response = self
            .client
            .post(self.object_url(path))
            .bearer_auth(&self.api_key)
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GrangeError::Media(format!(
                "upload of {path} failed with {status}: {body}"
            )));
        }

        Ok(self.public_url(path))
    }

    async fn delete(&self, path: &str) -> GrangeResult<()> {
        let response = self
            .client
            .delete(self.object_url(path))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GrangeError::Media(format!(
                "delete of {path} failed with {status}: {body}"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_key_slugs_and_keeps_extension() {
        let key = object_key("Midsummer Flyer (final).PNG");
        assert!(key.starts_with("midsummer-flyer-final-"));
        assert!(key.ends_with(".png"));
    }

    #[test]
    fn test_object_key_without_extension() {
        let key = object_key("flyer");
        assert!(key.starts_with("flyer-"));
        assert!(!key.contains('.'));
    }

    #[test]
    fn test_object_key_empty_stem_falls_back() {
        let key = object_key("...");
        assert!(key.starts_with("upload-"));
    }

    #[test]
    fn test_object_keys_are_unique_per_call() {
        assert_ne!(object_key("flyer.png"), object_key("flyer.png"));
    }
}
