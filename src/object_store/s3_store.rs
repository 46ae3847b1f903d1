use async_trait::async_trait;
use bytes::Bytes;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::{Bucket, Region};

use super::{ObjectStore, ObjectStoreError};
use crate::config::S3Credentials;

/// Amazon S3 (or S3-compatible) object store backend.
pub struct S3Store {
    bucket: Box<Bucket>,
}

impl From<S3Error> for ObjectStoreError {
    fn from(e: S3Error) -> Self {
        ObjectStoreError::Backend(e.to_string())
    }
}

impl S3Store {
    /// Open `bucket_name` with the `[s3readwrite]` profile, or the default AWS credential chain
    /// when no profile is configured.
    pub fn new(
        bucket_name: &str,
        profile: Option<&S3Credentials>,
    ) -> Result<Self, ObjectStoreError> {
        let credentials = match profile {
            Some(p) => Credentials::new(
                p.aws_access_key_id.as_deref(),
                p.aws_secret_access_key.as_deref(),
                None,
                None,
                None,
            ),
            None => Credentials::default(),
        }
        .map_err(|e| ObjectStoreError::Backend(format!("credentials: {e}")))?;

        let region_name = profile.map_or("us-east-2", |p| p.region_name.as_str());
        let endpoint = profile.and_then(|p| p.endpoint_url.clone());

        let bucket = match endpoint {
            Some(endpoint) => {
                let region = Region::Custom {
                    region: region_name.to_string(),
                    endpoint,
                };
                Bucket::new(bucket_name, region, credentials)?.with_path_style()
            }
            None => {
                let region: Region = region_name
                    .parse()
                    .map_err(|e| ObjectStoreError::Backend(format!("region: {e}")))?;
                Bucket::new(bucket_name, region, credentials)?
            }
        };

        Ok(Self { bucket })
    }
}

fn check_status(key: &str, status: u16) -> Result<(), ObjectStoreError> {
    match status {
        200..=299 => Ok(()),
        404 => Err(ObjectStoreError::NotFound(key.to_string())),
        _ => Err(ObjectStoreError::Backend(format!(
            "S3 returned status {status} for {key}"
        ))),
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), ObjectStoreError> {
        let response = self
            .bucket
            .put_object_with_content_type(key, &data, content_type)
            .await?;
        check_status(key, response.status_code())?;
        tracing::debug!(key, bytes = data.len(), "Stored object in S3");
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Bytes, ObjectStoreError> {
        let response = self.bucket.get_object(key).await?;
        check_status(key, response.status_code())?;
        Ok(response.bytes().clone())
    }

    async fn count(&self) -> Result<u64, ObjectStoreError> {
        let pages = self.bucket.list(String::new(), None).await?;
        Ok(pages.iter().map(|page| page.contents.len() as u64).sum())
    }
}
