//! AWS-facing collaborators: the secret store and object storage.
//!
//! Both sit behind traits so handlers can run against the in-memory
//! implementations in tests.

pub mod error;
pub mod secrets;
pub mod storage;

pub use error::CloudError;
pub use secrets::{load_secret, SecretStore, SecretsManagerStore, StaticSecretStore};
pub use storage::{InMemoryObjectStore, ObjectStore, R2Config, S3ObjectStore, StoredObject};

/// Load the shared AWS configuration, optionally pinned to `region`.
pub async fn load_aws_config(region: Option<&str>) -> aws_config::SdkConfig {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
    if let Some(region) = region {
        loader = loader.region(aws_config::Region::new(region.to_string()));
    }
    loader.load().await
}
