use std::path::{Path, PathBuf};

use config::{File, FileFormat};
use serde::Deserialize;
use thiserror::Error;

/// Config file used when the operator presses ENTER at the startup prompt.
pub const DEFAULT_CONFIG_FILE: &str = "photoapp-config.ini";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file '{}' does not exist", .0.display())]
    NotFound(PathBuf),
    #[error("Invalid configuration file: {0}")]
    Parse(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub s3: S3Config,
    /// Credential profile for the blob store. Falls back to the default AWS chain when absent.
    #[serde(default, rename = "s3readwrite")]
    pub credentials: Option<S3Credentials>,
    pub rds: RdsConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Local,
    #[default]
    S3,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Config {
    pub bucket_name: String,
    #[serde(default)]
    pub backend: StorageBackend,
    /// Directory for local storage backend
    #[serde(default = "default_local_path")]
    pub local_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Credentials {
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    #[serde(default = "default_region", alias = "region")]
    pub region_name: String,
    /// Endpoint of an S3-compatible service (MinIO, R2, ...). Enables path-style addressing.
    pub endpoint_url: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseDriver {
    #[default]
    Mysql,
    Sqlite,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RdsConfig {
    pub endpoint: String,
    pub port_number: u16,
    pub user_name: String,
    pub user_pwd: String,
    /// Schema name for MySQL, database file path for SQLite.
    pub db_name: String,
    #[serde(default)]
    pub driver: DatabaseDriver,
}

fn default_local_path() -> String {
    "./objects".to_string()
}

fn default_region() -> String {
    "us-east-2".to_string()
}

impl Config {
    /// Load configuration from an INI file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let settings = config::Config::builder()
            .add_source(File::new(&path.to_string_lossy(), FileFormat::Ini))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.s3.bucket_name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "s3.bucket_name cannot be empty".to_string(),
            ));
        }

        if self.rds.db_name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "rds.db_name cannot be empty".to_string(),
            ));
        }

        if let Some(creds) = &self.credentials {
            if creds.aws_access_key_id.is_some() != creds.aws_secret_access_key.is_some() {
                return Err(ConfigError::ValidationError(
                    "s3readwrite needs both aws_access_key_id and aws_secret_access_key"
                        .to_string(),
                ));
            }
        }

        Ok(())
    }
}
