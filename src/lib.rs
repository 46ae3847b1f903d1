//! photoapp - an interactive photo catalog
//!
//! Photos live in an object store (Amazon S3, or a local directory for development), and
//! users and assets are recorded in a relational database (MySQL on RDS, or SQLite):
//! - Blob storage behind the [`object_store::ObjectStore`] trait
//! - Parameterized SQL behind the [`storage::DataAccess`] trait
//! - Seven catalog workflows driven by a numeric menu shell

pub mod catalog;
pub mod config;
pub mod object_store;
pub mod shell;
pub mod storage;
pub mod viewer;

use std::path::PathBuf;
use std::sync::Arc;

use config::Config;
use storage::DataAccess;

/// Handles opened once at startup and shared by every workflow for the whole session
pub struct AppState {
    pub config: Config,
    pub db: Arc<dyn DataAccess>,
    pub object_store: Arc<dyn object_store::ObjectStore>,
    pub viewer: Arc<dyn viewer::ImageViewer>,
    /// Downloads are saved here under their original asset names
    pub download_dir: PathBuf,
}
