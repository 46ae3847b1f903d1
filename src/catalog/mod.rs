//! The seven operator-facing workflows. Each is one failure-isolation boundary: faults come back
//! as [`CatalogError`], while "not found" conditions are ordinary outcomes.

mod assets;
mod stats;
mod users;

pub use assets::{asset_key, download, list_assets, upload, DownloadOutcome, UploadOutcome};
pub use stats::{stats, Stats};
pub use users::{add_user, list_users};

use thiserror::Error;

use crate::object_store::ObjectStoreError;
use crate::storage::{DatabaseError, Fetched};
use crate::viewer::ViewerError;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),
    #[error("Unexpected query failure: {0}")]
    UnexpectedResult(&'static str),
    #[error("{0}")]
    ObjectStore(#[from] ObjectStoreError),
    #[error("{0}")]
    Viewer(#[from] ViewerError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Rows of a listing, or the fact that the table is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing<T> {
    Empty,
    Rows(Vec<T>),
}

/// A query that must produce data: `NoMatch` is a fault here, not a lookup miss.
fn require<T>(fetched: Fetched<T>, what: &'static str) -> Result<T, CatalogError> {
    match fetched {
        Fetched::Found(v) => Ok(v),
        Fetched::NoMatch => Err(CatalogError::UnexpectedResult(what)),
        Fetched::Failed(e) => Err(e.into()),
    }
}
