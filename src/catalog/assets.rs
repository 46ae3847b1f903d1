use std::path::{Path, PathBuf};

use super::{require, CatalogError, Listing};
use crate::storage::models::{AssetLocation, AssetRecord};
use crate::storage::schema::{FIND_ASSET, FIND_USER_FOLDER, INSERT_ASSET, LIST_ASSETS};
use crate::storage::Fetched;
use crate::AppState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    NoSuchAsset(i64),
    Saved { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    MissingLocalFile(PathBuf),
    NoSuchUser(i64),
    Uploaded { asset_id: i64, bucket_key: String },
}

/// Object key for a new upload. The `.jpg` extension is fixed whatever the file type.
pub fn asset_key(bucket_folder: &str) -> String {
    format!("{bucket_folder}/{}.jpg", uuid::Uuid::new_v4())
}

/// All assets, newest first.
pub async fn list_assets(state: &AppState) -> Result<Listing<AssetRecord>, CatalogError> {
    match state.db.fetch_all(LIST_ASSETS, &[]).await {
        Fetched::Found(rows) => {
            let assets = rows
                .iter()
                .map(AssetRecord::try_from)
                .collect::<Result<Vec<_>, _>>()?;
            tracing::debug!(count = assets.len(), "Listed assets");
            Ok(Listing::Rows(assets))
        }
        Fetched::NoMatch => Ok(Listing::Empty),
        Fetched::Failed(e) => Err(e.into()),
    }
}

/// Fetch an asset's bytes and save them under its original name in the download directory,
/// replacing any file already there. With `display`, the saved file is then shown.
pub async fn download(
    state: &AppState,
    asset_id: i64,
    display: bool,
) -> Result<DownloadOutcome, CatalogError> {
    let location = match state.db.fetch_one(FIND_ASSET, &[asset_id.into()]).await {
        Fetched::Found(row) => AssetLocation::try_from(&row)?,
        Fetched::NoMatch => return Ok(DownloadOutcome::NoSuchAsset(asset_id)),
        Fetched::Failed(e) => return Err(e.into()),
    };

    let temp_path = state
        .object_store
        .download_file(&location.bucket_key)
        .await?;
    let path = state.download_dir.join(&location.asset_name);
    move_file(&temp_path, &path).await?;
    tracing::info!(asset_id, key = %location.bucket_key, path = %path.display(), "Downloaded asset");

    if display {
        state.viewer.show(&path)?;
    }

    Ok(DownloadOutcome::Saved { path })
}

/// Store a local file for `user_id`: the blob is written first, then the asset row.
/// A missing file or unknown user stops before any write.
pub async fn upload(
    state: &AppState,
    local_file: &Path,
    user_id: i64,
) -> Result<UploadOutcome, CatalogError> {
    if !local_file.exists() {
        return Ok(UploadOutcome::MissingLocalFile(local_file.to_path_buf()));
    }

    let bucket_folder = match state.db.fetch_one(FIND_USER_FOLDER, &[user_id.into()]).await {
        Fetched::Found(row) => row.get_text(1)?,
        Fetched::NoMatch => return Ok(UploadOutcome::NoSuchUser(user_id)),
        Fetched::Failed(e) => return Err(e.into()),
    };

    let key = asset_key(&bucket_folder);
    let bucket_key = state.object_store.upload_file(local_file, &key).await?;

    let asset_name = local_file.to_string_lossy().into_owned();
    state
        .db
        .execute(
            INSERT_ASSET,
            &[user_id.into(), asset_name.into(), bucket_key.as_str().into()],
        )
        .await?;

    let row = require(
        state.db.fetch_one(state.db.last_insert_id_sql(), &[]).await,
        "no id generated for new asset",
    )?;
    let asset_id = row.get_int(0)?;

    tracing::info!(asset_id, user_id, key = %bucket_key, "Uploaded asset");
    Ok(UploadOutcome::Uploaded {
        asset_id,
        bucket_key,
    })
}

/// Rename, falling back to copy + remove when the two paths are on different filesystems.
async fn move_file(from: &Path, to: &Path) -> std::io::Result<()> {
    if tokio::fs::rename(from, to).await.is_ok() {
        return Ok(());
    }
    let copied = tokio::fs::copy(from, to).await;
    let _ = tokio::fs::remove_file(from).await;
    copied.map(|_| ())
}
