use super::db::{DatabaseError, Row};

/// A catalog user. `bucket_folder` is the key prefix of every asset the user owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub user_id: i64,
    pub email: String,
    pub last_name: String,
    pub first_name: String,
    pub bucket_folder: String,
}

/// Metadata of one uploaded photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRecord {
    pub asset_id: i64,
    pub user_id: i64,
    /// Local filename as given at upload time
    pub asset_name: String,
    pub bucket_key: String,
}

/// Location of an asset's bytes, as needed by a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLocation {
    pub asset_name: String,
    pub bucket_key: String,
}

impl TryFrom<&Row> for UserRecord {
    type Error = DatabaseError;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: row.get_int(0)?,
            email: row.get_text(1)?,
            last_name: row.get_text(2)?,
            first_name: row.get_text(3)?,
            bucket_folder: row.get_text(4)?,
        })
    }
}

impl TryFrom<&Row> for AssetRecord {
    type Error = DatabaseError;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(Self {
            asset_id: row.get_int(0)?,
            user_id: row.get_int(1)?,
            asset_name: row.get_text(2)?,
            bucket_key: row.get_text(3)?,
        })
    }
}

impl TryFrom<&Row> for AssetLocation {
    type Error = DatabaseError;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(Self {
            asset_name: row.get_text(0)?,
            bucket_key: row.get_text(1)?,
        })
    }
}
