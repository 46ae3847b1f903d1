use super::{require, CatalogError, Listing};
use crate::storage::models::UserRecord;
use crate::storage::schema::{INSERT_USER, LIST_USERS};
use crate::storage::Fetched;
use crate::AppState;

/// All users, newest first.
pub async fn list_users(state: &AppState) -> Result<Listing<UserRecord>, CatalogError> {
    match state.db.fetch_all(LIST_USERS, &[]).await {
        Fetched::Found(rows) => {
            let users = rows
                .iter()
                .map(UserRecord::try_from)
                .collect::<Result<Vec<_>, _>>()?;
            tracing::debug!(count = users.len(), "Listed users");
            Ok(Listing::Rows(users))
        }
        Fetched::NoMatch => Ok(Listing::Empty),
        Fetched::Failed(e) => Err(e.into()),
    }
}

/// Create a user with a fresh bucket folder and return it with its assigned id.
/// Emails are not checked for duplicates.
pub async fn add_user(
    state: &AppState,
    email: &str,
    last_name: &str,
    first_name: &str,
) -> Result<UserRecord, CatalogError> {
    let bucket_folder = uuid::Uuid::new_v4().to_string();

    state
        .db
        .execute(
            INSERT_USER,
            &[
                email.into(),
                last_name.into(),
                first_name.into(),
                bucket_folder.as_str().into(),
            ],
        )
        .await?;

    let row = require(
        state.db.fetch_one(state.db.last_insert_id_sql(), &[]).await,
        "no id generated for new user",
    )?;
    let user_id = row.get_int(0)?;

    tracing::info!(user_id, %bucket_folder, "Added user");
    Ok(UserRecord {
        user_id,
        email: email.to_string(),
        last_name: last_name.to_string(),
        first_name: first_name.to_string(),
        bucket_folder,
    })
}
