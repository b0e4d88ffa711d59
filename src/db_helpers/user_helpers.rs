use sqlx::{Sqlite, SqlitePool};

use crate::errors::RequestError;
use crate::models::User;

pub async fn get_user_by_username_in_db(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<User>, RequestError> {
    let mut tx = pool.begin().await?;
    let result = sqlx::query_as::<Sqlite, User>(
        r#"
        SELECT id, username, password_hash, role, created_at FROM users WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(&mut tx)
    .await?;
    tx.commit().await?;
    Ok(result)
}

/// Registration path. Role is always `editor`; there is no self-service
/// route to admin.
pub async fn insert_user_in_db(
    pool: &SqlitePool,
    username: &str,
    password_hash: &str,
) -> Result<i64, RequestError> {
    let mut tx = pool.begin().await?;
    let (id,) = sqlx::query_as::<Sqlite, (i64,)>(
        r#"
        INSERT INTO users (username, password_hash, role)
        VALUES ($1, $2, 'editor')
        RETURNING id
        "#,
    )
    .bind(username)
    .bind(password_hash)
    .fetch_one(&mut tx)
    .await?;
    tx.commit().await?;
    Ok(id)
}
