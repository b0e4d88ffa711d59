use chrono::Utc;
use sqlx::{Sqlite, SqlitePool};

use crate::errors::RequestError;
use crate::models::Article;
use crate::slug::slugify;

use super::QueryBuilder;

const ARTICLE_QUERY: &str = r#"
            SELECT articles.id         AS id,
                   articles.title      AS title,
                   articles.content    AS content,
                   articles.slug       AS slug,
                   articles.image_url  AS image_url,
                   articles.status     AS status,
                   articles.tags       AS tags,
                   articles.author_id  AS author_id,
                   articles.created_at AS created_at,
                   articles.updated_at AS updated_at,
                   users.username      AS author_username,
                   users.role          AS author_role
            FROM   articles
                LEFT JOIN users
                       ON users.id = articles.author_id
     "#;

pub struct NewArticle {
    pub title: String,
    pub content: String,
    pub slug: String,
    pub image_url: Option<String>,
    pub status: String,
    pub tags: String,
    pub author_id: Option<i64>,
}

/// Column values of a partial update. `None` leaves the column untouched.
#[derive(Default)]
pub struct ArticleChanges {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub tags: Option<String>,
    pub status: Option<String>,
    pub image_url: Option<String>,
}

pub async fn list_articles_in_db(
    pool: &SqlitePool,
    status: Option<String>,
) -> Result<Vec<Article>, RequestError> {
    let mut tx = pool.begin().await?;
    let query = format!(
        "{ARTICLE_QUERY}
            WHERE  ( articles.status = $1
                    OR $1 IS NULL )
            ORDER  BY articles.created_at DESC, articles.id DESC"
    );
    let articles = sqlx::query_as::<Sqlite, Article>(&query)
        .bind(status)
        .fetch_all(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(articles)
}

pub async fn get_article_by_id_in_db(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<Article>, RequestError> {
    let mut tx = pool.begin().await?;
    let query = format!("{ARTICLE_QUERY} WHERE articles.id = $1");
    let result = sqlx::query_as::<Sqlite, Article>(&query)
        .bind(id)
        .fetch_optional(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(result)
}

pub async fn get_article_by_slug_in_db(
    pool: &SqlitePool,
    slug: &str,
) -> Result<Option<Article>, RequestError> {
    let mut tx = pool.begin().await?;
    let query = format!("{ARTICLE_QUERY} WHERE articles.slug = $1");
    let result = sqlx::query_as::<Sqlite, Article>(&query)
        .bind(slug)
        .fetch_optional(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(result)
}

/// Derive the slug for `title`, appending a millisecond timestamp when the
/// base form is already taken. On update the article's own row is excluded
/// so keeping a title never conflicts with itself. Check-then-act: the
/// UNIQUE constraint on articles.slug is the backstop for the race between
/// two concurrent creates.
pub async fn unique_slug_in_db(
    pool: &SqlitePool,
    title: &str,
    exclude_id: Option<i64>,
) -> Result<String, RequestError> {
    let slug = slugify(title);
    if slug_in_use_in_db(pool, &slug, exclude_id).await? {
        Ok(format!("{}-{}", slug, Utc::now().timestamp_millis()))
    } else {
        Ok(slug)
    }
}

async fn slug_in_use_in_db(
    pool: &SqlitePool,
    slug: &str,
    exclude_id: Option<i64>,
) -> Result<bool, RequestError> {
    let mut tx = pool.begin().await?;
    let row = sqlx::query_as::<Sqlite, (i64,)>(
        r#"
        SELECT id FROM articles WHERE slug = $1 AND ( $2 IS NULL OR id <> $2 )
        "#,
    )
    .bind(slug)
    .bind(exclude_id)
    .fetch_optional(&mut tx)
    .await?;
    tx.commit().await?;
    Ok(row.is_some())
}

pub async fn insert_article_in_db(
    pool: &SqlitePool,
    article: NewArticle,
) -> Result<Article, RequestError> {
    let mut tx = pool.begin().await?;
    let (id,) = sqlx::query_as::<Sqlite, (i64,)>(
        r#"
        INSERT INTO articles (title, content, slug, image_url, status, tags, author_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id
        "#,
    )
    .bind(&article.title)
    .bind(&article.content)
    .bind(&article.slug)
    .bind(&article.image_url)
    .bind(&article.status)
    .bind(&article.tags)
    .bind(article.author_id)
    .fetch_one(&mut tx)
    .await?;
    tx.commit().await?;

    match get_article_by_id_in_db(pool, id).await? {
        Some(article) => Ok(article),
        None => Err(RequestError::ServerError),
    }
}

pub async fn update_article_in_db(
    pool: &SqlitePool,
    id: i64,
    changes: ArticleChanges,
) -> Result<(), RequestError> {
    let mut tx = pool.begin().await?;
    let (set_clause, params) = QueryBuilder::new(", ")
        .add_param("title", changes.title)
        .add_param("slug", changes.slug)
        .add_param("content", changes.content)
        .add_param("tags", changes.tags)
        .add_param("status", changes.status)
        .add_param("image_url", changes.image_url)
        .build();

    let query = if set_clause.is_empty() {
        "UPDATE articles SET updated_at = CURRENT_TIMESTAMP WHERE id = ?".to_string()
    } else {
        format!("UPDATE articles SET {set_clause}, updated_at = CURRENT_TIMESTAMP WHERE id = ?")
    };

    let mut query = sqlx::query(&query);
    for param in params {
        query = query.bind(param);
    }
    let result = query.bind(id).execute(&mut tx).await?;
    tx.commit().await?;

    if result.rows_affected() == 0 {
        return Err(RequestError::NotFound("Article not found"));
    }
    Ok(())
}

pub async fn set_article_status_in_db(
    pool: &SqlitePool,
    id: i64,
    status: &str,
) -> Result<(), RequestError> {
    let mut tx = pool.begin().await?;
    let result =
        sqlx::query("UPDATE articles SET status = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2")
            .bind(status)
            .bind(id)
            .execute(&mut tx)
            .await?;
    tx.commit().await?;

    if result.rows_affected() == 0 {
        return Err(RequestError::NotFound("Article not found"));
    }
    Ok(())
}

/// Delete by id, handing back the stored image reference (if any) so the
/// caller can sweep the upload file.
pub async fn delete_article_in_db(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<String>, RequestError> {
    let mut tx = pool.begin().await?;
    let row = sqlx::query_as::<Sqlite, (Option<String>,)>(
        r#"
        DELETE FROM articles WHERE id = $1 RETURNING image_url
        "#,
    )
    .bind(id)
    .fetch_optional(&mut tx)
    .await?;
    tx.commit().await?;

    match row {
        Some((image_url,)) => Ok(image_url),
        None => Err(RequestError::NotFound("Article not found")),
    }
}
