use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query},
    http::{StatusCode, Uri},
    Extension, Json,
};
use sqlx::SqlitePool;

use crate::{
    authentication::{get_jwt_token, hash_password_argon2, verify_password_argon2, AuthUser},
    data_formats::parse_tag_list,
    db_helpers::{
        delete_article_in_db, get_article_by_id_in_db, get_article_by_slug_in_db,
        get_user_by_username_in_db, insert_article_in_db, insert_user_in_db, list_articles_in_db,
        set_article_status_in_db, unique_slug_in_db, update_article_in_db, ArticleChanges,
        NewArticle,
    },
    errors::RequestError,
    models::{ArticleStatus, Role},
    uploads::{parse_article_form, remove_upload_file, upload_dir},
    ArticleListQuery, ArticleResponse, ArticleWrapper, LoginRequest, LoginResponse,
    MessageWrapper, MultipleArticlesWrapper, PublishRequest, RegisterRequest, RegisterResponse,
};

// ----------------- Helper Handlers -----------------
pub async fn api_root() -> Json<MessageWrapper> {
    Json(MessageWrapper {
        message: "API is running".to_string(),
    })
}

pub async fn alive() -> &'static str {
    "alive"
}

pub async fn not_found(uri: Uri) -> Result<(), (StatusCode, String)> {
    Err((
        StatusCode::NOT_FOUND,
        format!("URL {} provided was not found", uri),
    ))
}

// ----------------- Auth Handlers -----------------

fn valid_username(username: &str) -> bool {
    let len = username.chars().count();
    (3..=30).contains(&len)
}

fn valid_password(password: &str) -> bool {
    password.chars().count() >= 6
}

pub async fn register_user(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, RequestError> {
    let username = request.username.trim();
    if !valid_username(username) || !valid_password(&request.password) {
        return Err(RequestError::BadRequest(
            "Invalid username or password (password min 6 chars, username 3-30 chars)",
        ));
    }

    if get_user_by_username_in_db(&pool, username).await?.is_some() {
        return Err(RequestError::BadRequest("Username already exists"));
    }

    let password_hash = hash_password_argon2(request.password)
        .await
        .map_err(|_| RequestError::ServerError)?;

    // the UNIQUE constraint catches the register/register race the probe
    // above can miss
    insert_user_in_db(&pool, username, &password_hash)
        .await
        .map_err(|e| {
            if let RequestError::DatabaseError(sqlx::Error::Database(db)) = &e {
                if db.message().contains("UNIQUE constraint failed") {
                    return RequestError::BadRequest("Username already exists");
                }
            }
            e
        })?;

    tracing::info!("registered user {}", username);
    Ok(Json(RegisterResponse {
        ok: true,
        message: "User registered successfully".to_string(),
    }))
}

pub async fn login_user(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, RequestError> {
    let username = request.username.trim();
    if !valid_username(username) || !valid_password(&request.password) {
        return Err(RequestError::BadRequest(
            "Username and password are required",
        ));
    }

    let user = get_user_by_username_in_db(&pool, username)
        .await?
        .ok_or(RequestError::NotAuthorized("Invalid credentials"))?;

    let is_password_correct = verify_password_argon2(request.password, &user.password_hash)
        .await
        .map_err(|_| RequestError::ServerError)?;
    if !is_password_correct {
        tracing::warn!("failed login for {}", username);
        return Err(RequestError::NotAuthorized("Invalid credentials"));
    }

    let token = get_jwt_token(user.id, user.role).map_err(|_| RequestError::ServerError)?;
    Ok(Json(LoginResponse {
        token,
        role: user.role,
        message: "Login successful".to_string(),
    }))
}

// ----------------- Article Handlers -----------------

/// Create-time status gate: only an admin asking for `published` gets it,
/// anything else lands as a draft no matter what was requested.
fn gate_status_on_create(requested: Option<&str>, role: Role) -> &'static str {
    if role.is_admin() && requested == Some(ArticleStatus::Published.as_str()) {
        ArticleStatus::Published.as_str()
    } else {
        ArticleStatus::Draft.as_str()
    }
}

pub async fn create_article(
    Extension(pool): Extension<Arc<SqlitePool>>,
    user: AuthUser,
    multipart: Multipart,
) -> Result<Json<ArticleWrapper>, RequestError> {
    let form = parse_article_form(multipart).await?;

    let (title, content) = match (form.title, form.content) {
        (Some(title), Some(content)) if !title.is_empty() && !content.is_empty() => {
            (title, content)
        }
        _ => {
            return Err(RequestError::BadRequest("Title and content are required"));
        }
    };

    let slug = unique_slug_in_db(&pool, &title, None).await?;
    let tags = form.tags.as_deref().map(parse_tag_list).unwrap_or_default();
    let status = gate_status_on_create(form.status.as_deref(), user.role);

    let article = insert_article_in_db(
        &pool,
        NewArticle {
            title,
            content,
            slug,
            image_url: form.image_url,
            status: status.to_string(),
            tags: tags.join(","),
            author_id: Some(user.id),
        },
    )
    .await?;

    tracing::info!("article {} created as {}", article.id, article.status);
    Ok(Json(ArticleWrapper::new(
        "Article created successfully",
        ArticleResponse::new(article),
    )))
}

pub async fn list_articles(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Query(params): Query<ArticleListQuery>,
) -> Result<Json<MultipleArticlesWrapper>, RequestError> {
    // an empty ?status= means no filter, not "match the empty string"
    let status = params.status.filter(|s| !s.is_empty());
    let articles = list_articles_in_db(&pool, status).await?;
    Ok(Json(MultipleArticlesWrapper {
        articles: articles.into_iter().map(ArticleResponse::new).collect(),
    }))
}

pub async fn get_article_by_slug(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(slug): Path<String>,
) -> Result<Json<ArticleResponse>, RequestError> {
    let article = get_article_by_slug_in_db(&pool, &slug)
        .await?
        .ok_or(RequestError::NotFound("Article not found"))?;
    Ok(Json(ArticleResponse::new(article)))
}

pub async fn get_article(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(id): Path<i64>,
) -> Result<Json<ArticleResponse>, RequestError> {
    let article = get_article_by_id_in_db(&pool, id)
        .await?
        .ok_or(RequestError::NotFound("Article not found"))?;
    Ok(Json(ArticleResponse::new(article)))
}

pub async fn update_article(
    Extension(pool): Extension<Arc<SqlitePool>>,
    user: AuthUser,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<ArticleWrapper>, RequestError> {
    let form = parse_article_form(multipart).await?;

    let mut changes = ArticleChanges::default();
    if let Some(title) = form.title.filter(|t| !t.is_empty()) {
        // self-excluded probe: keeping your own slug is not a conflict
        changes.slug = Some(unique_slug_in_db(&pool, &title, Some(id)).await?);
        changes.title = Some(title);
    }
    if let Some(content) = form.content.filter(|c| !c.is_empty()) {
        changes.content = Some(content);
    }
    if let Some(url) = form.image_url {
        changes.image_url = Some(url);
    }
    if let Some(tags) = form.tags.filter(|t| !t.is_empty()) {
        changes.tags = Some(parse_tag_list(&tags).join(","));
    }
    // status applies verbatim for admins, no enum check here: only the
    // publish endpoint restricts the value set
    if let Some(status) = form.status.filter(|s| !s.is_empty()) {
        if user.role.is_admin() {
            changes.status = Some(status);
        }
    }

    update_article_in_db(&pool, id, changes).await?;

    let article = get_article_by_id_in_db(&pool, id)
        .await?
        .ok_or(RequestError::NotFound("Article not found"))?;
    Ok(Json(ArticleWrapper::new(
        "Article updated successfully",
        ArticleResponse::new(article),
    )))
}

pub async fn delete_article(
    Extension(pool): Extension<Arc<SqlitePool>>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<MessageWrapper>, RequestError> {
    let image_url = delete_article_in_db(&pool, id).await?;
    if let Some(url) = image_url {
        remove_upload_file(&upload_dir(), &url).await;
    }

    tracing::info!("article {} deleted", id);
    Ok(Json(MessageWrapper {
        message: "Article deleted successfully".to_string(),
    }))
}

pub async fn publish_article(
    Extension(pool): Extension<Arc<SqlitePool>>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(request): Json<PublishRequest>,
) -> Result<Json<ArticleWrapper>, RequestError> {
    if !user.role.is_admin() {
        return Err(RequestError::Forbidden("Access denied. Admins only."));
    }

    let status = ArticleStatus::parse(&request.status)
        .ok_or(RequestError::BadRequest("Invalid status value"))?;

    set_article_status_in_db(&pool, id, status.as_str()).await?;

    let article = get_article_by_id_in_db(&pool, id)
        .await?
        .ok_or(RequestError::NotFound("Article not found"))?;

    let message = match status {
        ArticleStatus::Published => "Article published successfully",
        ArticleStatus::Draft => "Article set to draft successfully",
    };
    Ok(Json(ArticleWrapper::new(message, ArticleResponse::new(article))))
}
