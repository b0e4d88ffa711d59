mod authentication;
mod data_formats;
mod db_helpers;
mod errors;
mod handlers;
mod models;
mod slug;
mod uploads;

use anyhow::Context;
pub use anyhow::Result;
use axum::http::StatusCode;
use axum::{routing::*, Extension, Json, Router};
pub use data_formats::*;
use handlers::*;
pub use models::{Article, ArticleStatus, Role};
pub use slug::slugify;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::{
    net::{SocketAddr, TcpListener},
    sync::Arc,
};
use tower_http::services::ServeDir;

pub type JsonResponse<T> = (StatusCode, Json<T>);

pub async fn run_app(app: Router, address: SocketAddr) -> Result<()> {
    let db = init_db().await?;
    run_app_with_db(app, db, address).await
}

pub async fn run_app_with_db(app: Router, db: SqlitePool, address: SocketAddr) -> Result<()> {
    let app = app.layer(Extension(Arc::new(db)));
    axum::Server::bind(&address)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}

pub async fn init_db() -> Result<SqlitePool> {
    let db_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    init_db_with_url(&db_url).await
}

pub async fn init_db_with_url(db_url: &str) -> Result<SqlitePool> {
    if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
        tracing::info!("creating database {}", db_url);
        Sqlite::create_database(db_url)
            .await
            .context("Failed to create database")?;
    }
    let pool = SqlitePool::connect(db_url).await?;
    tracing::info!("running migrations");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    Ok(pool)
}

pub fn get_random_free_port() -> (u16, SocketAddr) {
    let listener = TcpListener::bind("localhost:0").unwrap();
    match listener.local_addr() {
        Ok(addr) => (addr.port(), addr),
        Err(_) => panic!("Could not get a free port"),
    }
}

pub fn make_router() -> Router {
    Router::new()
        .route("/", get(api_root))
        .route("/check_health", get(alive))
        .route("/auth/register", post(register_user))
        .route("/auth/login", post(login_user))
        .route("/articles", post(create_article).get(list_articles))
        .route("/articles/slug/:slug", get(get_article_by_slug))
        .route(
            "/articles/:id",
            get(get_article).put(update_article).delete(delete_article),
        )
        .route("/articles/:id/publish", patch(publish_article))
        .nest_service("/uploads", ServeDir::new(uploads::upload_dir()))
        .fallback(not_found)
}
