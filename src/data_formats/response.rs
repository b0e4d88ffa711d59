use serde::{Deserialize, Serialize};

use crate::models::{Article, Role};

#[derive(Deserialize, Serialize, Debug)]
pub struct RegisterResponse {
    pub ok: bool,
    pub message: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
    pub message: String,
}

/// Author projection attached to article reads: just enough for a byline.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct AuthorResponse {
    pub username: String,
    pub role: Role,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct ArticleResponse {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub slug: String,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
    pub status: String,
    pub tags: Vec<String>,
    pub author: Option<AuthorResponse>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

impl ArticleResponse {
    pub fn new(
        Article {
            id,
            title,
            content,
            slug,
            image_url,
            status,
            tags,
            created_at,
            updated_at,
            author_username,
            author_role,
            ..
        }: Article,
    ) -> Self {
        let author = match (author_username, author_role) {
            (Some(username), Some(role)) => Some(AuthorResponse { username, role }),
            _ => None,
        };
        ArticleResponse {
            id,
            title,
            content,
            slug,
            image_url,
            status,
            tags: if tags.is_empty() {
                Vec::new()
            } else {
                tags.split(',').map(|t| t.to_string()).collect()
            },
            author,
            created_at: created_at.to_string(),
            updated_at: updated_at.to_string(),
        }
    }
}
