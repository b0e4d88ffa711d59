use serde::{Deserialize, Serialize};

// ----------------- Auth Requests -----------------

#[derive(Deserialize, Serialize, Debug)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

// ----------------- Article Requests -----------------

/// Text and file fields of the multipart article form. Create and update
/// share the shape; create additionally requires title and content to be
/// present and non-empty. Parsed in `uploads::parse_article_form`, which
/// stores the image field on disk as a side effect.
#[derive(Debug, Default)]
pub struct ArticleForm {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<String>,
    pub status: Option<String>,
    /// `/uploads/<filename>` reference of an image stored while parsing.
    pub image_url: Option<String>,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct PublishRequest {
    pub status: String,
}
