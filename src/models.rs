use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Access level carried by every user and every issued token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Editor,
}

impl Role {
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// The two statuses the publish endpoint accepts. The general update path
/// stores status as raw text and never goes through this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleStatus {
    Draft,
    Published,
}

impl ArticleStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ArticleStatus::Draft => "draft",
            ArticleStatus::Published => "published",
        }
    }

    pub fn parse(value: &str) -> Option<ArticleStatus> {
        match value {
            "draft" => Some(ArticleStatus::Draft),
            "published" => Some(ArticleStatus::Published),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: NaiveDateTime,
}

/// Article row joined with its author projection. `author_*` columns are
/// NULL when the row has no author.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub slug: String,
    pub image_url: Option<String>,
    pub status: String,
    pub tags: String,
    pub author_id: Option<i64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub author_username: Option<String>,
    pub author_role: Option<Role>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_known_values_only() {
        assert_eq!(ArticleStatus::parse("draft"), Some(ArticleStatus::Draft));
        assert_eq!(
            ArticleStatus::parse("published"),
            Some(ArticleStatus::Published)
        );
        assert_eq!(ArticleStatus::parse("archived"), None);
        assert_eq!(ArticleStatus::parse(""), None);
        assert_eq!(ArticleStatus::parse("Published"), None);
    }
}
