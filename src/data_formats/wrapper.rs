use serde::{Deserialize, Serialize};

use super::response::ArticleResponse;

#[derive(Debug, Deserialize, Serialize)]
pub struct ArticleWrapper {
    pub message: String,
    pub article: ArticleResponse,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MultipleArticlesWrapper {
    pub articles: Vec<ArticleResponse>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MessageWrapper {
    pub message: String,
}

impl ArticleWrapper {
    pub fn new(message: &str, article: ArticleResponse) -> ArticleWrapper {
        ArticleWrapper {
            message: message.to_string(),
            article,
        }
    }
}
