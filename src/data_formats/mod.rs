mod request;
mod response;
mod wrapper;

pub use request::*;
pub use response::*;
pub use wrapper::*;

use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug)]
pub struct ArticleListQuery {
    #[serde(default)]
    pub status: Option<String>,
}

/// Split a comma-separated tag string into a trimmed, ordered list. The
/// empty string maps to an empty list; interior empty entries are kept
/// as-is ("a,,b" stays three entries).
pub fn parse_tag_list(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(',').map(|t| t.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_an_empty_list() {
        assert!(parse_tag_list("").is_empty());
    }

    #[test]
    fn entries_are_trimmed_in_order() {
        assert_eq!(
            parse_tag_list(" rust , web,  cms"),
            vec!["rust", "web", "cms"]
        );
    }

    #[test]
    fn interior_empties_are_kept() {
        assert_eq!(parse_tag_list("a,,b"), vec!["a", "", "b"]);
    }
}
