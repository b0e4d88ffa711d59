mod article_helpers;
mod user_helpers;

pub use article_helpers::*;
pub use user_helpers::*;

/// Builds the SET clause of a partial UPDATE: columns with `None` values
/// are left out entirely, everything else binds positionally with `?`.
struct QueryBuilder {
    query: String,
    params: Vec<String>,
    seperator: &'static str,
}

impl QueryBuilder {
    fn new(seperator: &'static str) -> Self {
        Self {
            query: String::new(),
            params: vec![],
            seperator,
        }
    }

    fn add_param(mut self, column: &str, param: Option<String>) -> Self {
        if let Some(value) = param {
            if !self.query.is_empty() {
                self.query.push_str(self.seperator);
            }
            self.query.push_str(column);
            self.query.push_str(" = ?");
            self.params.push(value);
        }
        self
    }

    fn build(self) -> (String, Vec<String>) {
        (self.query, self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::QueryBuilder;

    #[test]
    fn skips_absent_columns_and_keeps_order() {
        let (clause, params) = QueryBuilder::new(", ")
            .add_param("title", Some("a".to_string()))
            .add_param("content", None)
            .add_param("slug", Some("b".to_string()))
            .build();
        assert_eq!(clause, "title = ?, slug = ?");
        assert_eq!(params, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn all_absent_builds_nothing() {
        let (clause, params) = QueryBuilder::new(", ").add_param("title", None).build();
        assert!(clause.is_empty());
        assert!(params.is_empty());
    }
}
