/// Fallback token for titles that normalize to nothing.
const EMPTY_TITLE_SLUG: &str = "untitled";

/// Normalize a title into a lowercase URL-safe slug. Unicode letters and
/// digits survive as-is (lowercased); any run of other characters collapses
/// into a single `-`. Uniqueness is the caller's problem, see
/// `db_helpers::unique_slug_in_db`.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_separator = false;
    for c in title.chars() {
        if c.is_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_separator = true;
        }
    }
    if slug.is_empty() {
        slug.push_str(EMPTY_TITLE_SLUG);
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_joins_with_dashes() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("My First Post"), "my-first-post");
    }

    #[test]
    fn collapses_symbol_runs_and_trims_edges() {
        assert_eq!(slugify("  Hello --- World!!  "), "hello-world");
        assert_eq!(slugify("a/b\\c"), "a-b-c");
        assert_eq!(slugify("...leading dots"), "leading-dots");
    }

    #[test]
    fn keeps_unicode_letters() {
        assert_eq!(slugify("Grüße aus Köln"), "grüße-aus-köln");
        assert_eq!(slugify("日本語 タイトル"), "日本語-タイトル");
        assert_eq!(slugify("Привет, мир"), "привет-мир");
    }

    #[test]
    fn empty_or_symbol_only_titles_get_a_fallback() {
        assert_eq!(slugify(""), "untitled");
        assert_eq!(slugify("!!! ???"), "untitled");
        assert_eq!(slugify("   "), "untitled");
    }

    #[test]
    fn digits_survive() {
        assert_eq!(slugify("Top 10 Posts of 2024"), "top-10-posts-of-2024");
    }
}
