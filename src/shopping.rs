//! Purchase links for missing ingredients.

use url::form_urlencoded;

/// Amazon Whole Foods search, `{query}` is replaced by the encoded name
pub const WHOLE_FOODS_SEARCH: &str = "https://www.amazon.com/s?k={query}&i=wholefoods";

/// Build an Amazon Whole Foods search URL for the given ingredient
pub fn whole_foods_url(ingredient_name: &str) -> String {
    search_url(WHOLE_FOODS_SEARCH, ingredient_name)
}

/// Substitute the form-encoded, trimmed name into a `{query}` template.
///
/// An empty name yields an empty query rather than an error.
pub fn search_url(template: &str, ingredient_name: &str) -> String {
    let query: String = form_urlencoded::byte_serialize(ingredient_name.trim().as_bytes()).collect();
    template.replace("{query}", &query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_foods_url() {
        assert_eq!(
            whole_foods_url("chicken breast"),
            "https://www.amazon.com/s?k=chicken+breast&i=wholefoods"
        );
    }

    #[test]
    fn test_url_is_trimmed_and_encoded() {
        assert_eq!(
            whole_foods_url("  salt & pepper "),
            "https://www.amazon.com/s?k=salt+%26+pepper&i=wholefoods"
        );
        assert_eq!(
            whole_foods_url("crème fraîche"),
            "https://www.amazon.com/s?k=cr%C3%A8me+fra%C3%AEche&i=wholefoods"
        );
    }

    #[test]
    fn test_empty_name_gives_empty_query() {
        assert_eq!(
            whole_foods_url("   "),
            "https://www.amazon.com/s?k=&i=wholefoods"
        );
    }

    #[test]
    fn test_custom_template() {
        assert_eq!(
            search_url("https://shop.example/search?q={query}", "olive oil"),
            "https://shop.example/search?q=olive+oil"
        );
    }
}
