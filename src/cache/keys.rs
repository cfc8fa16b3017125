//! Cache key builders.
//!
//! Keys follow a `scope:entity:id` convention so that a whole scope can be
//! purged with one `invalidate_pattern` call on its prefix.
//!
//! These are the key vocabulary offered to callers of the library; the
//! diagnostics service takes raw keys from the request path instead.

/// Per-user list collection, e.g. `user-lists:42`.
pub fn user_lists(user_id: &str) -> String {
    format!("user-lists:{user_id}")
}

/// Items of one user list, e.g. `user-list-items:42:watchlist`.
pub fn user_list_items(user_id: &str, list_id: &str) -> String {
    format!("user-list-items:{user_id}:{list_id}")
}

/// Catalog search results, e.g. `api-search:anime:frieren`.
pub fn api_search(category: &str, query: &str) -> String {
    format!("api-search:{category}:{}", query.trim().to_lowercase())
}

/// Catalog details for one title, e.g. `api-details:movie:603`.
pub fn api_details(category: &str, id: &str) -> String {
    format!("api-details:{category}:{id}")
}

/// Profile of one user, e.g. `profile:42`.
pub fn profile(user_id: &str) -> String {
    format!("profile:{user_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_shapes() {
        assert_eq!(user_lists("42"), "user-lists:42");
        assert_eq!(user_list_items("42", "fav"), "user-list-items:42:fav");
        assert_eq!(api_details("movie", "603"), "api-details:movie:603");
        assert_eq!(profile("7"), "profile:7");
    }

    #[test]
    fn test_search_query_is_normalized() {
        assert_eq!(api_search("anime", "  Frieren "), "api-search:anime:frieren");
    }
}
