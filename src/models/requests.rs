//! Request DTOs for the diagnostics API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;

/// Request body for PUT /optimistic
#[derive(Debug, Clone, Deserialize)]
pub struct OptimisticRequest {
    /// Target store name (`catalog` or `user`)
    pub store: String,
    pub key: String,
    /// Value to expose until the next fetch or TTL lapse
    pub value: serde_json::Value,
    /// Optional TTL in seconds
    #[serde(default)]
    pub ttl: Option<u64>,
}

impl OptimisticRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        if self.ttl == Some(0) {
            return Some("TTL must be positive".to_string());
        }
        None
    }
}

/// Query string for GET /fetch/:store/*key
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FetchQuery {
    /// Bypass the cache-hit check
    #[serde(default)]
    pub refresh: bool,
    /// TTL in seconds for the fetched entry
    #[serde(default)]
    pub ttl: Option<u64>,
}

/// Request body for POST /preload
#[derive(Debug, Clone, Deserialize)]
pub struct PreloadRequest {
    pub url: String,
}

impl PreloadRequest {
    pub fn validate(&self) -> Option<String> {
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Some(format!("Unsupported asset URL: {}", self.url));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimistic_request_deserialize() {
        let json = r#"{"store": "user", "key": "user-lists:42", "value": ["watchlist"]}"#;
        let req: OptimisticRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.store, "user");
        assert_eq!(req.key, "user-lists:42");
        assert_eq!(req.value[0], "watchlist");
        assert!(req.ttl.is_none());
        assert!(req.validate().is_none());
    }

    #[test]
    fn test_validate_empty_key() {
        let json = r#"{"store": "user", "key": "", "value": 1}"#;
        let req: OptimisticRequest = serde_json::from_str(json).unwrap();
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_validate_zero_ttl() {
        let json = r#"{"store": "user", "key": "k", "value": 1, "ttl": 0}"#;
        let req: OptimisticRequest = serde_json::from_str(json).unwrap();
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_fetch_query_defaults() {
        let query: FetchQuery = serde_json::from_str("{}").unwrap();
        assert!(!query.refresh);
        assert!(query.ttl.is_none());
    }

    #[test]
    fn test_preload_request_validate() {
        let ok = PreloadRequest {
            url: "https://images.example.org/a.jpg".to_string(),
        };
        let bad = PreloadRequest {
            url: "file:///etc/passwd".to_string(),
        };
        assert!(ok.validate().is_none());
        assert!(bad.validate().is_some());
    }
}
