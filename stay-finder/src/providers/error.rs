//! Provider error types.

/// Errors from external collaborators (transit data, lodging, walking
/// routes, snapshots on disk).
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body did not have the expected shape
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Credentials or endpoint missing
    #[error("not configured: {0}")]
    NotConfigured(String),

    /// Rate limited by the API
    #[error("rate limited")]
    RateLimited,

    /// Reading or writing local data failed
    #[error("IO error: {message}")]
    Io { message: String },
}

impl ProviderError {
    /// Build a `Json` error from a serde error, keeping a prefix of the body
    /// for diagnostics.
    pub(crate) fn json(err: serde_json::Error, body: &str) -> Self {
        let excerpt: String = body.chars().take(200).collect();
        ProviderError::Json {
            message: format!("{err} (body: {excerpt})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ProviderError::Api {
            status: 503,
            message: "unavailable".into(),
        };
        assert_eq!(err.to_string(), "API error 503: unavailable");

        let err = ProviderError::NotConfigured("ODPT_API_KEY".into());
        assert_eq!(err.to_string(), "not configured: ODPT_API_KEY");

        assert_eq!(ProviderError::RateLimited.to_string(), "rate limited");
    }

    #[test]
    fn json_error_keeps_body_excerpt() {
        let body = "{not json";
        let err = serde_json::from_str::<serde_json::Value>(body).unwrap_err();
        let err = ProviderError::json(err, body);
        assert!(err.to_string().contains("{not json"));
    }
}
