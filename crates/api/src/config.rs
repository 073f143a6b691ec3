//! Runtime settings for the HTTP layer.

use chrono::Duration;

/// Settings the CLI resolves from flags and environment and hands to
/// [`crate::serve`].
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// HS256 secret used to sign and verify access tokens.
    pub jwt_secret: String,
    /// Lifetime of an access token.
    pub token_ttl: Duration,
}

impl ApiConfig {
    pub fn new(jwt_secret: impl Into<String>, token_ttl_hours: i64) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl: Duration::hours(token_ttl_hours),
        }
    }
}
