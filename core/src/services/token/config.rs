//! Configuration for the token codec and rotation service.

/// Signing secrets and lifetimes for both token kinds.
///
/// The two secrets are deliberately independent: a leaked access-signing key
/// cannot be used to forge refresh tokens, and vice versa.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Secret for signing and verifying access tokens
    pub access_secret: String,
    /// Secret for signing and verifying refresh tokens
    pub refresh_secret: String,
    /// Access token lifetime in seconds (short: minutes)
    pub access_ttl_secs: i64,
    /// Refresh token lifetime in seconds (long: days); also the session TTL
    pub refresh_ttl_secs: i64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            access_secret: "development-access-secret-change-in-production".to_string(),
            refresh_secret: "development-refresh-secret-change-in-production".to_string(),
            access_ttl_secs: 900,      // 15 minutes
            refresh_ttl_secs: 604_800, // 7 days
        }
    }
}

impl TokenConfig {
    pub fn new(access_secret: impl Into<String>, refresh_secret: impl Into<String>) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            ..Default::default()
        }
    }

    /// Set access token lifetime in minutes.
    pub fn with_access_ttl_minutes(mut self, minutes: i64) -> Self {
        self.access_ttl_secs = minutes * 60;
        self
    }

    /// Set refresh token lifetime in days.
    pub fn with_refresh_ttl_days(mut self, days: i64) -> Self {
        self.refresh_ttl_secs = days * 86_400;
        self
    }

    /// Check if either default secret is still in place (security warning).
    pub fn is_using_default_secrets(&self) -> bool {
        let defaults = TokenConfig::default();
        self.access_secret == defaults.access_secret
            || self.refresh_secret == defaults.refresh_secret
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_helpers() {
        let config = TokenConfig::new("a", "r")
            .with_access_ttl_minutes(5)
            .with_refresh_ttl_days(30);

        assert_eq!(config.access_ttl_secs, 300);
        assert_eq!(config.refresh_ttl_secs, 30 * 86_400);
        assert!(!config.is_using_default_secrets());
    }

    #[test]
    fn test_default_secret_detection() {
        assert!(TokenConfig::default().is_using_default_secrets());
    }
}
