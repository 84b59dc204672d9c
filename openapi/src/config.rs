use std::fmt::{Debug, Formatter};

use crate::constants::*;
use baijiayun_core::{utils::Redact, Context};

/// Config carries the partner credentials and endpoint settings.
#[derive(Clone, Default)]
pub struct Config {
    /// `partner_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`BAIJIAYUN_PARTNER_ID`]
    pub partner_id: Option<String>,
    /// `secret_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`BAIJIAYUN_SECRET_KEY`]
    ///
    /// The long-lived partner secret. It is only ever transmitted to the
    /// key-issuance endpoint.
    pub secret_key: Option<String>,
    /// `private_domain` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`BAIJIAYUN_PRIVATE_DOMAIN`]
    ///
    /// The per-partner subdomain, `{private_domain}.at.baijiayun.com`.
    pub private_domain: Option<String>,
    /// Namespace prefix for cache keys. Defaults to `partner_id`, which
    /// keeps clients for different partners apart in a shared cache.
    pub cache_prefix: Option<String>,
}

impl Config {
    /// Create a new Config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set partner_id.
    pub fn with_partner_id(mut self, partner_id: impl Into<String>) -> Self {
        self.partner_id = Some(partner_id.into());
        self
    }

    /// Set secret_key.
    pub fn with_secret_key(mut self, secret_key: impl Into<String>) -> Self {
        self.secret_key = Some(secret_key.into());
        self
    }

    /// Set private_domain.
    pub fn with_private_domain(mut self, private_domain: impl Into<String>) -> Self {
        self.private_domain = Some(private_domain.into());
        self
    }

    /// Set cache_prefix.
    pub fn with_cache_prefix(mut self, cache_prefix: impl Into<String>) -> Self {
        self.cache_prefix = Some(cache_prefix.into());
        self
    }

    /// Load config from env.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx.env_var(BAIJIAYUN_PARTNER_ID) {
            self.partner_id.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(BAIJIAYUN_SECRET_KEY) {
            self.secret_key.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(BAIJIAYUN_PRIVATE_DOMAIN) {
            self.private_domain.get_or_insert(v);
        }

        self
    }

    /// API base URL, without a trailing slash.
    pub fn endpoint(&self) -> Option<String> {
        self.private_domain
            .as_ref()
            .map(|domain| format!("https://{domain}.at.baijiayun.com"))
    }

    /// Cache namespace, falling back to `partner_id`.
    pub fn cache_prefix(&self) -> Option<&str> {
        self.cache_prefix
            .as_deref()
            .or(self.partner_id.as_deref())
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("partner_id", &self.partner_id)
            .field("secret_key", &self.secret_key.as_ref().map(Redact::from))
            .field("private_domain", &self.private_domain)
            .field("cache_prefix", &self.cache_prefix)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use baijiayun_core::StaticEnv;
    use std::collections::HashMap;

    #[test]
    fn test_from_env() {
        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::from([
                (BAIJIAYUN_PARTNER_ID.to_string(), "7201963".to_string()),
                (BAIJIAYUN_SECRET_KEY.to_string(), "secret".to_string()),
                (BAIJIAYUN_PRIVATE_DOMAIN.to_string(), "demo".to_string()),
            ]),
        });

        let config = Config::new().from_env(&ctx);
        assert_eq!(config.partner_id.as_deref(), Some("7201963"));
        assert_eq!(config.secret_key.as_deref(), Some("secret"));
        assert_eq!(
            config.endpoint().as_deref(),
            Some("https://demo.at.baijiayun.com")
        );
        assert_eq!(config.cache_prefix(), Some("7201963"));
    }

    #[test]
    fn test_explicit_values_win_over_env() {
        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::from([(BAIJIAYUN_PARTNER_ID.to_string(), "from-env".to_string())]),
        });

        let config = Config::new().with_partner_id("explicit").from_env(&ctx);
        assert_eq!(config.partner_id.as_deref(), Some("explicit"));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = Config::new().with_secret_key("super-secret-key-material");
        let s = format!("{config:?}");
        assert!(!s.contains("super-secret-key-material"));
    }
}
