use std::time::Duration;

// Env names the config loader reads.
pub const BAIJIAYUN_PARTNER_ID: &str = "BAIJIAYUN_PARTNER_ID";
pub const BAIJIAYUN_SECRET_KEY: &str = "BAIJIAYUN_SECRET_KEY";
pub const BAIJIAYUN_PRIVATE_DOMAIN: &str = "BAIJIAYUN_PRIVATE_DOMAIN";

/// Key-issuance endpoint. The only call that goes out unsigned.
pub const CREATE_KEY_PATH: &str = "/openapi/partner/createkey";

/// Name of the cached credential; the full cache key is `{prefix}:{name}`.
pub const PARTNER_KEY_CACHE_NAME: &str = "partner_key";

/// The platform issues partner keys with a server-assigned lifetime; the
/// local cache keeps them for this fixed window.
pub const PARTNER_KEY_TTL: Duration = Duration::from_secs(7200);

/// Field name of the key term in the string to sign.
pub const PARTNER_KEY_FIELD: &str = "partner_key";

/// Default request field carrying the Unix timestamp.
pub const TIMESTAMP_FIELD: &str = "timestamp";

/// Default request field carrying the signature.
pub const SIGN_FIELD: &str = "sign";

/// Default callback timestamp tolerance in seconds.
pub const CALLBACK_TOLERANCE_SECS: i64 = 300;
