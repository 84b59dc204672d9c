use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::Method;
use log::debug;
use serde::Deserialize;

use crate::constants::*;
use crate::{Config, PartnerKey};
use baijiayun_core::time::now_unix;
use baijiayun_core::utils::Redact;
use baijiayun_core::{Context, Error, KeyValueCache, ProvideCredential, Result};

/// PartnerKeyProvider supplies a currently-valid partner key.
///
/// The key lives in a [`KeyValueCache`] under `{prefix}:partner_key`. Reads
/// within the TTL return the cached key without touching the network; a miss
/// (or forced regeneration) issues an unsigned bootstrap request to the
/// key-issuance endpoint and overwrites the cache entry.
///
/// The check-fetch-store sequence is not serialized: concurrent callers that
/// both observe a miss will both fetch. Both fetches yield valid keys from
/// the platform, so the race only costs a duplicate request.
pub struct PartnerKeyProvider {
    partner_id: String,
    secret_key: String,
    endpoint: String,
    cache: Arc<dyn KeyValueCache>,
    cache_key: String,
}

impl PartnerKeyProvider {
    /// Create a provider from config and a cache backend.
    ///
    /// Fails with a config error when `partner_id`, `secret_key` or
    /// `private_domain` is missing.
    pub fn new(config: &Config, cache: Arc<dyn KeyValueCache>) -> Result<Self> {
        let partner_id = config
            .partner_id
            .clone()
            .ok_or_else(|| Error::config_invalid("partner_id is required"))?;
        let secret_key = config
            .secret_key
            .clone()
            .ok_or_else(|| Error::config_invalid("secret_key is required"))?;
        let endpoint = config
            .endpoint()
            .ok_or_else(|| Error::config_invalid("private_domain is required"))?;

        let prefix = config
            .cache_prefix
            .clone()
            .unwrap_or_else(|| partner_id.clone());

        Ok(Self {
            partner_id,
            secret_key,
            endpoint,
            cache,
            cache_key: format!("{prefix}:{PARTNER_KEY_CACHE_NAME}"),
        })
    }

    /// The composed cache key this provider stores the partner key under.
    pub fn cache_key(&self) -> &str {
        &self.cache_key
    }

    /// Force key rotation: always calls the issuance endpoint with the
    /// `regenerate` flag set and overwrites the cached value.
    pub async fn regenerate(&self, ctx: &Context) -> Result<PartnerKey> {
        self.fetch(ctx, true).await
    }

    /// Drop the cached key so the next read fetches a fresh one.
    pub async fn invalidate(&self) -> Result<()> {
        self.cache.delete(&self.cache_key).await
    }

    /// The credential-bootstrapping exception: this single request carries no
    /// signature, since the partner key it would be signed with does not
    /// exist yet.
    async fn fetch(&self, ctx: &Context, regenerate: bool) -> Result<PartnerKey> {
        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("partner_id", &self.partner_id)
            .append_pair("secret_key", &self.secret_key)
            .append_pair("regenerate", if regenerate { "1" } else { "0" })
            .append_pair("timestamp", &now_unix().to_string())
            .finish();

        let url = format!("{}{CREATE_KEY_PATH}", self.endpoint);
        let req = http::Request::builder()
            .method(Method::POST)
            .uri(&url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Bytes::from(body))
            .map_err(|e| {
                Error::request_invalid("failed to build key issuance request")
                    .with_source(e)
                    .with_context(format!("url: {url}"))
            })?;

        let resp = ctx.http_send_as_string(req).await.map_err(|e| {
            Error::credential_issuance("failed to reach key issuance endpoint")
                .with_source(e)
                .with_context(format!("url: {url}"))
        })?;

        if resp.status() != http::StatusCode::OK {
            return Err(
                Error::credential_issuance("key issuance endpoint answered with error")
                    .with_context(format!("status: {}", resp.status()))
                    .with_context(format!("body: {}", resp.body())),
            );
        }

        let content = resp.into_body();
        let resp: CreateKeyResponse = serde_json::from_str(&content).map_err(|e| {
            Error::credential_issuance("failed to parse key issuance response")
                .with_source(e)
                .with_context(format!("response_length: {}", content.len()))
        })?;

        if resp.code != 0 {
            return Err(Error::credential_issuance(format!(
                "key issuance rejected: [{}] {}",
                resp.code, resp.msg
            )));
        }

        // Error responses carry `"data": []`, so dig the key out by hand
        // instead of typing the payload.
        let partner_key = resp
            .data
            .get("partner_key")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default();
        if partner_key.is_empty() {
            return Err(Error::credential_issuance(
                "key issuance response missing partner_key",
            ));
        }

        self.cache
            .set(&self.cache_key, partner_key, PARTNER_KEY_TTL)
            .await?;
        debug!(
            "partner key issued and cached under {} for {:?}",
            self.cache_key, PARTNER_KEY_TTL
        );

        Ok(PartnerKey::new(partner_key))
    }
}

impl Debug for PartnerKeyProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PartnerKeyProvider")
            .field("partner_id", &self.partner_id)
            .field("secret_key", &Redact::from(&self.secret_key))
            .field("endpoint", &self.endpoint)
            .field("cache_key", &self.cache_key)
            .finish()
    }
}

#[async_trait]
impl ProvideCredential for PartnerKeyProvider {
    type Credential = PartnerKey;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        if let Some(cached) = self.cache.get(&self.cache_key).await? {
            if !cached.is_empty() {
                debug!("partner key served from cache under {}", self.cache_key);
                return Ok(Some(PartnerKey::new(cached)));
            }
        }

        self.fetch(ctx, false).await.map(Some)
    }
}

#[derive(Default, Debug, Deserialize)]
#[serde(default)]
struct CreateKeyResponse {
    code: i64,
    msg: String,
    data: serde_json::Value,
}
