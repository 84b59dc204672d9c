use std::sync::Arc;

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::Method;
use log::{debug, warn};
use serde::Deserialize;

use crate::{
    Config, NoRetry, Params, PartnerKeyProvider, RequestAuthenticator, RetryPolicy,
};
use baijiayun_core::{Context, Error, KeyValueCache, MemoryCache, ProvideCredential, Result};

/// Client dispatches signed calls against the partner's OpenAPI endpoint.
///
/// Every dependency is composed per instance: the cache, the key provider,
/// the authenticator and the retry policy all belong to this client, and two
/// clients only share state through an explicitly shared cache.
///
/// The endpoint catalog builds on [`post`](Self::post): a catalog method is
/// a parameter set (including `partner_id`) plus a path.
#[derive(Clone, Debug)]
pub struct Client {
    ctx: Context,
    partner_id: String,
    endpoint: String,
    provider: Arc<PartnerKeyProvider>,
    authenticator: RequestAuthenticator,
    retry: Arc<dyn RetryPolicy>,
}

impl Client {
    /// Create a client with a private in-memory credential cache.
    pub fn new(ctx: Context, config: Config) -> Result<Self> {
        Self::with_cache(ctx, config, Arc::new(MemoryCache::new()))
    }

    /// Create a client over a caller-supplied cache backend.
    ///
    /// Use this to share one cache (and thus one partner key) across clients
    /// or processes; entries are namespaced by the config's cache prefix.
    pub fn with_cache(
        ctx: Context,
        config: Config,
        cache: Arc<dyn KeyValueCache>,
    ) -> Result<Self> {
        let partner_id = config
            .partner_id
            .clone()
            .ok_or_else(|| Error::config_invalid("partner_id is required"))?;
        let endpoint = config
            .endpoint()
            .ok_or_else(|| Error::config_invalid("private_domain is required"))?;

        let provider = Arc::new(PartnerKeyProvider::new(&config, cache)?);
        let authenticator = RequestAuthenticator::with_shared(ctx.clone(), provider.clone());

        Ok(Self {
            ctx,
            partner_id,
            endpoint,
            provider,
            authenticator,
            retry: Arc::new(NoRetry),
        })
    }

    /// Replace the retry policy.
    pub fn with_retry_policy(mut self, policy: impl RetryPolicy) -> Self {
        self.retry = Arc::new(policy);
        self
    }

    /// The partner id this client was built for.
    pub fn partner_id(&self) -> &str {
        &self.partner_id
    }

    /// The authenticator, for signing or verifying outside of
    /// [`post`](Self::post).
    pub fn authenticator(&self) -> &RequestAuthenticator {
        &self.authenticator
    }

    /// Current partner key, fetching and caching it when necessary.
    pub async fn partner_key(&self) -> Result<String> {
        match self.provider.provide_credential(&self.ctx).await? {
            Some(key) => Ok(key.key),
            None => Err(Error::credential_invalid("no partner key available")),
        }
    }

    /// Rotate the partner key: always calls the issuance endpoint and
    /// overwrites the cached value.
    pub async fn regenerate_partner_key(&self) -> Result<String> {
        self.provider.regenerate(&self.ctx).await.map(|k| k.key)
    }

    /// Verify an inbound callback payload with the default tolerance.
    pub async fn verify_callback(&self, payload: &Params) -> Result<bool> {
        self.authenticator.verify_callback(payload).await
    }

    /// Dispatch a signed `POST` and return the envelope's `data`.
    ///
    /// The parameter set is signed (injecting `timestamp` and `sign`),
    /// form-encoded and sent; the platform's `{code, msg, data}` envelope is
    /// unwrapped, with a non-zero `code` surfaced as an error. When the
    /// retry policy asks for it, the cached partner key is dropped and the
    /// request replayed once with a fresh signature.
    pub async fn post(&self, path: &str, params: Params) -> Result<serde_json::Value> {
        let mut attempt = 0u32;
        loop {
            let mut fields = params.clone();
            match self.dispatch(path, &mut fields).await {
                Ok(data) => return Ok(data),
                Err(err) if self.retry.should_retry(&err, attempt) => {
                    warn!("request to {path} failed ({err}), rotating partner key and retrying");
                    self.provider.invalidate().await?;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn dispatch(&self, path: &str, params: &mut Params) -> Result<serde_json::Value> {
        self.authenticator.sign_params(params).await?;

        let mut body = form_urlencoded::Serializer::new(String::new());
        for (key, value) in params.form_pairs()? {
            body.append_pair(&key, &value);
        }
        let body = body.finish();

        let url = format!("{}{}", self.endpoint, path);
        debug!("dispatching signed request to {url}");
        let req = http::Request::builder()
            .method(Method::POST)
            .uri(&url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Bytes::from(body))
            .map_err(|e| {
                Error::request_invalid("failed to build api request")
                    .with_source(e)
                    .with_context(format!("url: {url}"))
            })?;

        let resp = self.ctx.http_send_as_string(req).await?;
        if !resp.status().is_success() {
            return Err(Error::unexpected("api endpoint answered with error")
                .with_context(format!("status: {}", resp.status()))
                .with_context(format!("path: {path}")));
        }

        let content = resp.into_body();
        let envelope: ApiResponse = serde_json::from_str(&content).map_err(|e| {
            Error::unexpected("failed to parse api response")
                .with_source(e)
                .with_context(format!("path: {path}"))
        })?;

        if envelope.code != 0 {
            return Err(
                Error::api(format!("[{}] {}", envelope.code, envelope.msg))
                    .with_context(format!("path: {path}")),
            );
        }

        Ok(envelope.data)
    }
}

#[derive(Default, Debug, Deserialize)]
#[serde(default)]
struct ApiResponse {
    code: i64,
    msg: String,
    data: serde_json::Value,
}
