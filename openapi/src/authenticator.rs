use std::sync::Arc;

use log::debug;

use crate::constants::*;
use crate::{compute_signature, Params, PartnerKey};
use baijiayun_core::time::now_unix;
use baijiayun_core::{Context, Error, ErrorKind, ProvideCredential, Result, SigningCredential};

/// RequestAuthenticator signs outbound parameter sets and verifies inbound
/// callback payloads.
///
/// The partner key comes from the injected credential source on every
/// operation; freshness lives in the source's cache, not here.
#[derive(Clone, Debug)]
pub struct RequestAuthenticator {
    ctx: Context,
    provider: Arc<dyn ProvideCredential<Credential = PartnerKey>>,
}

impl RequestAuthenticator {
    /// Create a new authenticator.
    pub fn new(ctx: Context, provider: impl ProvideCredential<Credential = PartnerKey>) -> Self {
        Self::with_shared(ctx, Arc::new(provider))
    }

    /// Create a new authenticator sharing an existing credential source.
    pub fn with_shared(
        ctx: Context,
        provider: Arc<dyn ProvideCredential<Credential = PartnerKey>>,
    ) -> Self {
        Self { ctx, provider }
    }

    async fn partner_key(&self) -> Result<String> {
        match self.provider.provide_credential(&self.ctx).await? {
            Some(key) if key.is_valid() => Ok(key.key),
            _ => Err(Error::credential_invalid("no partner key available")),
        }
    }

    /// Sign a parameter set in place, using the default `timestamp` and
    /// `sign` field names.
    pub async fn sign_params(&self, params: &mut Params) -> Result<()> {
        self.sign_params_with(params, TIMESTAMP_FIELD, SIGN_FIELD)
            .await
    }

    /// Sign a parameter set in place.
    ///
    /// When `timestamp_field` is non-empty and absent from `params`, the
    /// current Unix time is injected first and participates in the
    /// signature. The signature is inserted under `sign_field`. The caller's
    /// set is mutated, not copied.
    pub async fn sign_params_with(
        &self,
        params: &mut Params,
        timestamp_field: &str,
        sign_field: &str,
    ) -> Result<()> {
        if !timestamp_field.is_empty() && !params.contains_key(timestamp_field) {
            params.insert(timestamp_field, now_unix());
        }

        let key = self.partner_key().await?;
        let signature = compute_signature(params, &key)?;
        params.insert(sign_field, signature);
        Ok(())
    }

    /// Verify a callback payload with the default 300 s timestamp tolerance.
    pub async fn verify_callback(&self, payload: &Params) -> Result<bool> {
        self.verify_callback_with(payload, CALLBACK_TOLERANCE_SECS)
            .await
    }

    /// Verify a callback payload.
    ///
    /// Verification is a predicate: malformed payloads yield `Ok(false)`,
    /// never an error. `false` when
    ///
    /// - `sign` is absent or not a string,
    /// - `tolerance_secs > 0` and `timestamp` is absent, non-integer, or
    ///   further than the tolerance from current time,
    /// - the signature recomputed over the payload without `sign` differs.
    ///
    /// A `tolerance_secs` of `0` disables the timestamp check entirely. The
    /// caller's payload is never mutated. Only partner-key acquisition
    /// failures surface as errors.
    pub async fn verify_callback_with(
        &self,
        payload: &Params,
        tolerance_secs: i64,
    ) -> Result<bool> {
        let Some(declared) = payload.get_str(SIGN_FIELD) else {
            debug!("callback rejected: no signature field");
            return Ok(false);
        };

        if tolerance_secs > 0 {
            let Some(timestamp) = payload.get_i64(TIMESTAMP_FIELD) else {
                debug!("callback rejected: no usable timestamp");
                return Ok(false);
            };
            if (now_unix() - timestamp).abs() > tolerance_secs {
                debug!("callback rejected: timestamp outside tolerance");
                return Ok(false);
            }
        }

        let mut fields = payload.clone();
        fields.remove(SIGN_FIELD);

        let key = self.partner_key().await?;
        let expected = match compute_signature(&fields, &key) {
            Ok(signature) => signature,
            Err(err) if err.kind() == ErrorKind::Encoding => {
                debug!("callback rejected: payload not canonicalizable");
                return Ok(false);
            }
            Err(err) => return Err(err),
        };

        Ok(expected == declared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StaticPartnerKeyProvider;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn authenticator() -> RequestAuthenticator {
        RequestAuthenticator::new(Context::new(), StaticPartnerKeyProvider::new("k-123"))
    }

    #[tokio::test]
    async fn test_sign_injects_timestamp_and_sign() {
        let auth = authenticator();
        let mut params = Params::new().with("foo", "bar");

        auth.sign_params(&mut params).await.unwrap();

        let ts = params.get_i64("timestamp").expect("timestamp injected");
        assert!((now_unix() - ts).abs() < 5);
        let sign = params.get_str("sign").expect("sign injected");
        assert_eq!(sign.len(), 32);
    }

    #[tokio::test]
    async fn test_sign_keeps_caller_timestamp() {
        let auth = authenticator();
        let mut params = Params::new().with("foo", "bar").with("timestamp", 1700000000);

        auth.sign_params(&mut params).await.unwrap();

        assert_eq!(params.get_i64("timestamp"), Some(1700000000));
        // md5("foo=bar&timestamp=1700000000&partner_key=k-123")
        assert_eq!(
            params.get_str("sign"),
            Some("7443b85dd10eeaba3d9155fdb13f02f8")
        );
    }

    #[tokio::test]
    async fn test_sign_with_custom_field_names() {
        let auth = authenticator();
        let mut params = Params::new().with("foo", "bar");

        auth.sign_params_with(&mut params, "", "signature")
            .await
            .unwrap();

        assert!(!params.contains_key("timestamp"));
        assert!(params.contains_key("signature"));
    }

    #[tokio::test]
    async fn test_callback_round_trip() {
        let auth = authenticator();
        let mut payload = Params::new().with("foo", "bar");
        auth.sign_params(&mut payload).await.unwrap();

        assert!(auth.verify_callback(&payload).await.unwrap());

        let mut tampered = payload.clone();
        tampered.insert("foo", "baz");
        assert!(!auth.verify_callback(&tampered).await.unwrap());
    }

    #[tokio::test]
    async fn test_callback_without_sign_is_rejected() {
        let auth = authenticator();
        let payload = Params::new().with("foo", "bar").with("timestamp", now_unix());

        assert!(!auth.verify_callback(&payload).await.unwrap());
    }

    #[tokio::test]
    async fn test_callback_without_timestamp_is_rejected() {
        let auth = authenticator();
        let mut payload = Params::new().with("foo", "bar");
        auth.sign_params_with(&mut payload, "", "sign").await.unwrap();

        assert!(!auth.verify_callback(&payload).await.unwrap());
        // ... unless the timestamp check is disabled.
        assert!(auth.verify_callback_with(&payload, 0).await.unwrap());
    }

    #[tokio::test]
    async fn test_callback_skew_rejection() {
        let auth = authenticator();
        let mut payload = Params::new()
            .with("foo", "bar")
            .with("timestamp", now_unix() - 1000);
        auth.sign_params(&mut payload).await.unwrap();

        assert!(!auth.verify_callback_with(&payload, 300).await.unwrap());
        assert!(auth.verify_callback_with(&payload, 0).await.unwrap());
        assert!(auth.verify_callback_with(&payload, 2000).await.unwrap());
    }

    #[tokio::test]
    async fn test_callback_does_not_mutate_payload() {
        let auth = authenticator();
        let mut payload = Params::new().with("foo", "bar");
        auth.sign_params(&mut payload).await.unwrap();

        let before = payload.clone();
        auth.verify_callback(&payload).await.unwrap();
        assert_eq!(before, payload);
    }

    #[tokio::test]
    async fn test_callback_with_string_timestamp() {
        let auth = authenticator();
        let ts = now_unix().to_string();
        let mut payload = Params::new().with("foo", "bar").with("timestamp", ts);
        auth.sign_params(&mut payload).await.unwrap();

        assert!(auth.verify_callback(&payload).await.unwrap());
    }

    #[tokio::test]
    async fn test_callback_with_non_scalar_field_is_rejected() {
        let auth = authenticator();
        let payload = Params::new()
            .with("items", json!([1, 2]))
            .with("timestamp", now_unix())
            .with("sign", "0123456789abcdef0123456789abcdef");

        assert!(!auth.verify_callback(&payload).await.unwrap());
    }
}
