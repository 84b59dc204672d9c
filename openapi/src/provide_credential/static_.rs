use crate::PartnerKey;
use async_trait::async_trait;
use baijiayun_core::{Context, ProvideCredential, Result};
use std::fmt::{Debug, Formatter};

/// StaticPartnerKeyProvider always returns a pre-provisioned partner key.
///
/// Useful for tests and for callers that manage key issuance themselves.
#[derive(Clone)]
pub struct StaticPartnerKeyProvider {
    key: PartnerKey,
}

impl StaticPartnerKeyProvider {
    /// Create a provider around a fixed key.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: PartnerKey::new(key),
        }
    }
}

impl Debug for StaticPartnerKeyProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticPartnerKeyProvider")
            .field("key", &self.key)
            .finish()
    }
}

#[async_trait]
impl ProvideCredential for StaticPartnerKeyProvider {
    type Credential = PartnerKey;

    async fn provide_credential(&self, _ctx: &Context) -> Result<Option<Self::Credential>> {
        Ok(Some(self.key.clone()))
    }
}
