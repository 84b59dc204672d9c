use std::fmt::{Debug, Formatter};

use baijiayun_core::{utils::Redact, SigningCredential};

/// The platform-issued, time-limited partner key.
///
/// This is the symmetric key every request signature is computed with. It is
/// derived from the long-lived partner secret by the key-issuance endpoint
/// and lives only as long as its cache entry.
#[derive(Clone)]
pub struct PartnerKey {
    /// The raw key material.
    pub key: String,
}

impl PartnerKey {
    /// Create a new partner key.
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl Debug for PartnerKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PartnerKey")
            .field("key", &Redact::from(&self.key))
            .finish()
    }
}

impl SigningCredential for PartnerKey {
    fn is_valid(&self) -> bool {
        !self.key.is_empty()
    }
}
