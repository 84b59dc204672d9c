use crate::{Context, Result};
use std::fmt::Debug;

/// SigningCredential is implemented by credential types that can key a
/// signature.
pub trait SigningCredential: Clone + Debug + Send + Sync + 'static {
    /// Check if the credential is still usable for signing.
    fn is_valid(&self) -> bool;
}

impl<T: SigningCredential> SigningCredential for Option<T> {
    fn is_valid(&self) -> bool {
        let Some(cred) = self else {
            return false;
        };

        cred.is_valid()
    }
}

/// ProvideCredential is implemented by credential sources.
///
/// A source may consult a cache, the environment, or the network; callers
/// only see "a currently-valid credential or nothing".
#[async_trait::async_trait]
pub trait ProvideCredential: Debug + Send + Sync + 'static {
    /// Credential returned by this provider.
    type Credential: SigningCredential;

    /// Load a credential, or `None` if this source has nothing to offer.
    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>>;
}
