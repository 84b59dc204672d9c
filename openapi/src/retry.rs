use baijiayun_core::{Error, ErrorKind};
use std::fmt::Debug;

/// RetryPolicy decides whether a failed API call should be replayed after
/// the cached partner key has been invalidated.
///
/// The policy is consulted by [`Client::post`](crate::Client::post) with the
/// error of the failed attempt and the zero-based attempt number. Returning
/// `true` drops the cached partner key and replays the request with a fresh
/// signature.
pub trait RetryPolicy: Debug + Send + Sync + 'static {
    /// Decide whether `err` warrants invalidating the key and retrying.
    fn should_retry(&self, err: &Error, attempt: u32) -> bool;
}

/// Propagate every failure without retrying. The default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRetry;

impl RetryPolicy for NoRetry {
    fn should_retry(&self, _err: &Error, _attempt: u32) -> bool {
        false
    }
}

/// Invalidate the cached partner key and retry once on credential and
/// platform-rejection failures.
///
/// Finer, code-based classification belongs in a caller-supplied policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvalidateAndRetryOnce;

impl RetryPolicy for InvalidateAndRetryOnce {
    fn should_retry(&self, err: &Error, attempt: u32) -> bool {
        attempt == 0 && (err.is_credential_error() || err.kind() == ErrorKind::Api)
    }
}
