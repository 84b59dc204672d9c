//! Client SDK core for the Baijiayun live-classroom OpenAPI.
//!
//! The platform authenticates every request with an MD5 signature keyed by a
//! short-lived, platform-issued *partner key*. This crate implements that
//! subsystem end to end:
//!
//! - [`PartnerKeyProvider`] obtains the partner key from the key-issuance
//!   endpoint and caches it (fixed 7200 s TTL) in a [`KeyValueCache`]
//! - [`compute_signature`] canonicalizes a parameter set and computes the
//!   keyed digest
//! - [`RequestAuthenticator`] signs outbound parameter sets and verifies
//!   inbound callback payloads
//! - [`Client`] wires the pieces together and dispatches signed calls,
//!   unwrapping the platform's `{code, msg, data}` envelope
//!
//! [`KeyValueCache`]: baijiayun_core::KeyValueCache
//!
//! ## Example
//!
//! ```no_run
//! use baijiayun_core::Context;
//! use baijiayun_http_send_reqwest::ReqwestHttpSend;
//! use baijiayun_openapi::{Client, Config, Params};
//!
//! # async fn example() -> baijiayun_core::Result<()> {
//! let ctx = Context::new().with_http_send(ReqwestHttpSend::default());
//! let config = Config::new()
//!     .with_partner_id("7201963")
//!     .with_secret_key("my-secret")
//!     .with_private_domain("demo");
//!
//! let client = Client::new(ctx, config)?;
//!
//! let mut params = Params::new();
//! params.insert("partner_id", client.partner_id());
//! params.insert("room_id", 17110288405286_i64);
//! let info = client.post("/openapi/room/info", params).await?;
//! println!("{info}");
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

mod constants;

mod config;
pub use config::Config;

mod credential;
pub use credential::PartnerKey;

mod params;
pub use params::Params;

mod sign;
pub use sign::{compute_signature, Md5Signer};

mod provide_credential;
pub use provide_credential::{PartnerKeyProvider, StaticPartnerKeyProvider};

mod authenticator;
pub use authenticator::RequestAuthenticator;

mod retry;
pub use retry::{InvalidateAndRetryOnce, NoRetry, RetryPolicy};

mod client;
pub use client::Client;
