//! Core components for the Baijiayun OpenAPI SDK.
//!
//! This crate provides the foundational types shared by the SDK crates:
//!
//! - **Context**: a container holding implementations for HTTP sending and
//!   environment access, so the SDK stays runtime- and client-agnostic
//! - **KeyValueCache**: the TTL cache interface the credential layer stores
//!   the partner key in, plus an in-memory default backend
//! - **Traits**: abstract interfaces for credential sources
//!   ([`ProvideCredential`]) and credential validity ([`SigningCredential`])
//! - **Error**: the structured error type used across the workspace
//!
//! ## Example
//!
//! ```no_run
//! use baijiayun_core::{Context, MemoryCache, OsEnv};
//!
//! let ctx = Context::new().with_env(OsEnv);
//! let cache = MemoryCache::new();
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: digest helpers
//! - [`time`]: clock and Unix-timestamp helpers
//! - [`utils`]: data redaction for `Debug` output

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod context;
pub use context::{Context, Env, HttpSend, NoopEnv, NoopHttpSend, OsEnv, StaticEnv};

mod error;
pub use error::{Error, ErrorKind, Result};

mod cache;
pub use cache::{KeyValueCache, MemoryCache, NoopCache};

mod api;
pub use api::{ProvideCredential, SigningCredential};
