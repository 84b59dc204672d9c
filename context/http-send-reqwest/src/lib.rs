//! [`HttpSend`] implementation backed by [`reqwest`].

use async_trait::async_trait;
use baijiayun_core::{Error, HttpSend, Result};
use bytes::Bytes;
use http_body_util::BodyExt;
use reqwest::{Client, Request};

/// ReqwestHttpSend sends the SDK's HTTP traffic through a `reqwest::Client`.
///
/// Timeouts, proxies and TLS configuration belong to the `reqwest::Client`
/// the caller passes in.
#[derive(Debug, Default)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let req = Request::try_from(req)
            .map_err(|e| Error::request_invalid("failed to convert request").with_source(e))?;
        let resp: http::Response<_> = self
            .client
            .execute(req)
            .await
            .map_err(|e| Error::unexpected("http request failed").with_source(e))?
            .into();

        let (parts, body) = resp.into_parts();
        let bs = BodyExt::collect(body)
            .await
            .map(|buf| buf.to_bytes())
            .map_err(|e| Error::unexpected("failed to read response body").with_source(e))?;
        Ok(http::Response::from_parts(parts, bs))
    }
}
