//! The HTTP boundary. The client only needs "post this body, give me the
//! status and text back"; anything that can do that is a [`Transport`].

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::core::CrossBorderError;

/// What came back from one POST.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportResponse {
    pub status_code: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Posts a request body and returns the response. No retries; a failure is
/// reported as [`CrossBorderError::Transport`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(
        &self,
        url: &str,
        body: String,
        headers: Vec<(&'static str, String)>,
    ) -> Result<TransportResponse, CrossBorderError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn post(
        &self,
        url: &str,
        body: String,
        headers: Vec<(&'static str, String)>,
    ) -> Result<TransportResponse, CrossBorderError> {
        (**self).post(url, body, headers).await
    }
}

#[cfg(feature = "http")]
pub use http::HttpTransport;

#[cfg(feature = "http")]
mod http {
    use std::time::Duration;

    use async_trait::async_trait;
    use tracing::debug;

    use super::{Transport, TransportResponse};
    use crate::core::CrossBorderError;

    fn network(e: reqwest::Error) -> CrossBorderError {
        CrossBorderError::Transport(e.to_string())
    }

    /// [`Transport`] over `reqwest` with rustls.
    #[derive(Debug, Clone)]
    pub struct HttpTransport {
        client: reqwest::Client,
    }

    impl HttpTransport {
        pub fn new(timeout_secs: u64) -> Result<Self, CrossBorderError> {
            let client = reqwest::Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .map_err(network)?;
            Ok(Self { client })
        }
    }

    #[async_trait]
    impl Transport for HttpTransport {
        async fn post(
            &self,
            url: &str,
            body: String,
            headers: Vec<(&'static str, String)>,
        ) -> Result<TransportResponse, CrossBorderError> {
            let mut request = self.client.post(url);
            for (name, value) in headers {
                // reqwest negotiates compression and sets the length itself.
                if name.eq_ignore_ascii_case("Accept-Encoding")
                    || name.eq_ignore_ascii_case("Content-Length")
                {
                    continue;
                }
                request = request.header(name, value);
            }

            let resp = request.body(body).send().await.map_err(network)?;
            let status_code = resp.status().as_u16();
            let headers = resp
                .headers()
                .iter()
                .map(|(k, v)| {
                    (
                        k.as_str().to_string(),
                        String::from_utf8_lossy(v.as_bytes()).into_owned(),
                    )
                })
                .collect();
            let body = resp.text().await.map_err(network)?;
            debug!(url, status_code, bytes = body.len(), "received response");

            Ok(TransportResponse {
                status_code,
                headers,
                body,
            })
        }
    }
}
