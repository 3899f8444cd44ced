//! reqwest-backed [`HttpTransport`].

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use tracing::{trace, warn};

use super::settings::EsiConfig;
use crate::error::FetchError;
use crate::port::{HttpRequest, HttpResponse, HttpTransport};

/// HTTP transport for the market API.
///
/// Applies the configured timeouts and user agent; never retries. A failed
/// request is only repeated by the next natural cache refresh.
pub struct ReqwestTransport {
    http: HttpClient,
}

impl ReqwestTransport {
    #[must_use]
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    #[must_use]
    pub fn from_config(config: &EsiConfig) -> Self {
        let http = HttpClient::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });
        Self { http }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, FetchError> {
        trace!(url = %request.url, "GET");

        let mut builder = self.http.get(request.url);
        if let Some(token) = request.bearer_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_ascii_lowercase(), value.to_string()))
            })
            .collect();
        let body = response.text().await?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
