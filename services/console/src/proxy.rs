//! Pass-through proxy for the backend REST API

use axum::{
    body::Bytes,
    http::{HeaderMap, Method, Uri, header},
    response::{IntoResponse, Response},
};
use tracing::{debug, error};

use crate::error::{ConsoleError, ConsoleResult};

/// Request headers copied to the backend
const FORWARDED_HEADERS: [header::HeaderName; 3] =
    [header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION];

/// Forwards `/api/...` requests to the backend unchanged
#[derive(Clone)]
pub struct ApiProxy {
    client: reqwest::Client,
    base_url: String,
}

impl ApiProxy {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn target(&self, uri: &Uri) -> String {
        let path = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
        format!("{}{}", self.base_url, path)
    }

    /// Send the request to the backend and relay its answer
    pub async fn forward(
        &self,
        method: Method,
        uri: &Uri,
        headers: &HeaderMap,
        body: Bytes,
    ) -> ConsoleResult<Response> {
        let target = self.target(uri);
        debug!("Proxying {} {}", method, target);

        let mut request = self.client.request(method, &target).body(body);
        for name in FORWARDED_HEADERS {
            if let Some(value) = headers.get(&name) {
                request = request.header(name, value);
            }
        }

        let response = request.send().await.map_err(|e| {
            error!("Failed to reach backend at {}: {}", target, e);
            ConsoleError::BadGateway(e.to_string())
        })?;

        let status = response.status();
        let content_type = response.headers().get(header::CONTENT_TYPE).cloned();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ConsoleError::BadGateway(e.to_string()))?;

        let mut relayed = (status, bytes).into_response();
        if let Some(content_type) = content_type {
            relayed
                .headers_mut()
                .insert(header::CONTENT_TYPE, content_type);
        }
        Ok(relayed)
    }
}
