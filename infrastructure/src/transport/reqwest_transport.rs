//! reqwest-backed [`HttpTransport`].

use super::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        debug!("{:?}", request);

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|err| {
            // Query strings may carry credentials
            let err = err.without_url();
            if err.is_timeout() {
                TransportError::Timeout
            } else if err.is_connect() {
                TransportError::Connect(err.to_string())
            } else {
                TransportError::Other(err.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| TransportError::Body(err.without_url().to_string()))?;

        debug!(
            "{} {} -> {} ({} bytes)",
            request.method,
            request.url.split('?').next().unwrap_or_default(),
            status,
            body.len()
        );
        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connect_errors_omit_the_query_string() {
        let transport = ReqwestTransport::new();
        let err = transport
            .send(HttpRequest::get("http://127.0.0.1:1/v1beta/models?key=AIzaSECRET123"))
            .await
            .unwrap_err();

        assert!(!err.to_string().contains("AIzaSECRET123"));
        assert!(!format!("{:?}", err).contains("AIzaSECRET123"));
    }
}
