//! Anthropic Messages API.

use super::ProviderSettings;
use super::wire::{self, NESTED_ERROR_MESSAGE};
use crate::transport::{HttpRequest, HttpTransport};
use async_trait::async_trait;
use chorus_application::ports::provider_adapter::{ChatRequest, ProviderAdapter, ProviderFailure};
use chorus_domain::CredentialStatus;
use serde::Serialize;
use std::sync::Arc;

const MESSAGES_PATH: &str = "/v1/messages";
const API_VERSION: &str = "2023-06-01";
const REPLY_POINTER: &str = "/content/0/text";
const PROBE_MODEL: &str = "claude-3-haiku-20240307";

pub struct AnthropicAdapter {
    settings: ProviderSettings,
    transport: Arc<dyn HttpTransport>,
}

impl AnthropicAdapter {
    pub fn new(settings: ProviderSettings, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            settings,
            transport,
        }
    }

    fn request(&self, api_key: &str, body: serde_json::Value) -> HttpRequest {
        HttpRequest::post(self.settings.url(MESSAGES_PATH), body)
            .header("x-api-key", api_key)
            .header("anthropic-version", API_VERSION)
    }
}

#[async_trait]
impl ProviderAdapter for AnthropicAdapter {
    fn provider_id(&self) -> &str {
        "anthropic"
    }

    async fn invoke(&self, request: &ChatRequest) -> Result<String, ProviderFailure> {
        let body = MessagesBody {
            model: &request.model,
            max_tokens: self.settings.max_tokens,
            system: request.system_prompt.as_deref(),
            messages: request
                .history
                .iter()
                .map(|m| WireMessage {
                    role: wire::wire_role(m.role),
                    content: &m.content,
                })
                .collect(),
        };
        let http = self.request(&request.credential, wire::to_body(&body)?);

        let reply = wire::exchange(
            self.transport.as_ref(),
            "Anthropic",
            NESTED_ERROR_MESSAGE,
            http,
        )
        .await?;
        wire::extract_text(&reply, REPLY_POINTER)
    }

    fn supports_probe(&self) -> bool {
        true
    }

    /// Probe with a one-token message.
    async fn probe(&self, credential: &str) -> CredentialStatus {
        let body = MessagesBody {
            model: PROBE_MODEL,
            max_tokens: 1,
            system: None,
            messages: vec![WireMessage {
                role: "user",
                content: "Hi",
            }],
        };
        let Ok(body) = wire::to_body(&body) else {
            return CredentialStatus::Error;
        };
        wire::probe(self.transport.as_ref(), "Anthropic", self.request(credential, body)).await
    }
}

#[derive(Serialize)]
struct MessagesBody<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<WireMessage<'a>>,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}
