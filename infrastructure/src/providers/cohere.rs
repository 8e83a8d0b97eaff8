//! Cohere Chat API.
//!
//! Prior turns travel in `chat_history` with USER/CHATBOT roles; only the
//! newest user turn goes in `message`.

use super::ProviderSettings;
use super::wire::{self, TOP_LEVEL_ERROR_MESSAGE};
use crate::transport::{HttpRequest, HttpTransport};
use async_trait::async_trait;
use chorus_application::ports::provider_adapter::{ChatRequest, ProviderAdapter, ProviderFailure};
use chorus_domain::{CredentialStatus, Role};
use serde::Serialize;
use std::sync::Arc;

const CHAT_PATH: &str = "/v1/chat";
const MODELS_PATH: &str = "/v1/models";
const REPLY_POINTER: &str = "/text";

pub struct CohereAdapter {
    settings: ProviderSettings,
    transport: Arc<dyn HttpTransport>,
}

impl CohereAdapter {
    pub fn new(settings: ProviderSettings, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            settings,
            transport,
        }
    }
}

#[async_trait]
impl ProviderAdapter for CohereAdapter {
    fn provider_id(&self) -> &str {
        "cohere"
    }

    async fn invoke(&self, request: &ChatRequest) -> Result<String, ProviderFailure> {
        let Some((current, prior)) = request.history.split_last() else {
            return Err(ProviderFailure::Provider {
                status: None,
                message: "conversation is empty".to_string(),
            });
        };

        let body = ChatBody {
            model: &request.model,
            message: &current.content,
            chat_history: prior
                .iter()
                .map(|m| HistoryEntry {
                    role: match m.role {
                        Role::User => "USER",
                        Role::Assistant => "CHATBOT",
                    },
                    message: &m.content,
                })
                .collect(),
            preamble: request.system_prompt.as_deref(),
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };
        let http = HttpRequest::post(self.settings.url(CHAT_PATH), wire::to_body(&body)?)
            .bearer(&request.credential);

        let reply = wire::exchange(
            self.transport.as_ref(),
            "Cohere",
            TOP_LEVEL_ERROR_MESSAGE,
            http,
        )
        .await?;
        wire::extract_text(&reply, REPLY_POINTER)
    }

    fn supports_probe(&self) -> bool {
        true
    }

    async fn probe(&self, credential: &str) -> CredentialStatus {
        let http = HttpRequest::get(self.settings.url(MODELS_PATH)).bearer(credential);
        wire::probe(self.transport.as_ref(), "Cohere", http).await
    }
}

#[derive(Serialize)]
struct ChatBody<'a> {
    model: &'a str,
    message: &'a str,
    chat_history: Vec<HistoryEntry<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    preamble: Option<&'a str>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Serialize)]
struct HistoryEntry<'a> {
    role: &'static str,
    message: &'a str,
}
