//! OpenAI-style chat completions, shared by OpenAI, Grok and Mistral.

use super::ProviderSettings;
use super::wire::{self, NESTED_ERROR_MESSAGE};
use crate::transport::{HttpRequest, HttpTransport};
use async_trait::async_trait;
use chorus_application::ports::provider_adapter::{ChatRequest, ProviderAdapter, ProviderFailure};
use chorus_domain::CredentialStatus;
use serde::Serialize;
use std::sync::Arc;

const CHAT_PATH: &str = "/v1/chat/completions";
const MODELS_PATH: &str = "/v1/models";
const REPLY_POINTER: &str = "/choices/0/message/content";

pub struct OpenAiCompatibleAdapter {
    provider_id: &'static str,
    display_name: &'static str,
    settings: ProviderSettings,
    transport: Arc<dyn HttpTransport>,
}

impl OpenAiCompatibleAdapter {
    pub fn new(
        provider_id: &'static str,
        display_name: &'static str,
        settings: ProviderSettings,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            provider_id,
            display_name,
            settings,
            transport,
        }
    }

    pub fn openai(settings: ProviderSettings, transport: Arc<dyn HttpTransport>) -> Self {
        Self::new("openai", "OpenAI", settings, transport)
    }

    pub fn grok(settings: ProviderSettings, transport: Arc<dyn HttpTransport>) -> Self {
        Self::new("grok", "Grok", settings, transport)
    }

    pub fn mistral(settings: ProviderSettings, transport: Arc<dyn HttpTransport>) -> Self {
        Self::new("mistral", "Mistral", settings, transport)
    }

    fn build_body<'a>(&self, request: &'a ChatRequest) -> ChatCompletionBody<'a> {
        let mut messages = Vec::with_capacity(request.history.len() + 1);
        if let Some(prompt) = &request.system_prompt {
            messages.push(WireMessage {
                role: "system",
                content: prompt,
            });
        }
        messages.extend(request.history.iter().map(|m| WireMessage {
            role: wire::wire_role(m.role),
            content: &m.content,
        }));

        ChatCompletionBody {
            model: &request.model,
            messages,
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        }
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiCompatibleAdapter {
    fn provider_id(&self) -> &str {
        self.provider_id
    }

    async fn invoke(&self, request: &ChatRequest) -> Result<String, ProviderFailure> {
        let body = wire::to_body(&self.build_body(request))?;
        let http = HttpRequest::post(self.settings.url(CHAT_PATH), body).bearer(&request.credential);

        let reply = wire::exchange(
            self.transport.as_ref(),
            self.display_name,
            NESTED_ERROR_MESSAGE,
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
        wire::probe(self.transport.as_ref(), self.display_name, http).await
    }
}

#[derive(Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}
