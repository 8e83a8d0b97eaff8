//! Google Generative Language API (Gemini).
//!
//! The API has no system role. A system prompt is sent as a priming
//! exchange: a user turn carrying the prompt, then a model turn that
//! acknowledges it.

use super::ProviderSettings;
use super::wire::{self, NESTED_ERROR_MESSAGE};
use crate::transport::{HttpRequest, HttpTransport};
use async_trait::async_trait;
use chorus_application::ports::provider_adapter::{ChatRequest, ProviderAdapter, ProviderFailure};
use chorus_domain::{CredentialStatus, Role};
use reqwest::Url;
use serde::Serialize;
use std::sync::Arc;

const REPLY_POINTER: &str = "/candidates/0/content/parts/0/text";
const PRIMING_ACK: &str = "I understand.";

pub struct GoogleAdapter {
    settings: ProviderSettings,
    transport: Arc<dyn HttpTransport>,
}

impl GoogleAdapter {
    pub fn new(settings: ProviderSettings, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            settings,
            transport,
        }
    }

    /// `{base}/v1beta/models[/{segment}]?key={credential}` with every
    /// caller-supplied piece percent-encoded.
    fn endpoint(&self, segment: Option<&str>, credential: &str) -> Result<String, ProviderFailure> {
        let invalid = || ProviderFailure::Transport("invalid Google base URL".to_string());
        let mut url = Url::parse(&self.settings.url("/v1beta/models")).map_err(|_| invalid())?;
        if let Some(segment) = segment {
            url.path_segments_mut()
                .map_err(|_| invalid())?
                .push(segment);
        }
        url.query_pairs_mut().append_pair("key", credential);
        Ok(url.into())
    }

    fn build_body<'a>(&self, request: &'a ChatRequest) -> GenerateContentBody<'a> {
        let mut contents = Vec::with_capacity(request.history.len() + 2);
        if let Some(prompt) = &request.system_prompt {
            contents.push(Content::new("user", prompt));
            contents.push(Content::new("model", PRIMING_ACK));
        }
        contents.extend(request.history.iter().map(|m| {
            let role = match m.role {
                Role::User => "user",
                Role::Assistant => "model",
            };
            Content::new(role, &m.content)
        }));

        GenerateContentBody {
            contents,
            generation_config: GenerationConfig {
                max_output_tokens: self.settings.max_tokens,
                temperature: self.settings.temperature,
            },
        }
    }
}

#[async_trait]
impl ProviderAdapter for GoogleAdapter {
    fn provider_id(&self) -> &str {
        "google"
    }

    async fn invoke(&self, request: &ChatRequest) -> Result<String, ProviderFailure> {
        let url = self.endpoint(
            Some(&format!("{}:generateContent", request.model)),
            &request.credential,
        )?;
        let body = wire::to_body(&self.build_body(request))?;

        let reply = wire::exchange(
            self.transport.as_ref(),
            "Google",
            NESTED_ERROR_MESSAGE,
            HttpRequest::post(url, body),
        )
        .await?;
        wire::extract_text(&reply, REPLY_POINTER)
    }

    fn supports_probe(&self) -> bool {
        true
    }

    async fn probe(&self, credential: &str) -> CredentialStatus {
        let Ok(url) = self.endpoint(None, credential) else {
            return CredentialStatus::Error;
        };
        wire::probe(self.transport.as_ref(), "Google", HttpRequest::get(url)).await
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentBody<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
    role: &'static str,
}

impl<'a> Content<'a> {
    fn new(role: &'static str, text: &'a str) -> Self {
        Self {
            parts: [Part { text }],
            role,
        }
    }
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::HttpMethod;
    use crate::transport::recording::RecordingTransport;
    use chorus_domain::{FailureKind, Message};
    use serde_json::json;

    fn adapter(transport: Arc<RecordingTransport>) -> GoogleAdapter {
        GoogleAdapter::new(ProviderSettings::new("https://gl.test"), transport)
    }

    #[tokio::test]
    async fn system_prompt_becomes_priming_exchange() {
        let transport = Arc::new(RecordingTransport::new().reply(
            200,
            r#"{"candidates":[{"content":{"parts":[{"text":"Sure"}],"role":"model"}}]}"#,
        ));
        let request = ChatRequest::new(
            "gemini-pro",
            vec![Message::user("a"), Message::assistant("b"), Message::user("c")],
            "AIza-key",
        )
        .with_system_prompt(Some("You are terse".into()));

        let reply = adapter(transport.clone()).invoke(&request).await.unwrap();
        assert_eq!(reply, "Sure");

        let sent = transport.last();
        assert_eq!(
            sent.url,
            "https://gl.test/v1beta/models/gemini-pro:generateContent?key=AIza-key"
        );
        assert_eq!(sent.header_value("authorization"), None);
        assert_eq!(
            sent.body.unwrap(),
            json!({
                "contents": [
                    {"parts": [{"text": "You are terse"}], "role": "user"},
                    {"parts": [{"text": "I understand."}], "role": "model"},
                    {"parts": [{"text": "a"}], "role": "user"},
                    {"parts": [{"text": "b"}], "role": "model"},
                    {"parts": [{"text": "c"}], "role": "user"},
                ],
                "generationConfig": {"maxOutputTokens": 1000, "temperature": 0.7},
            })
        );
    }

    #[tokio::test]
    async fn blocked_response_without_candidates_is_provider_error() {
        let transport = Arc::new(
            RecordingTransport::new().reply(200, r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#),
        );
        let request = ChatRequest::new("gemini-pro", vec![Message::user("x")], "k");
        let err = adapter(transport).invoke(&request).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::ProviderError);
    }

    #[tokio::test]
    async fn bad_key_message_classifies_as_auth_even_on_400() {
        let transport = Arc::new(RecordingTransport::new().reply(
            400,
            r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#,
        ));
        let request = ChatRequest::new("gemini-pro", vec![Message::user("x")], "k");
        let err = adapter(transport).invoke(&request).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::AuthFailure);
    }

    #[tokio::test]
    async fn probe_lists_models_with_key_param() {
        let transport = Arc::new(RecordingTransport::new().reply(200, r#"{"models":[]}"#));
        assert_eq!(
            adapter(transport.clone()).probe("AIza").await,
            CredentialStatus::Valid
        );
        let sent = transport.last();
        assert_eq!(sent.method, HttpMethod::Get);
        assert_eq!(sent.url, "https://gl.test/v1beta/models?key=AIza");
    }

    #[tokio::test]
    async fn key_and_model_are_percent_encoded() {
        let transport = Arc::new(RecordingTransport::new().reply(
            200,
            r#"{"candidates":[{"content":{"parts":[{"text":"ok"}],"role":"model"}}]}"#,
        ));
        let request = ChatRequest::new("gemini/pro", vec![Message::user("x")], "a&b=c #d");
        adapter(transport.clone()).invoke(&request).await.unwrap();

        let sent = transport.last();
        assert_eq!(
            sent.url,
            "https://gl.test/v1beta/models/gemini%2Fpro:generateContent?key=a%26b%3Dc+%23d"
        );
    }

    #[tokio::test]
    async fn unreachable_host_failure_hides_the_key() {
        let adapter = GoogleAdapter::new(
            ProviderSettings::new("http://127.0.0.1:1"),
            Arc::new(crate::transport::ReqwestTransport::new()),
        );
        let request = ChatRequest::new("gemini-pro", vec![Message::user("x")], "AIzaSECRET123");

        let failure = adapter.invoke(&request).await.unwrap_err();
        assert_eq!(failure.kind(), FailureKind::TransportFailure);
        assert!(!failure.detail().contains("AIzaSECRET123"));
        assert!(!failure.to_string().contains("AIzaSECRET123"));
        assert_eq!(adapter.probe("AIzaSECRET123").await, CredentialStatus::Error);
    }
}
