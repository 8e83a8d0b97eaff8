//! Request/response plumbing shared by every adapter.

use crate::transport::{HttpRequest, HttpTransport};
use chorus_application::ports::provider_adapter::ProviderFailure;
use chorus_domain::{CredentialStatus, Role};
use serde_json::Value;
use tracing::{debug, warn};

/// Where a provider puts the human-readable message in an error body.
pub(crate) const NESTED_ERROR_MESSAGE: &str = "/error/message";
pub(crate) const TOP_LEVEL_ERROR_MESSAGE: &str = "/message";

pub(crate) fn wire_role(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "assistant",
    }
}

/// Send a chat request and return the parsed success body.
///
/// Non-2xx responses are classified from the status and the provider's own
/// error message, falling back to `"<Name> API error (HTTP <status>)"`.
pub(crate) async fn exchange(
    transport: &dyn HttpTransport,
    provider_name: &str,
    error_pointer: &str,
    request: HttpRequest,
) -> Result<Value, ProviderFailure> {
    let response = transport
        .send(request)
        .await
        .map_err(|e| ProviderFailure::Transport(e.to_string()))?;

    if !response.is_success() {
        let message = error_message(&response.body, error_pointer).unwrap_or_else(|| {
            format!("{} API error (HTTP {})", provider_name, response.status)
        });
        debug!("{} responded {}: {}", provider_name, response.status, message);
        return Err(ProviderFailure::from_response(response.status, message));
    }

    serde_json::from_str(&response.body)
        .map_err(|e| ProviderFailure::unexpected_shape(format!("body is not JSON ({})", e)))
}

/// The provider's error message: the JSON field at `pointer`, or the raw
/// body when it is not JSON.
pub(crate) fn error_message(body: &str, pointer: &str) -> Option<String> {
    match serde_json::from_str::<Value>(body) {
        Ok(json) => json
            .pointer(pointer)
            .and_then(Value::as_str)
            .filter(|message| !message.trim().is_empty())
            .map(str::to_string),
        Err(_) => {
            let raw = body.trim();
            (!raw.is_empty()).then(|| raw.to_string())
        }
    }
}

/// Assistant text at `pointer`. A missing path or a non-string value is an
/// error, never an empty reply.
pub(crate) fn extract_text(body: &Value, pointer: &str) -> Result<String, ProviderFailure> {
    match body.pointer(pointer) {
        Some(Value::String(text)) => Ok(text.clone()),
        Some(other) => Err(ProviderFailure::unexpected_shape(format!(
            "{} is not a string but {}",
            pointer,
            json_kind(other)
        ))),
        None => Err(ProviderFailure::unexpected_shape(format!(
            "missing {}",
            pointer
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Any 2xx is valid, any other status invalid, no response an error.
pub(crate) async fn probe(
    transport: &dyn HttpTransport,
    provider_name: &str,
    request: HttpRequest,
) -> CredentialStatus {
    match transport.send(request).await {
        Ok(response) if response.is_success() => CredentialStatus::Valid,
        Ok(response) => {
            debug!("{} probe rejected with HTTP {}", provider_name, response.status);
            CredentialStatus::Invalid
        }
        Err(e) => {
            warn!("{} probe failed: {}", provider_name, e);
            CredentialStatus::Error
        }
    }
}

/// Serialize a request body. The body types are plain structs, so this only
/// fails on a bug.
pub(crate) fn to_body<T: serde::Serialize>(body: &T) -> Result<Value, ProviderFailure> {
    serde_json::to_value(body)
        .map_err(|e| ProviderFailure::Transport(format!("could not encode request: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chorus_domain::FailureKind;
    use serde_json::json;

    #[test]
    fn error_message_prefers_json_field_then_raw_body() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
        assert_eq!(
            error_message(body, NESTED_ERROR_MESSAGE).as_deref(),
            Some("Incorrect API key provided")
        );
        assert_eq!(
            error_message(r#"{"message":"invalid api token"}"#, TOP_LEVEL_ERROR_MESSAGE).as_deref(),
            Some("invalid api token")
        );
        assert_eq!(
            error_message("Bad Gateway", NESTED_ERROR_MESSAGE).as_deref(),
            Some("Bad Gateway")
        );
        assert_eq!(error_message(r#"{"detail":"x"}"#, NESTED_ERROR_MESSAGE), None);
        assert_eq!(error_message("  ", NESTED_ERROR_MESSAGE), None);
    }

    #[test]
    fn extract_text_fails_loudly() {
        let body = json!({"choices": [{"message": {"content": "hi"}}]});
        assert_eq!(
            extract_text(&body, "/choices/0/message/content").unwrap(),
            "hi"
        );

        let missing = extract_text(&json!({"choices": []}), "/choices/0/message/content");
        assert_eq!(missing.unwrap_err().kind(), FailureKind::ProviderError);

        let wrong_type = extract_text(&json!({"text": null}), "/text").unwrap_err();
        assert!(wrong_type.detail().contains("null"));
    }
}
