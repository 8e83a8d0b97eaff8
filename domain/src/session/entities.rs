//! Session domain entities

use crate::session::failure::FailureKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A message in a conversation (Entity)
///
/// Immutable once appended to a session. Messages produced from a failed
/// send keep the assistant role and carry the classified [`FailureKind`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
            failure: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
            failure: None,
        }
    }

    /// An assistant-role message explaining a failed send.
    pub fn failure(kind: FailureKind, explanation: impl Into<String>) -> Self {
        Self {
            failure: Some(kind),
            ..Self::assistant(explanation)
        }
    }

    pub fn is_failure(&self) -> bool {
        self.failure.is_some()
    }
}

/// Stable session handle. Allocated by the store, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One chat thread bound to a provider/model pair (Entity)
///
/// Fields are only mutated through [`SessionStore`](crate::session::store::SessionStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub(crate) id: SessionId,
    pub(crate) provider_id: String,
    pub(crate) model_id: String,
    pub(crate) messages: Vec<Message>,
    pub(crate) system_prompt: Option<String>,
    pub(crate) is_loading: bool,
    pub(crate) is_credential_invalid: bool,
}

impl Session {
    pub(crate) fn new(
        id: SessionId,
        provider_id: impl Into<String>,
        model_id: impl Into<String>,
    ) -> Self {
        Self {
            id,
            provider_id: provider_id.into(),
            model_id: model_id.into(),
            messages: Vec::new(),
            system_prompt: None,
            is_loading: false,
            is_credential_invalid: false,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The system prompt, or `None` when unset or blank.
    pub fn system_prompt(&self) -> Option<&str> {
        self.system_prompt
            .as_deref()
            .filter(|prompt| !prompt.trim().is_empty())
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_credential_invalid(&self) -> bool {
        self.is_credential_invalid
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}

/// Partial update applied by [`SessionStore::update`](crate::session::store::SessionStore::update).
///
/// `None` leaves a field untouched. `system_prompt: Some(None)` removes
/// the prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionPatch {
    pub provider_id: Option<String>,
    pub model_id: Option<String>,
    pub system_prompt: Option<Option<String>>,
    pub is_credential_invalid: Option<bool>,
}

impl SessionPatch {
    pub fn provider(provider_id: impl Into<String>) -> Self {
        Self {
            provider_id: Some(provider_id.into()),
            ..Default::default()
        }
    }

    pub fn model(model_id: impl Into<String>) -> Self {
        Self {
            model_id: Some(model_id.into()),
            ..Default::default()
        }
    }

    pub fn system_prompt(prompt: Option<String>) -> Self {
        Self {
            system_prompt: Some(prompt),
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    pub fn with_credential_invalid(mut self, invalid: bool) -> Self {
        self.is_credential_invalid = Some(invalid);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
