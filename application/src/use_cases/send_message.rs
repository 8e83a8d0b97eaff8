//! Send message use case
//!
//! One send on one session: append the user message, call the provider,
//! append exactly one reply or failure explanation. Failures never escape;
//! they end up in the session's own log.

use crate::config::BehaviorConfig;
use crate::credentials::CredentialStore;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::provider_adapter::{ChatRequest, ProviderFailure};
use crate::registry::ProviderRegistry;
use crate::sessions::SharedSessions;
use chorus_domain::{DomainError, FailureKind, Message, PendingRequest, SessionId, truncate};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What a send did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank text or unknown session: nothing changed.
    Ignored,
    /// The session already has a request in flight: nothing changed.
    Busy,
    /// The assistant reply was appended.
    Completed,
    /// A failure explanation was appended.
    Failed(FailureKind),
}

impl SendOutcome {
    /// Whether the send appended a user/result pair.
    pub fn appended(&self) -> bool {
        matches!(self, SendOutcome::Completed | SendOutcome::Failed(_))
    }

    pub fn failure(&self) -> Option<FailureKind> {
        match self {
            SendOutcome::Failed(kind) => Some(*kind),
            _ => None,
        }
    }
}

/// Use case for sending one message to one session
#[derive(Clone)]
pub struct SendMessageUseCase {
    registry: ProviderRegistry,
    sessions: SharedSessions,
    credentials: CredentialStore,
    behavior: BehaviorConfig,
    logger: Arc<dyn ConversationLogger>,
}

impl SendMessageUseCase {
    pub fn new(
        registry: ProviderRegistry,
        sessions: SharedSessions,
        credentials: CredentialStore,
    ) -> Self {
        Self {
            registry,
            sessions,
            credentials,
            behavior: BehaviorConfig::default(),
            logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_behavior(mut self, behavior: BehaviorConfig) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn sessions(&self) -> &SharedSessions {
        &self.sessions
    }

    /// Send `text` on `session_id`.
    pub async fn execute(&self, session_id: SessionId, text: &str) -> SendOutcome {
        if text.trim().is_empty() {
            return SendOutcome::Ignored;
        }

        let Some((provider_id, is_loading)) = self.sessions.read(|store| {
            store
                .get(session_id)
                .map(|s| (s.provider_id().to_string(), s.is_loading()))
        }) else {
            debug!("Ignoring send to unknown session {}", session_id);
            return SendOutcome::Ignored;
        };

        if is_loading {
            debug!("Session {} is busy, rejecting send", session_id);
            return SendOutcome::Busy;
        }

        let Some(credential) = self.credentials.get(&provider_id) else {
            return self.record_missing_credential(session_id, &provider_id, text);
        };

        let pending = match self
            .sessions
            .mutate(|store| store.begin_request(session_id, text))
        {
            Ok(pending) => pending,
            Err(DomainError::SessionBusy(_)) => return SendOutcome::Busy,
            Err(e) => {
                debug!("Send to session {} dropped: {}", session_id, e);
                return SendOutcome::Ignored;
            }
        };

        self.log_user_message(&pending, text);
        info!(
            "Session {} -> {}/{} ({} messages)",
            session_id,
            pending.provider_id,
            pending.model_id,
            pending.history.len()
        );
        debug!("Session {} user text: {}", session_id, truncate(text, 80));

        let request = ChatRequest::new(pending.model_id.clone(), pending.history, credential)
            .with_system_prompt(pending.system_prompt);

        let result = self.invoke(&pending.provider_id, &request).await;
        self.finish(session_id, &pending.provider_id, &pending.model_id, result)
    }

    async fn invoke(
        &self,
        provider_id: &str,
        request: &ChatRequest,
    ) -> Result<String, ProviderFailure> {
        let adapter = self.registry.resolve(provider_id)?;
        let call = adapter.invoke(request);

        match self.behavior.timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                ProviderFailure::Transport(format!(
                    "no response within {} seconds",
                    limit.as_secs()
                ))
            })?,
            None => call.await,
        }
    }

    fn finish(
        &self,
        session_id: SessionId,
        provider_id: &str,
        model_id: &str,
        result: Result<String, ProviderFailure>,
    ) -> SendOutcome {
        let (reply, credential_invalid, outcome) = match result {
            Ok(content) => {
                info!("Session {} received reply from {}", session_id, provider_id);
                self.logger.log(ConversationEvent::new(
                    "assistant_message",
                    json!({
                        "session": session_id.0,
                        "provider": provider_id,
                        "model": model_id,
                        "content": content,
                    }),
                ));
                (Message::assistant(content), Some(false), SendOutcome::Completed)
            }
            Err(failure) => {
                let kind = failure.kind();
                warn!(
                    "Session {} send to {} failed ({}): {}",
                    session_id, provider_id, kind, failure
                );
                self.log_failure(session_id, provider_id, kind, failure.detail());

                let name = self.provider_name(provider_id);
                let explanation = kind.explain(provider_id, &name, failure.detail());
                let flag = kind.invalidates_credential().then_some(true);
                (Message::failure(kind, explanation), flag, SendOutcome::Failed(kind))
            }
        };

        if let Err(e) = self
            .sessions
            .mutate(|store| store.complete_request(session_id, reply, credential_invalid))
        {
            debug!("Discarding reply for session {}: {}", session_id, e);
        }
        outcome
    }

    fn record_missing_credential(
        &self,
        session_id: SessionId,
        provider_id: &str,
        text: &str,
    ) -> SendOutcome {
        let kind = FailureKind::MissingCredential;
        let name = self.provider_name(provider_id);
        let explanation = kind.explain(provider_id, &name, "");

        let recorded = self.sessions.mutate(|store| {
            store.record_exchange(
                session_id,
                Message::user(text),
                Message::failure(kind, explanation),
            )
        });

        match recorded {
            Ok(()) => {
                warn!("Session {}: no credential for {}", session_id, provider_id);
                self.log_failure(session_id, provider_id, kind, "");
                SendOutcome::Failed(kind)
            }
            Err(DomainError::SessionBusy(_)) => SendOutcome::Busy,
            Err(_) => SendOutcome::Ignored,
        }
    }

    pub(crate) fn log_event(&self, event: ConversationEvent) {
        self.logger.log(event);
    }

    fn provider_name(&self, provider_id: &str) -> String {
        self.sessions
            .read(|store| store.catalog().display_name(provider_id).to_string())
    }

    fn log_user_message(&self, pending: &PendingRequest, text: &str) {
        self.logger.log(ConversationEvent::new(
            "user_message",
            json!({
                "session": pending.session_id.0,
                "provider": pending.provider_id,
                "model": pending.model_id,
                "content": text,
            }),
        ));
    }

    fn log_failure(&self, session_id: SessionId, provider_id: &str, kind: FailureKind, detail: &str) {
        self.logger.log(ConversationEvent::new(
            "send_failed",
            json!({
                "session": session_id.0,
                "provider": provider_id,
                "kind": kind.as_str(),
                "detail": detail,
            }),
        ));
    }
}
