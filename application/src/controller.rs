//! Chat controller
//!
//! Single entry point for a front end: session editing, send routing by
//! mode, credential test/save, and change notification.

use crate::config::BehaviorConfig;
use crate::credentials::CredentialStore;
use crate::ports::conversation_logger::{ConversationLogger, NoConversationLogger};
use crate::ports::key_value_store::{KeyValueError, KeyValueStore};
use crate::ports::progress::{BroadcastProgress, NoProgress};
use crate::registry::ProviderRegistry;
use crate::sessions::SharedSessions;
use crate::use_cases::broadcast::{BroadcastReport, BroadcastUseCase};
use crate::use_cases::save_credentials::{SaveCredentialsUseCase, SaveReport};
use crate::use_cases::send_message::{SendMessageUseCase, SendOutcome};
use crate::use_cases::test_credential::TestCredentialUseCase;
use chorus_domain::{
    CredentialStatus, DomainError, ProviderCatalog, SendMode, Session, SessionId, SessionPatch,
    SessionStore,
};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

/// Result of [`ChatController::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Single(SessionId, SendOutcome),
    Broadcast(BroadcastReport),
}

pub struct ChatController {
    sessions: SharedSessions,
    credentials: CredentialStore,
    sender: SendMessageUseCase,
    broadcaster: BroadcastUseCase,
    tester: TestCredentialUseCase,
    saver: SaveCredentialsUseCase,
    mode: SendMode,
}

impl ChatController {
    pub fn new(
        registry: ProviderRegistry,
        store: SessionStore,
        key_store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self::with_options(
            registry,
            store,
            key_store,
            BehaviorConfig::default(),
            Arc::new(NoConversationLogger),
        )
    }

    pub fn with_options(
        registry: ProviderRegistry,
        store: SessionStore,
        key_store: Arc<dyn KeyValueStore>,
        behavior: BehaviorConfig,
        logger: Arc<dyn ConversationLogger>,
    ) -> Self {
        let sessions = SharedSessions::new(store);
        let credentials = CredentialStore::new(key_store);
        let sender = SendMessageUseCase::new(registry.clone(), sessions.clone(), credentials.clone())
            .with_behavior(behavior.clone())
            .with_logger(logger);

        Self {
            broadcaster: BroadcastUseCase::new(sender.clone()),
            tester: TestCredentialUseCase::new(registry).with_behavior(behavior),
            saver: SaveCredentialsUseCase::new(credentials.clone(), sessions.clone()),
            sender,
            sessions,
            credentials,
            mode: SendMode::default(),
        }
    }

    pub fn with_send_mode(mut self, mode: SendMode) -> Self {
        self.mode = mode;
        self
    }

    // ==================== Sessions ====================

    /// Add a session; `None` when the window is full.
    pub fn create_session(&self) -> Option<SessionId> {
        let id = self.sessions.mutate(|store| store.create());
        if let Some(id) = id {
            info!("Created session {}", id);
        }
        id
    }

    /// Remove a session; `false` for an unknown id or the last session.
    pub fn remove_session(&self, id: SessionId) -> bool {
        self.sessions.mutate(|store| store.remove(id))
    }

    pub fn update_session(&self, id: SessionId, patch: SessionPatch) -> Result<(), DomainError> {
        self.sessions.mutate(|store| store.update(id, patch))
    }

    pub fn clear_session(&self, id: SessionId) -> Result<(), DomainError> {
        self.sessions.mutate(|store| store.clear(id))
    }

    pub fn session(&self, id: SessionId) -> Option<Session> {
        self.sessions.read(|store| store.get(id).cloned())
    }

    pub fn sessions(&self) -> Vec<Session> {
        self.sessions.snapshot()
    }

    /// Session id at a 1-based display position.
    pub fn session_at(&self, position: usize) -> Option<SessionId> {
        self.sessions.read(|store| store.id_at(position))
    }

    pub fn catalog(&self) -> ProviderCatalog {
        self.sessions.read(|store| store.catalog().clone())
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Session>> {
        self.sessions.subscribe()
    }

    // ==================== Sending ====================

    pub fn send_mode(&self) -> SendMode {
        self.mode
    }

    pub fn set_send_mode(&mut self, mode: SendMode) {
        info!("Send mode: {}", mode);
        self.mode = mode;
    }

    pub async fn send_message(&self, id: SessionId, text: &str) -> SendOutcome {
        self.sender.execute(id, text).await
    }

    pub async fn broadcast_message(&self, text: &str) -> BroadcastReport {
        self.broadcaster.execute_with_progress(text, &NoProgress).await
    }

    pub async fn broadcast_with_progress(
        &self,
        text: &str,
        progress: &dyn BroadcastProgress,
    ) -> BroadcastReport {
        self.broadcaster.execute_with_progress(text, progress).await
    }

    /// Route text by the current send mode. `focus` is the target in
    /// individual mode and ignored in broadcast mode.
    pub async fn submit(
        &self,
        focus: SessionId,
        text: &str,
        progress: &dyn BroadcastProgress,
    ) -> SubmitOutcome {
        match self.mode {
            SendMode::Individual => SubmitOutcome::Single(focus, self.send_message(focus, text).await),
            SendMode::Broadcast => {
                SubmitOutcome::Broadcast(self.broadcast_with_progress(text, progress).await)
            }
        }
    }

    // ==================== Credentials ====================

    pub async fn test_credential(&self, provider_id: &str, secret: &str) -> CredentialStatus {
        self.tester.execute(provider_id, secret).await
    }

    /// Probe the stored credential for a provider.
    pub async fn test_saved_credential(&self, provider_id: &str) -> CredentialStatus {
        let secret = self.credentials.get(provider_id).unwrap_or_default();
        self.tester.execute(provider_id, &secret).await
    }

    pub fn save_credentials<I, P, S>(&self, entries: I) -> Result<SaveReport, KeyValueError>
    where
        I: IntoIterator<Item = (P, S)>,
        P: AsRef<str>,
        S: AsRef<str>,
    {
        self.saver.execute(entries)
    }

    pub fn credential_configured(&self, provider_id: &str) -> bool {
        self.credentials.is_configured(provider_id)
    }
}
