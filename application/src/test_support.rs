//! Scripted adapters and a wired-up fixture for use case tests.

use crate::credentials::CredentialStore;
use crate::ports::key_value_store::InMemoryKeyValueStore;
use crate::ports::provider_adapter::{ChatRequest, ProviderAdapter, ProviderFailure};
use crate::registry::ProviderRegistry;
use crate::sessions::SharedSessions;
use crate::use_cases::send_message::SendMessageUseCase;
use async_trait::async_trait;
use chorus_domain::{
    CredentialStatus, ProviderCatalog, Session, SessionId, SessionSeed, SessionStore,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Semaphore, watch};

/// Adapter that answers with a fixed result and records what it was sent.
pub(crate) struct ScriptedAdapter {
    id: String,
    reply: Result<String, ProviderFailure>,
    probe_status: Option<CredentialStatus>,
    gate: Option<Semaphore>,
    calls: watch::Sender<usize>,
    probes: Mutex<Vec<String>>,
    last_request: Mutex<Option<ChatRequest>>,
}

impl ScriptedAdapter {
    fn new(id: &str, reply: Result<String, ProviderFailure>) -> Self {
        Self {
            id: id.to_string(),
            reply,
            probe_status: None,
            gate: None,
            calls: watch::channel(0).0,
            probes: Mutex::new(Vec::new()),
            last_request: Mutex::new(None),
        }
    }

    pub(crate) fn replying(id: &str, text: &str) -> Self {
        Self::new(id, Ok(text.to_string()))
    }

    pub(crate) fn failing(id: &str, failure: ProviderFailure) -> Self {
        Self::new(id, Err(failure))
    }

    /// Hold every call until [`release`](Self::release).
    pub(crate) fn gated(mut self) -> Self {
        self.gate = Some(Semaphore::new(0));
        self
    }

    pub(crate) fn probing(mut self, status: CredentialStatus) -> Self {
        self.probe_status = Some(status);
        self
    }

    pub(crate) fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1024);
        }
    }

    pub(crate) fn calls(&self) -> usize {
        *self.calls.borrow()
    }

    pub(crate) async fn wait_for_calls(&self, n: usize) {
        let mut rx = self.calls.subscribe();
        rx.wait_for(|count| *count >= n).await.unwrap();
    }

    pub(crate) fn last_request(&self) -> Option<ChatRequest> {
        self.last_request.lock().unwrap().clone()
    }

    pub(crate) fn probed_with(&self) -> Vec<String> {
        self.probes.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProviderAdapter for ScriptedAdapter {
    fn provider_id(&self) -> &str {
        &self.id
    }

    async fn invoke(&self, request: &ChatRequest) -> Result<String, ProviderFailure> {
        *self.last_request.lock().unwrap() = Some(request.clone());
        self.calls.send_modify(|count| *count += 1);
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        self.reply.clone()
    }

    fn supports_probe(&self) -> bool {
        self.probe_status.is_some()
    }

    async fn probe(&self, credential: &str) -> CredentialStatus {
        self.probes.lock().unwrap().push(credential.to_string());
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        self.probe_status.unwrap_or(CredentialStatus::Error)
    }
}

/// Sessions seeded with openai/gpt-4 and anthropic/claude-3-sonnet, an
/// in-memory credential store, and the given adapters registered.
pub(crate) struct Fixture {
    pub sessions: SharedSessions,
    pub credentials: CredentialStore,
    pub registry: ProviderRegistry,
    pub sender: SendMessageUseCase,
    adapters: HashMap<String, Arc<ScriptedAdapter>>,
}

impl Fixture {
    pub(crate) fn new(adapters: Vec<ScriptedAdapter>) -> Self {
        let (store, issues) =
            SessionStore::with_seeds(ProviderCatalog::default(), &SessionSeed::defaults());
        assert!(issues.is_empty());

        let mut registry = ProviderRegistry::new();
        let mut by_id = HashMap::new();
        for adapter in adapters {
            let adapter = Arc::new(adapter);
            registry.register(adapter.clone());
            by_id.insert(adapter.id.clone(), adapter);
        }

        let sessions = SharedSessions::new(store);
        let credentials = CredentialStore::new(Arc::new(InMemoryKeyValueStore::new()));
        let sender =
            SendMessageUseCase::new(registry.clone(), sessions.clone(), credentials.clone());

        Self {
            sessions,
            credentials,
            registry,
            sender,
            adapters: by_id,
        }
    }

    pub(crate) fn adapter(&self, id: &str) -> &ScriptedAdapter {
        &self.adapters[id]
    }

    /// Id of the session at a zero-based position.
    pub(crate) fn id(&self, index: usize) -> SessionId {
        self.sessions.read(|s| s.ids()[index])
    }

    pub(crate) fn session(&self, id: SessionId) -> Session {
        self.sessions.read(|s| s.get(id).cloned()).unwrap()
    }
}
