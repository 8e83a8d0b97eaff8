//! Session store: the bounded collection of chat sessions.
//!
//! The store is plain synchronous state. Every method is a complete
//! read-modify-write, so wrapping it in a mutex that is never held across an
//! `.await` is enough to serialize concurrent sends.

use crate::core::error::DomainError;
use crate::providers::ProviderCatalog;
use crate::session::entities::{Message, Session, SessionId, SessionPatch};

/// Upper bound on the number of sessions.
pub const MAX_SESSIONS: usize = 8;

/// Lower bound on the number of sessions.
pub const MIN_SESSIONS: usize = 1;

/// A provider/model pair used to seed the initial session set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSeed {
    pub provider_id: String,
    /// `None` selects the provider's default model.
    pub model_id: Option<String>,
}

impl SessionSeed {
    pub fn new(provider_id: impl Into<String>, model_id: Option<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            model_id,
        }
    }

    /// Parse `provider` or `provider:model`.
    pub fn parse(spec: &str) -> Self {
        match spec.split_once(':') {
            Some((provider, model)) if !model.trim().is_empty() => {
                Self::new(provider.trim(), Some(model.trim().to_string()))
            }
            Some((provider, _)) => Self::new(provider.trim(), None),
            None => Self::new(spec.trim(), None),
        }
    }

    /// The sessions a fresh window starts with.
    pub fn defaults() -> Vec<SessionSeed> {
        vec![
            SessionSeed::new("openai", Some("gpt-4".to_string())),
            SessionSeed::new("anthropic", Some("claude-3-sonnet".to_string())),
        ]
    }
}

/// Snapshot of what a provider call needs, taken when a request starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub session_id: SessionId,
    pub provider_id: String,
    pub model_id: String,
    pub system_prompt: Option<String>,
    /// Full history including the user message that was just appended.
    pub history: Vec<Message>,
}

/// Owns the sessions and enforces the count bound and catalog invariants.
#[derive(Debug, Clone)]
pub struct SessionStore {
    catalog: ProviderCatalog,
    sessions: Vec<Session>,
    next_id: u64,
}

impl SessionStore {
    /// Create a store holding a single session chosen by the default policy.
    pub fn new(catalog: ProviderCatalog) -> Self {
        let mut store = Self {
            catalog,
            sessions: Vec::new(),
            next_id: 1,
        };
        store.push_default();
        store
    }

    /// Create a store from seeds.
    ///
    /// Seeds naming an unknown provider or model are skipped and returned as
    /// issues. Seeds beyond [`MAX_SESSIONS`] are ignored. If no seed is
    /// usable the store falls back to [`SessionStore::new`].
    pub fn with_seeds(catalog: ProviderCatalog, seeds: &[SessionSeed]) -> (Self, Vec<DomainError>) {
        let mut store = Self {
            catalog,
            sessions: Vec::new(),
            next_id: 1,
        };
        let mut issues = Vec::new();

        for seed in seeds {
            if store.sessions.len() >= MAX_SESSIONS {
                break;
            }
            match store.resolve_seed(seed) {
                Ok((provider, model)) => {
                    let id = store.allocate_id();
                    store.sessions.push(Session::new(id, provider, model));
                }
                Err(e) => issues.push(e),
            }
        }

        if store.sessions.is_empty() {
            store.push_default();
        }

        (store, issues)
    }

    fn resolve_seed(&self, seed: &SessionSeed) -> Result<(String, String), DomainError> {
        let descriptor = self.catalog.require(&seed.provider_id)?;
        let model = match &seed.model_id {
            Some(model) if descriptor.supports_model(model) => model.clone(),
            Some(model) => {
                return Err(DomainError::UnknownModel {
                    provider: descriptor.id.clone(),
                    model: model.clone(),
                });
            }
            None => descriptor.default_model().to_string(),
        };
        Ok((descriptor.id.clone(), model))
    }

    fn allocate_id(&mut self) -> SessionId {
        let id = SessionId(self.next_id);
        self.next_id += 1;
        id
    }

    fn push_default(&mut self) -> SessionId {
        let descriptor = self
            .catalog
            .iter()
            .find(|p| !self.sessions.iter().any(|s| s.provider_id == p.id))
            .unwrap_or_else(|| self.catalog.first());
        let provider = descriptor.id.clone();
        let model = descriptor.default_model().to_string();

        let id = self.allocate_id();
        self.sessions.push(Session::new(id, provider, model));
        id
    }

    fn find_mut(&mut self, id: SessionId) -> Result<&mut Session, DomainError> {
        self.sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(DomainError::SessionNotFound(id.0))
    }

    // ==================== Lifecycle ====================

    /// Add a session. Returns `None` (and changes nothing) at [`MAX_SESSIONS`].
    ///
    /// The new session uses the first provider, in catalog order, that no
    /// existing session uses; if every provider is taken, the first one.
    pub fn create(&mut self) -> Option<SessionId> {
        if self.sessions.len() >= MAX_SESSIONS {
            return None;
        }
        Some(self.push_default())
    }

    /// Remove a session. Returns `false` if it is the last one or unknown.
    pub fn remove(&mut self, id: SessionId) -> bool {
        if self.sessions.len() <= MIN_SESSIONS {
            return false;
        }
        let before = self.sessions.len();
        self.sessions.retain(|s| s.id != id);
        self.sessions.len() != before
    }

    /// Merge a partial update into a session.
    ///
    /// Switching to a different provider resets the model to that
    /// provider's default (unless the patch also names a model it offers)
    /// and clears the credential-invalid flag. On error nothing changes.
    pub fn update(&mut self, id: SessionId, patch: SessionPatch) -> Result<(), DomainError> {
        let current = self.get(id).ok_or(DomainError::SessionNotFound(id.0))?;

        let mut provider = current.provider_id.clone();
        let mut model = current.model_id.clone();
        let mut invalid = patch
            .is_credential_invalid
            .unwrap_or(current.is_credential_invalid);

        if let Some(new_provider) = &patch.provider_id {
            let descriptor = self.catalog.require(new_provider)?;
            if descriptor.id != provider {
                model = descriptor.default_model().to_string();
                invalid = false;
            }
            provider = descriptor.id.clone();
        }

        if let Some(new_model) = &patch.model_id {
            let descriptor = self.catalog.require(&provider)?;
            if !descriptor.supports_model(new_model) {
                return Err(DomainError::UnknownModel {
                    provider,
                    model: new_model.clone(),
                });
            }
            model = new_model.clone();
        }

        let session = self.find_mut(id)?;
        session.provider_id = provider;
        session.model_id = model;
        session.is_credential_invalid = invalid;
        if let Some(prompt) = patch.system_prompt {
            session.system_prompt = prompt;
        }
        Ok(())
    }

    /// Empty a session's log.
    ///
    /// Refused while a request is in flight so the pending reply cannot land
    /// in an emptied log without its user message.
    pub fn clear(&mut self, id: SessionId) -> Result<(), DomainError> {
        let session = self.find_mut(id)?;
        if session.is_loading {
            return Err(DomainError::SessionBusy(id.0));
        }
        session.messages.clear();
        Ok(())
    }

    // ==================== Send bookkeeping ====================

    /// Append the user message and mark the session loading.
    pub fn begin_request(
        &mut self,
        id: SessionId,
        text: impl Into<String>,
    ) -> Result<PendingRequest, DomainError> {
        let session = self.find_mut(id)?;
        if session.is_loading {
            return Err(DomainError::SessionBusy(id.0));
        }
        session.messages.push(Message::user(text));
        session.is_loading = true;

        Ok(PendingRequest {
            session_id: id,
            provider_id: session.provider_id.clone(),
            model_id: session.model_id.clone(),
            system_prompt: session.system_prompt().map(str::to_string),
            history: session.messages.clone(),
        })
    }

    /// Append the reply for an in-flight request and clear loading.
    ///
    /// `credential_invalid` overwrites the sticky flag when given.
    pub fn complete_request(
        &mut self,
        id: SessionId,
        reply: Message,
        credential_invalid: Option<bool>,
    ) -> Result<(), DomainError> {
        let session = self.find_mut(id)?;
        session.messages.push(reply);
        session.is_loading = false;
        if let Some(flag) = credential_invalid {
            session.is_credential_invalid = flag;
        }
        Ok(())
    }

    /// Append a user message and its reply in one step, without a request.
    pub fn record_exchange(
        &mut self,
        id: SessionId,
        user: Message,
        reply: Message,
    ) -> Result<(), DomainError> {
        let session = self.find_mut(id)?;
        if session.is_loading {
            return Err(DomainError::SessionBusy(id.0));
        }
        session.messages.push(user);
        session.messages.push(reply);
        Ok(())
    }

    /// Clear the credential-invalid flag on every session of a provider.
    ///
    /// Returns the number of sessions whose flag changed.
    pub fn clear_credential_flags(&mut self, provider_id: &str) -> usize {
        let mut changed = 0;
        for session in self
            .sessions
            .iter_mut()
            .filter(|s| s.provider_id == provider_id && s.is_credential_invalid)
        {
            session.is_credential_invalid = false;
            changed += 1;
        }
        changed
    }

    // ==================== Queries ====================

    pub fn get(&self, id: SessionId) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn ids(&self) -> Vec<SessionId> {
        self.sessions.iter().map(|s| s.id).collect()
    }

    /// Session at a 1-based display position.
    pub fn id_at(&self, position: usize) -> Option<SessionId> {
        position
            .checked_sub(1)
            .and_then(|i| self.sessions.get(i))
            .map(|s| s.id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.sessions.len() >= MAX_SESSIONS
    }

    pub fn catalog(&self) -> &ProviderCatalog {
        &self.catalog
    }
}
