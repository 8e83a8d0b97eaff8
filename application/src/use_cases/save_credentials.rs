//! Save credentials use case
//!
//! Persists provider secrets and lifts the credential-invalid flag from
//! every session of a provider that now has a non-empty secret.

use crate::credentials::CredentialStore;
use crate::ports::key_value_store::KeyValueError;
use crate::sessions::SharedSessions;
use tracing::info;

/// What a save changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveReport {
    /// Providers whose secret was written, in input order.
    pub saved: Vec<String>,
    /// Sessions whose credential-invalid flag was cleared.
    pub sessions_cleared: usize,
}

#[derive(Clone)]
pub struct SaveCredentialsUseCase {
    credentials: CredentialStore,
    sessions: SharedSessions,
}

impl SaveCredentialsUseCase {
    pub fn new(credentials: CredentialStore, sessions: SharedSessions) -> Self {
        Self {
            credentials,
            sessions,
        }
    }

    /// Store each `(provider_id, secret)` pair. An empty secret removes the
    /// provider's credential.
    ///
    /// Stops at the first write failure; earlier writes stay.
    pub fn execute<I, P, S>(&self, entries: I) -> Result<SaveReport, KeyValueError>
    where
        I: IntoIterator<Item = (P, S)>,
        P: AsRef<str>,
        S: AsRef<str>,
    {
        let mut report = SaveReport::default();

        for (provider_id, secret) in entries {
            let (provider_id, secret) = (provider_id.as_ref(), secret.as_ref());
            self.credentials.set(provider_id, secret)?;
            report.saved.push(provider_id.to_string());

            if !secret.trim().is_empty() {
                report.sessions_cleared += self
                    .sessions
                    .mutate(|store| store.clear_credential_flags(provider_id));
            }
        }

        info!(
            "Saved credentials for {} provider(s), cleared {} session flag(s)",
            report.saved.len(),
            report.sessions_cleared
        );
        Ok(report)
    }
}
