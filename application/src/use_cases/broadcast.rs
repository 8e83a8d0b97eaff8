//! Broadcast use case
//!
//! Sends the same text to every session concurrently. Each session goes
//! through the normal single-session path, so one session's failure or
//! slowness never affects another's log.

use crate::ports::conversation_logger::ConversationEvent;
use crate::ports::progress::{BroadcastProgress, NoProgress};
use crate::use_cases::send_message::{SendMessageUseCase, SendOutcome};
use chorus_domain::SessionId;
use serde_json::json;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Per-session outcomes of one broadcast, in completion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub outcomes: Vec<(SessionId, SendOutcome)>,
}

impl BroadcastReport {
    pub fn completed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| *o == SendOutcome::Completed)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| o.failure().is_some())
            .count()
    }

    pub fn outcome(&self, id: SessionId) -> Option<SendOutcome> {
        self.outcomes
            .iter()
            .find(|(sid, _)| *sid == id)
            .map(|(_, o)| *o)
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Use case for sending one message to every session
#[derive(Clone)]
pub struct BroadcastUseCase {
    sender: SendMessageUseCase,
}

impl BroadcastUseCase {
    pub fn new(sender: SendMessageUseCase) -> Self {
        Self { sender }
    }

    pub async fn execute(&self, text: &str) -> BroadcastReport {
        self.execute_with_progress(text, &NoProgress).await
    }

    /// Fan out to every session that exists when the broadcast starts.
    ///
    /// Returns once every session has resolved. Sessions created during the
    /// broadcast are not included.
    pub async fn execute_with_progress(
        &self,
        text: &str,
        progress: &dyn BroadcastProgress,
    ) -> BroadcastReport {
        if text.trim().is_empty() {
            return BroadcastReport::default();
        }

        let ids = self.sender.sessions().read(|store| store.ids());
        info!("Broadcasting to {} sessions", ids.len());
        progress.on_broadcast_start(ids.len());

        let mut join_set = JoinSet::new();
        for id in ids {
            let sender = self.sender.clone();
            let text = text.to_string();
            join_set.spawn(async move {
                let outcome = sender.execute(id, &text).await;
                (id, outcome)
            });
        }

        let mut report = BroadcastReport::default();
        while let Some(result) = join_set.join_next().await {
            match result {
                Ok((id, outcome)) => {
                    progress.on_session_complete(id, &outcome);
                    report.outcomes.push((id, outcome));
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                }
            }
        }

        progress.on_broadcast_complete();
        info!(
            "Broadcast finished: {} completed, {} failed",
            report.completed(),
            report.failed()
        );
        self.sender.log_event(ConversationEvent::new(
            "broadcast",
            json!({
                "content": text,
                "sessions": report.outcomes.len(),
                "completed": report.completed(),
                "failed": report.failed(),
            }),
        ));
        report
    }
}
