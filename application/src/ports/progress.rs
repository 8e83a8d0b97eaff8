//! Progress notification port
//!
//! Defines the interface for reporting progress while a broadcast is in flight.

use crate::use_cases::send_message::SendOutcome;
use chorus_domain::SessionId;

/// Callback for broadcast progress.
///
/// Implementations live in the presentation layer (progress bars, plain
/// lines). Completions arrive in whatever order the providers answer.
pub trait BroadcastProgress: Send + Sync {
    /// Called once before any session request starts
    fn on_broadcast_start(&self, total_sessions: usize);

    /// Called as soon as one session's send resolves
    fn on_session_complete(&self, session_id: SessionId, outcome: &SendOutcome);

    /// Called after every session has resolved
    fn on_broadcast_complete(&self) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl BroadcastProgress for NoProgress {
    fn on_broadcast_start(&self, _total_sessions: usize) {}
    fn on_session_complete(&self, _session_id: SessionId, _outcome: &SendOutcome) {}
}
