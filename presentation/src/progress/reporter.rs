//! Progress reporting for broadcasts

use crate::output::console::ConsoleFormatter;
use chorus_application::{BroadcastProgress, SendOutcome};
use chorus_domain::{Session, SessionId};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::sync::Mutex;

/// Session labels keyed by id, captured when the broadcast starts.
fn labels(sessions: &[Session]) -> HashMap<SessionId, String> {
    sessions
        .iter()
        .enumerate()
        .map(|(index, s)| (s.id(), ConsoleFormatter::session_label(index + 1, s)))
        .collect()
}

fn outcome_line(label: &str, outcome: &SendOutcome) -> String {
    match outcome {
        SendOutcome::Completed => format!("{} {}", "v".green(), label),
        SendOutcome::Failed(kind) => format!("{} {} ({})", "x".red(), label, kind),
        SendOutcome::Busy => format!("{} {} (busy)", "-".yellow(), label),
        SendOutcome::Ignored => format!("{} {} (skipped)", "-".dimmed(), label),
    }
}

/// Reports broadcast progress with a progress bar
pub struct ProgressReporter {
    labels: HashMap<SessionId, String>,
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new(sessions: &[Session]) -> Self {
        Self {
            labels: labels(sessions),
            bar: Mutex::new(None),
        }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn label(&self, id: SessionId) -> String {
        self.labels
            .get(&id)
            .cloned()
            .unwrap_or_else(|| format!("session {}", id))
    }
}

impl BroadcastProgress for ProgressReporter {
    fn on_broadcast_start(&self, total_sessions: usize) {
        let pb = ProgressBar::new(total_sessions as u64);
        pb.set_style(Self::bar_style());
        pb.set_prefix("Broadcast");
        pb.set_message("Waiting for replies...");

        if let Ok(mut bar) = self.bar.lock() {
            *bar = Some(pb);
        }
    }

    fn on_session_complete(&self, session_id: SessionId, outcome: &SendOutcome) {
        if let Ok(bar) = self.bar.lock()
            && let Some(pb) = bar.as_ref()
        {
            pb.set_message(outcome_line(&self.label(session_id), outcome));
            pb.inc(1);
        }
    }

    fn on_broadcast_complete(&self) {
        if let Ok(mut bar) = self.bar.lock()
            && let Some(pb) = bar.take()
        {
            pb.finish_and_clear();
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress {
    labels: HashMap<SessionId, String>,
}

impl SimpleProgress {
    pub fn new(sessions: &[Session]) -> Self {
        Self {
            labels: labels(sessions),
        }
    }
}

impl BroadcastProgress for SimpleProgress {
    fn on_broadcast_start(&self, total_sessions: usize) {
        println!(
            "{} {} ({} sessions)",
            "->".cyan(),
            "Broadcast".bold(),
            total_sessions
        );
    }

    fn on_session_complete(&self, session_id: SessionId, outcome: &SendOutcome) {
        let label = self
            .labels
            .get(&session_id)
            .cloned()
            .unwrap_or_else(|| format!("session {}", session_id));
        println!("  {}", outcome_line(&label, outcome));
    }

    fn on_broadcast_complete(&self) {
        println!();
    }
}
