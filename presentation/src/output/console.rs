//! Console output formatter for chat sessions

use chorus_application::{BroadcastReport, SendOutcome};
use chorus_domain::{
    CredentialStatus, Message, ProviderCatalog, Role, SendMode, Session, SessionId, truncate,
};
use colored::Colorize;

/// Formats sessions, replies and status lines for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// One-line label: `#2 anthropic/claude-3-opus`
    pub fn session_label(position: usize, session: &Session) -> String {
        format!(
            "#{} {}/{}",
            position,
            session.provider_id(),
            session.model_id()
        )
    }

    /// Format a single message with its role marker
    pub fn format_message(message: &Message) -> String {
        match message.role {
            Role::User => format!("{} {}", "you>".cyan().bold(), message.content),
            Role::Assistant if message.is_failure() => {
                format!("{} {}", "!!".red().bold(), message.content.red())
            }
            Role::Assistant => format!(
                "{}\n{}",
                "assistant>".green().bold(),
                Self::indent(&message.content, "  ")
            ),
        }
    }

    /// Format the complete history of one session
    pub fn format_session(position: usize, session: &Session, catalog: &ProviderCatalog) -> String {
        let mut output = String::new();

        output.push_str(&Self::header(&format!(
            "Session {}: {}",
            Self::session_label(position, session),
            catalog.display_name(session.provider_id())
        )));
        output.push('\n');

        if let Some(prompt) = session.system_prompt() {
            output.push_str(&format!("{} {}\n", "System:".dimmed(), prompt.dimmed()));
        }

        if session.messages().is_empty() {
            output.push_str(&format!("{}\n", "(no messages yet)".dimmed()));
        }
        for message in session.messages() {
            output.push_str(&Self::format_message(message));
            output.push_str("\n\n");
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format the result of a single send: the newest message, or a note
    /// when nothing was appended.
    pub fn format_outcome(position: usize, session: &Session, outcome: SendOutcome) -> String {
        match outcome {
            SendOutcome::Ignored => format!("{}", "Nothing sent.".dimmed()),
            SendOutcome::Busy => format!(
                "{} {} is still waiting for a reply.",
                "busy".yellow().bold(),
                Self::session_label(position, session)
            ),
            SendOutcome::Completed | SendOutcome::Failed(_) => {
                let title = format!("── {} ──", Self::session_label(position, session));
                let title = if outcome.failure().is_some() {
                    title.red().bold()
                } else {
                    title.yellow().bold()
                };
                match session.last_message() {
                    Some(message) => format!("{}\n{}\n", title, Self::format_message(message)),
                    None => format!("{}\n", title),
                }
            }
        }
    }

    /// Format a broadcast: one block per session in display order
    pub fn format_report(report: &BroadcastReport, sessions: &[Session]) -> String {
        let mut output = String::new();

        for (index, session) in sessions.iter().enumerate() {
            let Some(outcome) = report.outcome(session.id()) else {
                continue;
            };
            output.push_str(&Self::format_outcome(index + 1, session, outcome));
            output.push('\n');
        }

        output.push_str(&format!(
            "{} {} replied, {} failed, {} skipped\n",
            "Broadcast:".cyan().bold(),
            report.completed(),
            report.failed(),
            report.outcomes.len() - report.completed() - report.failed()
        ));
        output
    }

    /// Format the session list with focus and state markers
    pub fn format_sessions(sessions: &[Session], focus: SessionId, mode: SendMode) -> String {
        let mut output = String::new();

        output.push_str(&format!("{} {}\n", "Mode:".cyan().bold(), mode));
        for (index, session) in sessions.iter().enumerate() {
            let marker = if session.id() == focus { "*" } else { " " };
            let mut line = format!(
                "{} {}  ({} messages)",
                marker,
                Self::session_label(index + 1, session),
                session.messages().len()
            );
            if session.system_prompt().is_some() {
                line.push_str("  [system]");
            }
            if session.is_loading() {
                line.push_str(&format!("  {}", "[waiting]".yellow()));
            }
            if session.is_credential_invalid() {
                line.push_str(&format!("  {}", "[key rejected]".red()));
            }
            if let Some(last) = session.last_message() {
                line.push_str(&format!("\n      {}", truncate(&last.content, 60).dimmed()));
            }
            output.push_str(&line);
            output.push('\n');
        }
        output
    }

    /// Format the provider catalog with key status
    pub fn format_providers(catalog: &ProviderCatalog, configured: impl Fn(&str) -> bool) -> String {
        let mut output = String::new();

        for descriptor in catalog.iter() {
            let key = if configured(&descriptor.id) {
                "key set".green()
            } else {
                "no key".dimmed()
            };
            output.push_str(&format!(
                "{} ({}) [{}]\n",
                descriptor.display_name.bold(),
                descriptor.id,
                key
            ));
            output.push_str(&format!("  {}\n", descriptor.models.join(", ")));
        }
        output
    }

    pub fn format_credential_status(provider_id: &str, status: CredentialStatus) -> String {
        match status {
            CredentialStatus::Valid => format!("{} key for {} is valid", "v".green(), provider_id),
            CredentialStatus::Invalid => {
                format!("{} key for {} was rejected", "x".red(), provider_id)
            }
            CredentialStatus::Error => format!(
                "{} could not check the key for {}",
                "?".yellow(),
                provider_id
            ),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn footer() -> String {
        format!("{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
