//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::chat::command::{HELP, ReplCommand};
use crate::config::{OutputConfig, ReplConfig};
use crate::output::console::ConsoleFormatter;
use crate::progress::reporter::ProgressReporter;
use chorus_application::{BroadcastProgress, ChatController, NoProgress, SubmitOutcome};
use chorus_domain::{MAX_SESSIONS, SendMode, SessionId, SessionPatch};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use tracing::debug;

/// What the loop does after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandReply {
    Continue(String),
    Exit(String),
}

/// Whether a line may be written to the history file. Lines that carry an
/// API key (`/key <provider> <secret>`, `/test <provider> <secret>`) never are.
fn records_history(line: &str) -> bool {
    let mut words = line.split_whitespace();
    match words.next() {
        Some("/key") => false,
        Some("/test") => words.nth(1).is_none(),
        _ => true,
    }
}

/// Interactive chat REPL
pub struct ChatRepl {
    controller: ChatController,
    focus: SessionId,
    output: OutputConfig,
    repl: ReplConfig,
}

impl ChatRepl {
    /// Create a new ChatRepl focused on the first session
    pub fn new(controller: ChatController) -> Self {
        let focus = controller.session_at(1).unwrap_or(SessionId(1));
        Self {
            controller,
            focus,
            output: OutputConfig::default(),
            repl: ReplConfig::default(),
        }
    }

    pub fn with_output(mut self, output: OutputConfig) -> Self {
        self.output = output;
        self
    }

    pub fn with_repl_config(mut self, repl: ReplConfig) -> Self {
        self.repl = repl;
        self
    }

    pub fn focus(&self) -> SessionId {
        self.focus
    }

    pub fn controller(&self) -> &ChatController {
        &self.controller
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        let history_path = self.repl.history_file.clone();
        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        loop {
            let readline = rl.readline(&self.prompt());

            match readline {
                Ok(line) => {
                    let line = line.trim();

                    if line.is_empty() {
                        continue;
                    }

                    if records_history(line) {
                        let _ = rl.add_history_entry(line);
                    }

                    if line.starts_with('/') {
                        match ReplCommand::parse(line) {
                            Ok(command) => match self.execute(command).await {
                                CommandReply::Continue(text) => Self::print_block(&text),
                                CommandReply::Exit(text) => {
                                    println!("{}", text);
                                    break;
                                }
                            },
                            Err(usage) => println!("{}", usage.yellow()),
                        }
                        continue;
                    }

                    let text = self.process_message(line).await;
                    Self::print_block(&text);
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    fn print_block(text: &str) {
        if !text.is_empty() {
            println!();
            println!("{}", text.trim_end());
            println!();
        }
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│                   Chorus                    │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        print!(
            "{}",
            ConsoleFormatter::format_sessions(
                &self.controller.sessions(),
                self.focus,
                self.controller.send_mode()
            )
        );
        println!();
        println!("Type a message to send it, or /help for commands.");
        println!();
    }

    fn prompt(&self) -> String {
        if self.controller.send_mode().is_broadcast() {
            return "[all] >>> ".to_string();
        }
        let sessions = self.controller.sessions();
        match sessions.iter().position(|s| s.id() == self.focus) {
            Some(index) => format!(
                "[{}] >>> ",
                ConsoleFormatter::session_label(index + 1, &sessions[index])
            ),
            None => ">>> ".to_string(),
        }
    }

    /// Send text according to the current mode and format what happened.
    pub async fn process_message(&mut self, text: &str) -> String {
        let sessions = self.controller.sessions();
        let progress: Box<dyn BroadcastProgress> = if self.output.show_progress {
            Box::new(ProgressReporter::new(&sessions))
        } else {
            Box::new(NoProgress)
        };

        let outcome = self
            .controller
            .submit(self.focus, text, progress.as_ref())
            .await;

        let sessions = self.controller.sessions();
        match outcome {
            SubmitOutcome::Single(id, outcome) => {
                match sessions.iter().position(|s| s.id() == id) {
                    Some(index) => {
                        ConsoleFormatter::format_outcome(index + 1, &sessions[index], outcome)
                    }
                    None => format!("Session {} is gone.", id),
                }
            }
            SubmitOutcome::Broadcast(report) => ConsoleFormatter::format_report(&report, &sessions),
        }
    }

    /// Execute one slash command.
    pub async fn execute(&mut self, command: ReplCommand) -> CommandReply {
        debug!("REPL command: {:?}", command);

        let text = match command {
            ReplCommand::Quit => return CommandReply::Exit("Bye!".to_string()),
            ReplCommand::Help => Self::help(),
            ReplCommand::New => match self.controller.create_session() {
                Some(id) => {
                    self.focus = id;
                    format!("Opened {}", self.label(id))
                }
                None => format!("Already at the limit of {} sessions.", MAX_SESSIONS),
            },
            ReplCommand::Remove(n) => match self.resolve(n) {
                Err(text) => text,
                Ok(id) => {
                    let label = self.label(id);
                    if !self.controller.remove_session(id) {
                        "The last session cannot be closed.".to_string()
                    } else {
                        if self.focus == id {
                            self.focus = self.controller.session_at(1).unwrap_or(self.focus);
                        }
                        format!("Closed {}", label)
                    }
                }
            },
            ReplCommand::Use(n) => match self.resolve(n) {
                Err(text) => text,
                Ok(id) => {
                    self.focus = id;
                    format!("Focused {}", self.label(id))
                }
            },
            ReplCommand::Provider(n, provider) => {
                self.apply(n, SessionPatch::provider(provider))
            }
            ReplCommand::Model(n, model) => self.apply(n, SessionPatch::model(model)),
            ReplCommand::System(n, prompt) => {
                self.apply(n, SessionPatch::system_prompt(prompt))
            }
            ReplCommand::Clear(n) => match self.resolve(n) {
                Err(text) => text,
                Ok(id) => match self.controller.clear_session(id) {
                    Ok(()) => format!("Cleared {}", self.label(id)),
                    Err(e) => e.to_string(),
                },
            },
            ReplCommand::Mode(None) => self.controller.send_mode().short_description().to_string(),
            ReplCommand::Mode(Some(mode)) => {
                self.controller.set_send_mode(mode);
                mode.short_description().to_string()
            }
            ReplCommand::Key(provider, secret) => self.save_key(&provider, &secret),
            ReplCommand::Test(provider, secret) => self.test_key(&provider, secret).await,
            ReplCommand::List => ConsoleFormatter::format_sessions(
                &self.controller.sessions(),
                self.focus,
                self.controller.send_mode(),
            ),
            ReplCommand::Show(n) => {
                let id = match n {
                    Some(n) => self.resolve(n),
                    None => Ok(self.focus),
                };
                match id {
                    Err(text) => text,
                    Ok(id) => {
                        let sessions = self.controller.sessions();
                        match sessions.iter().position(|s| s.id() == id) {
                            Some(index) => ConsoleFormatter::format_session(
                                index + 1,
                                &sessions[index],
                                &self.controller.catalog(),
                            ),
                            None => format!("Session {} is gone.", id),
                        }
                    }
                }
            }
            ReplCommand::Providers => {
                let controller = &self.controller;
                ConsoleFormatter::format_providers(&controller.catalog(), |id| {
                    controller.credential_configured(id)
                })
            }
        };

        CommandReply::Continue(text)
    }

    fn help() -> String {
        let mut output = String::from("Commands:\n");
        for (usage, description) in HELP {
            output.push_str(&format!("  {:<30} - {}\n", usage, description));
        }
        output.push_str(&format!(
            "\nPlain text goes to the focused session ({}) or to every session ({}).\n",
            SendMode::Individual,
            SendMode::Broadcast
        ));
        output
    }

    fn resolve(&self, position: usize) -> Result<SessionId, String> {
        self.controller
            .session_at(position)
            .ok_or_else(|| format!("No session {}. Use /list to see them.", position))
    }

    fn label(&self, id: SessionId) -> String {
        let sessions = self.controller.sessions();
        sessions
            .iter()
            .position(|s| s.id() == id)
            .map(|index| ConsoleFormatter::session_label(index + 1, &sessions[index]))
            .unwrap_or_else(|| id.to_string())
    }

    fn apply(&self, position: usize, patch: SessionPatch) -> String {
        let id = match self.resolve(position) {
            Ok(id) => id,
            Err(text) => return text,
        };
        match self.controller.update_session(id, patch) {
            Ok(()) => format!("Updated {}", self.label(id)),
            Err(e) => e.to_string(),
        }
    }

    fn save_key(&self, provider: &str, secret: &str) -> String {
        if !self.controller.catalog().contains(provider) {
            return format!("Unknown provider: {}", provider);
        }
        match self.controller.save_credentials([(provider, secret)]) {
            Ok(report) if report.sessions_cleared > 0 => format!(
                "Saved key for {} ({} sessions may retry)",
                provider, report.sessions_cleared
            ),
            Ok(_) => format!("Saved key for {}", provider),
            Err(e) => format!("Could not save key for {}: {}", provider, e),
        }
    }

    async fn test_key(&self, provider: &str, secret: Option<String>) -> String {
        let status = match secret {
            Some(secret) => self.controller.test_credential(provider, &secret).await,
            None => {
                if !self.controller.credential_configured(provider) {
                    return format!("No key saved for {}. Use /key {} <secret>.", provider, provider);
                }
                self.controller.test_saved_credential(provider).await
            }
        };
        ConsoleFormatter::format_credential_status(provider, status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chorus_application::{
        ChatRequest, InMemoryKeyValueStore, KeyValueStore, ProviderAdapter, ProviderFailure,
        ProviderRegistry,
    };
    use chorus_domain::{CredentialStatus, ProviderCatalog, Role, SessionSeed, SessionStore};
    use std::sync::Arc;

    struct EchoAdapter(&'static str);

    #[async_trait]
    impl ProviderAdapter for EchoAdapter {
        fn provider_id(&self) -> &str {
            self.0
        }

        async fn invoke(&self, request: &ChatRequest) -> Result<String, ProviderFailure> {
            let last = request
                .history
                .last()
                .map(|m| m.content.clone())
                .unwrap_or_default();
            Ok(format!("{} heard: {}", self.0, last))
        }

        fn supports_probe(&self) -> bool {
            true
        }

        async fn probe(&self, credential: &str) -> CredentialStatus {
            if credential == "good" {
                CredentialStatus::Valid
            } else {
                CredentialStatus::Invalid
            }
        }
    }

    fn repl() -> ChatRepl {
        colored::control::set_override(false);
        let registry = ProviderRegistry::new()
            .with(Arc::new(EchoAdapter("openai")))
            .with(Arc::new(EchoAdapter("anthropic")));
        let (store, _) =
            SessionStore::with_seeds(ProviderCatalog::default(), &SessionSeed::defaults());
        let keys = Arc::new(InMemoryKeyValueStore::new());
        keys.set("credential.openai", "good").unwrap();
        keys.set("credential.anthropic", "good").unwrap();

        let controller = ChatController::new(registry, store, keys);
        ChatRepl::new(controller).with_output(OutputConfig {
            color: false,
            show_progress: true,
        })
    }

    async fn run(repl: &mut ChatRepl, line: &str) -> String {
        match repl.execute(ReplCommand::parse(line).unwrap()).await {
            CommandReply::Continue(text) => text,
            CommandReply::Exit(text) => text,
        }
    }

    #[tokio::test]
    async fn plain_text_goes_to_the_focused_session() {
        let mut repl = repl();
        let text = repl.process_message("hello").await;

        assert!(text.contains("openai heard: hello"));
        let sessions = repl.controller().sessions();
        assert_eq!(sessions[0].messages().len(), 2);
        assert!(sessions[1].messages().is_empty());
    }

    #[tokio::test]
    async fn broadcast_mode_reaches_every_session() {
        let mut repl = repl();
        run(&mut repl, "/mode broadcast").await;
        let text = repl.process_message("hi all").await;

        assert!(text.contains("2 replied, 0 failed"));
        for session in repl.controller().sessions() {
            assert_eq!(session.messages().len(), 2);
            assert_eq!(session.messages()[1].role, Role::Assistant);
        }
    }

    #[tokio::test]
    async fn use_moves_focus() {
        let mut repl = repl();
        run(&mut repl, "/use 2").await;
        repl.process_message("second").await;

        let sessions = repl.controller().sessions();
        assert!(sessions[0].messages().is_empty());
        assert_eq!(sessions[1].messages()[1].content, "anthropic heard: second");
    }

    #[tokio::test]
    async fn new_and_remove_keep_focus_valid() {
        let mut repl = repl();
        let text = run(&mut repl, "/new").await;
        assert!(text.starts_with("Opened #3"));
        let third = repl.controller().session_at(3).unwrap();
        assert_eq!(repl.focus(), third);

        run(&mut repl, "/rm 3").await;
        assert_eq!(repl.focus(), repl.controller().session_at(1).unwrap());

        run(&mut repl, "/rm 2").await;
        let text = run(&mut repl, "/rm 1").await;
        assert_eq!(text, "The last session cannot be closed.");
        assert_eq!(repl.controller().sessions().len(), 1);
    }

    #[tokio::test]
    async fn provider_and_model_changes_report_errors() {
        let mut repl = repl();
        assert_eq!(
            run(&mut repl, "/provider 1 cohere").await,
            "Updated #1 cohere/command"
        );
        let text = run(&mut repl, "/model 1 gpt-4").await;
        assert!(text.contains("not offered"));
        let text = run(&mut repl, "/use 7").await;
        assert!(text.starts_with("No session 7"));
    }

    #[tokio::test]
    async fn system_prompt_set_and_cleared() {
        let mut repl = repl();
        run(&mut repl, "/system 1 Be brief.").await;
        let id = repl.controller().session_at(1).unwrap();
        assert_eq!(
            repl.controller().session(id).unwrap().system_prompt(),
            Some("Be brief.")
        );

        run(&mut repl, "/system 1 -").await;
        assert_eq!(repl.controller().session(id).unwrap().system_prompt(), None);
    }

    #[tokio::test]
    async fn key_and_test_commands() {
        let mut repl = repl();
        assert_eq!(run(&mut repl, "/key cohere abc").await, "Saved key for cohere");
        assert!(repl.controller().credential_configured("cohere"));

        let text = run(&mut repl, "/key bard abc").await;
        assert_eq!(text, "Unknown provider: bard");

        let text = run(&mut repl, "/test openai").await;
        assert_eq!(text, "v key for openai is valid");
        let text = run(&mut repl, "/test openai nope").await;
        assert_eq!(text, "x key for openai was rejected");
        let text = run(&mut repl, "/test google").await;
        assert!(text.starts_with("No key saved for google"));
    }

    #[tokio::test]
    async fn clear_and_show() {
        let mut repl = repl();
        repl.process_message("hello").await;
        let text = run(&mut repl, "/show").await;
        assert!(text.contains("you> hello"));

        run(&mut repl, "/clear 1").await;
        let text = run(&mut repl, "/show 1").await;
        assert!(text.contains("(no messages yet)"));
    }

    #[tokio::test]
    async fn history_file_comes_from_repl_config() {
        let repl = repl().with_repl_config(ReplConfig { history_file: None });
        assert_eq!(repl.repl.history_file, None);

        let path = std::path::PathBuf::from("/tmp/chorus-history.txt");
        let repl = repl.with_repl_config(ReplConfig {
            history_file: Some(path.clone()),
        });
        assert_eq!(repl.repl.history_file, Some(path));
    }

    #[test]
    fn lines_with_secrets_stay_out_of_history() {
        assert!(!records_history("/key openai sk-123"));
        assert!(!records_history("/key"));
        assert!(!records_history("/test google AIzaSECRET123"));
        assert!(!records_history("/test   google   AIzaSECRET123"));
        assert!(records_history("/test google"));
        assert!(records_history("/use 2"));
        assert!(records_history("what is a monad?"));
        assert!(records_history("/keyboard"));
    }

    #[tokio::test]
    async fn quit_exits() {
        let mut repl = repl();
        assert_eq!(
            repl.execute(ReplCommand::Quit).await,
            CommandReply::Exit("Bye!".to_string())
        );
    }
}
