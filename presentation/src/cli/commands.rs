//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for chorus
#[derive(Parser, Debug)]
#[command(name = "chorus")]
#[command(author, version, about = "Chat with several LLM providers side by side")]
#[command(long_about = r#"
Chorus keeps several independent chat sessions open at once, each bound to
its own provider and model. Messages go to the focused session or, in
broadcast mode, to every session concurrently.

Configuration files are loaded from (in priority order):
1. --config <path>                  Explicit config file
2. ./chorus.toml or ./.chorus.toml  Project-level config
3. ~/.config/chorus/config.toml     Global config

Example:
  chorus
  chorus -s openai:gpt-4o -s anthropic -s google --broadcast
  chorus -s mistral -s grok "Explain Rust lifetimes in one paragraph"
"#)]
pub struct Cli {
    /// Broadcast this message to every session once and exit
    pub message: Option<String>,

    /// Start in broadcast mode
    #[arg(short, long)]
    pub broadcast: bool,

    /// Initial session as provider[:model] (can be specified multiple times)
    #[arg(short, long = "session", value_name = "PROVIDER[:MODEL]")]
    pub sessions: Vec<String>,

    /// Keep saved API keys in memory only
    #[arg(long)]
    pub no_persist: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_repeated_sessions_and_message() {
        let cli = Cli::parse_from([
            "chorus",
            "-s",
            "openai:gpt-4o",
            "--session",
            "cohere",
            "--broadcast",
            "hello there",
        ]);
        assert_eq!(cli.sessions, vec!["openai:gpt-4o", "cohere"]);
        assert!(cli.broadcast);
        assert_eq!(cli.message.as_deref(), Some("hello there"));
    }

    #[test]
    fn verbosity_counts() {
        let cli = Cli::parse_from(["chorus", "-vv", "-q"]);
        assert_eq!(cli.verbose, 2);
        assert!(cli.quiet);
        assert!(cli.message.is_none());
    }

    #[test]
    fn command_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
