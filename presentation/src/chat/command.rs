//! Slash command parsing for the chat REPL

use chorus_domain::SendMode;

/// A parsed `/command`. Session numbers are 1-based display positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    New,
    Remove(usize),
    Use(usize),
    Provider(usize, String),
    Model(usize, String),
    /// `None` clears the prompt (`/system <n> -`)
    System(usize, Option<String>),
    Clear(usize),
    Mode(Option<SendMode>),
    Key(String, String),
    Test(String, Option<String>),
    List,
    Show(Option<usize>),
    Providers,
    Help,
    Quit,
}

pub const HELP: &[(&str, &str)] = &[
    ("/new", "Open a new session"),
    ("/rm <n>", "Close session n"),
    ("/use <n>", "Focus session n"),
    ("/provider <n> <id>", "Switch session n to another provider"),
    ("/model <n> <model>", "Switch session n to another model"),
    ("/system <n> <text|->", "Set or clear the system prompt of session n"),
    ("/clear <n>", "Erase the history of session n"),
    ("/mode [individual|broadcast]", "Show or change the send mode"),
    ("/key <provider> <secret>", "Save an API key"),
    ("/test <provider> [secret]", "Check an API key against the provider"),
    ("/list", "List sessions"),
    ("/show [n]", "Print the history of session n (default: focused)"),
    ("/providers", "List providers, models and key status"),
    ("/help, /h, /?", "Show this help"),
    ("/quit, /exit, /q", "Exit chat"),
];

impl ReplCommand {
    /// Parse a line starting with `/`. The error is a usage hint.
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        match name {
            "/new" => Ok(Self::New),
            "/rm" | "/remove" => Ok(Self::Remove(position(rest, "/rm <n>")?)),
            "/use" => Ok(Self::Use(position(rest, "/use <n>")?)),
            "/provider" => {
                let (n, id) = position_and_arg(rest, "/provider <n> <id>")?;
                Ok(Self::Provider(n, id))
            }
            "/model" => {
                let (n, model) = position_and_arg(rest, "/model <n> <model>")?;
                Ok(Self::Model(n, model))
            }
            "/system" => {
                let (n, text) = position_and_arg(rest, "/system <n> <text|->")?;
                let prompt = if text == "-" { None } else { Some(text) };
                Ok(Self::System(n, prompt))
            }
            "/clear" => Ok(Self::Clear(position(rest, "/clear <n>")?)),
            "/mode" => {
                if rest.is_empty() {
                    return Ok(Self::Mode(None));
                }
                rest.parse()
                    .map(|mode| Self::Mode(Some(mode)))
                    .map_err(|_| "Usage: /mode [individual|broadcast]".to_string())
            }
            "/key" => match rest.split_once(char::is_whitespace) {
                Some((provider, secret)) if !secret.trim().is_empty() => {
                    Ok(Self::Key(provider.to_string(), secret.trim().to_string()))
                }
                _ => Err("Usage: /key <provider> <secret>".to_string()),
            },
            "/test" => {
                if rest.is_empty() {
                    return Err("Usage: /test <provider> [secret]".to_string());
                }
                match rest.split_once(char::is_whitespace) {
                    Some((provider, secret)) => Ok(Self::Test(
                        provider.to_string(),
                        Some(secret.trim().to_string()),
                    )),
                    None => Ok(Self::Test(rest.to_string(), None)),
                }
            }
            "/list" | "/ls" => Ok(Self::List),
            "/show" => {
                if rest.is_empty() {
                    Ok(Self::Show(None))
                } else {
                    Ok(Self::Show(Some(position(rest, "/show [n]")?)))
                }
            }
            "/providers" => Ok(Self::Providers),
            "/help" | "/h" | "/?" => Ok(Self::Help),
            "/quit" | "/exit" | "/q" => Ok(Self::Quit),
            other => Err(format!(
                "Unknown command: {}\nType /help for available commands",
                other
            )),
        }
    }
}

fn position(arg: &str, usage: &str) -> Result<usize, String> {
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("Usage: {}", usage)),
    }
}

fn position_and_arg(rest: &str, usage: &str) -> Result<(usize, String), String> {
    let Some((n, arg)) = rest.split_once(char::is_whitespace) else {
        return Err(format!("Usage: {}", usage));
    };
    let arg = arg.trim();
    if arg.is_empty() {
        return Err(format!("Usage: {}", usage));
    }
    Ok((position(n, usage)?, arg.to_string()))
}
