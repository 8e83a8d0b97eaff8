//! Interactive chat module
//!
//! Provides a readline-based interactive chat interface over the
//! [`ChatController`](chorus_application::ChatController).

mod command;
mod repl;

pub use command::ReplCommand;
pub use repl::{ChatRepl, CommandReply};
