//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod broadcast;
pub mod save_credentials;
pub mod send_message;
pub mod test_credential;
