//! Domain layer for chorus
//!
//! This crate contains the entities, value objects and invariants of the
//! side-by-side chat. It has no dependencies on infrastructure or
//! presentation concerns and performs no I/O.
//!
//! # Core Concepts
//!
//! - **Session**: an independent chat thread bound to one provider/model
//! - **Provider catalog**: the ordered list of providers and their models
//! - **Failure kind**: why a send produced an explanation instead of a reply
//! - **Send mode**: individual sends or a broadcast to every session

pub mod core;
pub mod credential;
pub mod providers;
pub mod session;

// Re-export commonly used types
pub use core::{error::DomainError, string::truncate};
pub use credential::CredentialStatus;
pub use providers::{ProviderCatalog, ProviderDescriptor};
pub use session::{
    entities::{Message, Role, Session, SessionId, SessionPatch},
    failure::{FailureKind, classify_response},
    mode::SendMode,
    store::{MAX_SESSIONS, MIN_SESSIONS, PendingRequest, SessionSeed, SessionStore},
};
