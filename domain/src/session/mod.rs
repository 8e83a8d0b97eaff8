//! Chat session domain.
//!
//! - [`entities::Session`]: one chat thread bound to a provider/model
//! - [`entities::Message`]: a single message within a session
//! - [`store::SessionStore`]: the bounded session collection
//! - [`failure::FailureKind`]: classification of failed sends
//! - [`mode::SendMode`]: individual vs broadcast dispatch

pub mod entities;
pub mod failure;
pub mod mode;
pub mod store;
