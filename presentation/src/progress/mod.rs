//! Broadcast progress display

pub mod reporter;
