//! # Strings
//!
//! User-facing text, kept out of the command handlers.

pub mod help;
pub mod messages;
