//! # Infrastructure Layer
//!
//! Handles interactions with external systems and services.
//! Implements the traits defined in the Domain layer (e.g., ChatProvider, SearchProvider).

pub mod matrix;
pub mod reactions;
pub mod search;
