//! # Application Layer
//!
//! Orchestrates the bot's behaviour: command routing, the result navigator
//! engine and the search result cache.

pub mod cache;
pub mod navigator;
pub mod router;
