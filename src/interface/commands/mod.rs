//! # Command Handlers
//!
//! One module per user-facing command family. Handlers talk to the chat only
//! through `ChatProvider`, so they can be exercised without a homeserver.

pub mod help;
pub mod search;
