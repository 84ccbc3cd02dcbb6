//! ember-chat: client core for a blockchain-backed chat
//!
//! Re-exports the workspace crates for integration consumers; see
//! `ember-core` for the domain logic and `ember-client` for orchestration.

pub use ember_client;
pub use ember_core;
