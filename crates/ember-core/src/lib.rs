//! ember-core: account, session, and send-gating logic for the ember chat client
//!
//! This crate holds the synchronous domain core:
//! - Key lifecycle: seed generation, hex/base64 encodings, address derivation
//! - Session state machine: anonymous key login, wallet delegation, logout
//! - Send gate: direct-send vs captcha token path, with the requesting-energy
//!   dedup window
//! - Energy quota tracking and client configuration
//!
//! Networking and orchestration live in ember-client; everything here is
//! pure state plus local persistence.

mod config;
mod energy;
mod error;
mod gate;
mod keys;
mod session;
mod store;

pub use config::ChatConfig;
pub use energy::EnergyTracker;
pub use error::Error;
pub use gate::{SendGate, SendPath};
pub use keys::{Account, Address, SecretKey, Signer};
pub use session::{Session, SessionController, WalletIdentity};
pub use store::{JsonFileStore, MemoryStore, SessionStore, StoredCredentials};

pub type Result<T> = std::result::Result<T, Error>;

/// Seed length in bytes for account keys
pub const SEED_SIZE: usize = 32;

/// Constants shared by the gate and configuration
pub mod constants {
    /// Estimated energy consumed by a single message transaction
    pub const ENERGY_PER_MESSAGE: u64 = 100_000_000;

    /// Length of a secret key in its user-facing hex form
    pub const SECRET_KEY_HEX_LEN: usize = 64;
}
