//! ember-client: async orchestration for the ember chat core
//!
//! Wires the session and gating logic from ember-core to the remote
//! services: the token-request and message-send endpoints, the indexer
//! (energy balances, chat listings), and the captcha/wallet providers.

pub mod chats;
pub mod client;
pub mod error;
pub mod gateway;
pub mod ipfs;
pub mod providers;

pub use chats::{sort_by_latest_message, ChatSummary};
pub use client::{ChatClient, ClientBuilder, OutgoingMessage, SendReceipt};
pub use error::ClientError;
pub use gateway::{
    ChatGateway, HttpGateway, RequestTokenAndSendParams, RequestTokenParams, SendMessageParams,
};
pub use providers::{CaptchaProvider, PresetCaptcha, WalletProvider};

pub type Result<T> = std::result::Result<T, ClientError>;
