//! Chat client: drives the session, gate, and remote services end to end

use ember_core::{
    Account, Address, ChatConfig, EnergyTracker, JsonFileStore, SendGate, SendPath, Session,
    SessionController, SessionStore,
};

use crate::chats::{self, ChatSummary};
use crate::error::{ClientError, Result};
use crate::gateway::{
    ChatGateway, HttpGateway, RequestTokenAndSendParams, RequestTokenParams, SendMessageParams,
};
use crate::providers::{CaptchaProvider, PresetCaptcha, WalletProvider};

/// Outgoing message draft, as composed by the caller
#[derive(Debug, Clone)]
pub struct OutgoingMessage {
    pub body: String,
    pub chat_id: String,
    pub reply_to: Option<String>,
}

impl OutgoingMessage {
    pub fn new(chat_id: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            chat_id: chat_id.into(),
            reply_to: None,
        }
    }

    pub fn replying_to(mut self, message_id: impl Into<String>) -> Self {
        self.reply_to = Some(message_id.into());
        self
    }
}

/// Outcome of a dispatched message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendReceipt {
    /// Path the message took
    pub path: SendPath,
    /// Whether a fresh account was generated for this send
    pub account_created: bool,
}

/// The chat client: session controller, send gate, energy cache, and the
/// remote services behind them
///
/// All mutation goes through `&mut self`, so one action is in flight at a
/// time; the owner is the single context object for the whole flow.
pub struct ChatClient<G, C, S: SessionStore> {
    session: SessionController<S>,
    gate: SendGate,
    energy: EnergyTracker,
    gateway: G,
    captcha: C,
    space_id: String,
    message_cost: u64,
}

impl<G, C, S> ChatClient<G, C, S>
where
    G: ChatGateway,
    C: CaptchaProvider,
    S: SessionStore,
{
    pub fn new(gateway: G, captcha: C, store: S, space_id: String, message_cost: u64) -> Self {
        Self {
            session: SessionController::new(store),
            gate: SendGate::new(),
            energy: EnergyTracker::new(),
            gateway,
            captcha,
            space_id,
            message_cost,
        }
    }

    pub fn session(&self) -> &Session {
        self.session.session()
    }

    pub fn address(&self) -> Option<Address> {
        self.session.address()
    }

    pub fn energy(&self) -> Option<u64> {
        self.energy.balance()
    }

    pub fn is_requesting_energy(&self) -> bool {
        self.gate.is_requesting_energy()
    }

    /// Rebuild the session from persisted credentials and prime the quota
    pub async fn restore(&mut self) {
        self.session.restore();
        if self.session.address().is_some() {
            if let Err(e) = self.refresh_energy().await {
                tracing::warn!(error = %e, "Energy refresh failed during restore");
            }
        }
    }

    /// Anonymous login from a user-provided secret key
    ///
    /// Returns false when the key is rejected; the session is unchanged and
    /// the caller prompts for a retry.
    pub async fn login_with_key(&mut self, secret_key_text: &str) -> bool {
        if !self.session.login_anonymously(secret_key_text) {
            return false;
        }
        if let Err(e) = self.refresh_energy().await {
            tracing::warn!(error = %e, "Energy refresh failed after login");
        }
        true
    }

    /// Wallet login; returns false when the user cancels
    pub async fn login_with_wallet<W: WalletProvider>(&mut self, wallet: &W) -> Result<bool> {
        match wallet.login().await? {
            Some(identity) => {
                self.session.login_delegated(identity);
                if let Err(e) = self.refresh_energy().await {
                    tracing::warn!(error = %e, "Energy refresh failed after wallet login");
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Explicit account creation: captcha first, then a fresh key pair and
    /// an initial token request for its address
    pub async fn create_account(&mut self) -> Result<Account> {
        let token = self.run_captcha().await?;
        let account = Account::generate();
        self.session.login_with_secret(account.secret.clone());
        self.gateway
            .request_token(&RequestTokenParams {
                address: account.address.to_hex(),
                captcha_token: token,
            })
            .await?;
        if let Err(e) = self.refresh_energy().await {
            tracing::warn!(error = %e, "Energy refresh failed after account creation");
        }
        Ok(account)
    }

    /// Clear credentials and all per-account state
    pub fn logout(&mut self) {
        self.session.logout();
        self.energy.clear();
        self.gate = SendGate::new();
    }

    /// Dispatch one message through the gate
    ///
    /// A logged-out sender is given a freshly generated account on the token
    /// path (first-message flow). The requesting-energy window opens after a
    /// token-path send and keeps follow-up sends on the direct path until a
    /// refresh confirms the quota.
    pub async fn send(&mut self, draft: &OutgoingMessage) -> Result<SendReceipt> {
        let body = SendGate::prepare_body(&draft.body)?;

        let path = self
            .gate
            .decide(self.session.session(), &self.energy, self.message_cost);
        let params = SendMessageParams {
            message: body,
            root_post_id: draft.chat_id.clone(),
            reply_to: draft.reply_to.clone(),
        };

        let mut account_created = false;
        match path {
            SendPath::Direct => {
                tracing::debug!(chat = %draft.chat_id, "Sending message directly");
                self.gateway.send_message(&params).await?;
            }
            SendPath::RequestToken => {
                let token = self.run_captcha().await?;

                let address = match self.session.address() {
                    Some(address) => address,
                    None => {
                        let account = Account::generate();
                        let address = account.address;
                        tracing::info!(address = %address, "Generated account for first message");
                        self.session.login_with_secret(account.secret);
                        account_created = true;
                        address
                    }
                };

                tracing::debug!(chat = %draft.chat_id, address = %address, "Requesting token with bundled send");
                self.gateway
                    .request_token_and_send(&RequestTokenAndSendParams {
                        token: RequestTokenParams {
                            address: address.to_hex(),
                            captcha_token: token,
                        },
                        message: params,
                    })
                    .await?;
                self.gate.open_window();
            }
        }

        if let Err(e) = self.refresh_energy().await {
            tracing::warn!(error = %e, "Energy refresh failed after send");
        }

        Ok(SendReceipt {
            path,
            account_created,
        })
    }

    /// Pull the current quota and let the gate observe it
    pub async fn refresh_energy(&mut self) -> Result<()> {
        let Some(address) = self.session.address() else {
            return Ok(());
        };
        let balance = self.gateway.energy_of(&address).await?;
        self.energy.update(balance);
        self.gate.energy_updated(&self.energy, self.message_cost);
        tracing::debug!(balance, "Energy refreshed");
        Ok(())
    }

    /// Chats of the configured space, newest activity first
    pub async fn list_chats(&self) -> Result<Vec<ChatSummary>> {
        let mut chats = self.gateway.chats_in_space(&self.space_id).await?;
        chats::sort_by_latest_message(&mut chats);
        Ok(chats)
    }

    async fn run_captcha(&self) -> Result<String> {
        match self.captcha.verify().await? {
            Some(token) => Ok(token),
            None => Err(ClientError::AuthProvider(
                "captcha verification was cancelled".to_string(),
            )),
        }
    }
}

/// Builder wiring the HTTP gateway and the file-backed session store
pub struct ClientBuilder {
    config: ChatConfig,
    captcha_token: Option<String>,
}

impl ClientBuilder {
    pub fn new(config: ChatConfig) -> Self {
        Self {
            config,
            captcha_token: None,
        }
    }

    /// Pre-obtained captcha token for the request-token path
    pub fn captcha_token(mut self, token: impl Into<String>) -> Self {
        self.captcha_token = Some(token.into());
        self
    }

    pub fn build(self) -> ChatClient<HttpGateway, PresetCaptcha, JsonFileStore> {
        let gateway = HttpGateway::from_config(&self.config);
        let captcha = match self.captcha_token {
            Some(token) => PresetCaptcha::new(token),
            None => PresetCaptcha::empty(),
        };
        let store = JsonFileStore::new(&self.config.session_file);
        ChatClient::new(
            gateway,
            captcha,
            store,
            self.config.space_id,
            self.config.message_cost,
        )
    }
}
