//! Session state machine: anonymous key login, wallet delegation, logout

use serde::{Deserialize, Serialize};

use crate::keys::{Address, SecretKey, Signer};
use crate::store::{SessionStore, StoredCredentials};

/// Identity returned by an external wallet/auth provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletIdentity {
    pub address: Address,
    /// Opaque auth token issued by the provider
    pub token: String,
}

/// Authentication state; exactly one is active per controller
#[derive(Debug, Clone)]
pub enum Session {
    LoggedOut,
    Anonymous { address: Address, secret: SecretKey },
    Delegated { address: Address, token: String },
}

impl Session {
    pub fn address(&self) -> Option<Address> {
        match self {
            Session::LoggedOut => None,
            Session::Anonymous { address, .. } => Some(*address),
            Session::Delegated { address, .. } => Some(*address),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        !matches!(self, Session::LoggedOut)
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Session::Anonymous { .. })
    }

    pub fn is_delegated(&self) -> bool {
        matches!(self, Session::Delegated { .. })
    }
}

/// Owns the active session and its persistence
///
/// Transitions take `&mut self`, so at most one can be in flight; disabling
/// the triggering control while one is pending remains a UI obligation.
pub struct SessionController<S: SessionStore> {
    session: Session,
    store: S,
}

impl<S: SessionStore> SessionController<S> {
    pub fn new(store: S) -> Self {
        Self {
            session: Session::LoggedOut,
            store,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn address(&self) -> Option<Address> {
        self.session.address()
    }

    /// Rebuild the session from persisted credentials at startup
    ///
    /// Corrupt or unreadable credentials degrade to LoggedOut.
    pub fn restore(&mut self) {
        match self.store.load() {
            Ok(Some(StoredCredentials::Anonymous { secret_key })) => {
                match SecretKey::decode(&secret_key) {
                    Ok(secret) => {
                        let address = secret.address();
                        tracing::debug!(address = %address, "Restored anonymous session");
                        self.session = Session::Anonymous { address, secret };
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Stored secret key is invalid, staying logged out");
                    }
                }
            }
            Ok(Some(StoredCredentials::Delegated { address, token })) => {
                match Address::from_hex(&address) {
                    Ok(address) => {
                        tracing::debug!(address = %address, "Restored delegated session");
                        self.session = Session::Delegated { address, token };
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Stored delegated address is invalid, staying logged out");
                    }
                }
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load stored credentials");
            }
        }
    }

    /// Log in from a user-provided hex secret key
    ///
    /// Returns false with the state unchanged when the key does not decode
    /// to the expected seed size; the caller prompts for a retry.
    pub fn login_anonymously(&mut self, secret_key_text: &str) -> bool {
        let secret = match SecretKey::from_hex(secret_key_text) {
            Ok(secret) => secret,
            Err(e) => {
                tracing::debug!(error = %e, "Anonymous login rejected");
                return false;
            }
        };
        self.login_with_secret(secret);
        true
    }

    /// Install an already-validated secret key (first-message and
    /// account-creation flows)
    pub fn login_with_secret(&mut self, secret: SecretKey) {
        let address = secret.address();
        if let Err(e) = self.store.save(&StoredCredentials::Anonymous {
            secret_key: secret.encode(),
        }) {
            tracing::warn!(error = %e, "Failed to persist secret key");
        }
        tracing::info!(address = %address, "Logged in anonymously");
        self.session = Session::Anonymous { address, secret };
    }

    /// Install a delegated identity obtained from a wallet provider
    ///
    /// Cancellation is handled by the caller; this is only reached with a
    /// provider-issued identity in hand.
    pub fn login_delegated(&mut self, identity: WalletIdentity) {
        if let Err(e) = self.store.save(&StoredCredentials::Delegated {
            address: identity.address.to_hex(),
            token: identity.token.clone(),
        }) {
            tracing::warn!(error = %e, "Failed to persist wallet token");
        }
        tracing::info!(address = %identity.address, "Logged in with wallet");
        self.session = Session::Delegated {
            address: identity.address,
            token: identity.token,
        };
    }

    /// Clear persisted credentials and return to LoggedOut
    pub fn logout(&mut self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "Failed to clear stored credentials");
        }
        tracing::info!("Logged out");
        self.session = Session::LoggedOut;
    }

    /// Signing capability of the anonymous session, if any
    pub fn signer(&self) -> Option<Signer> {
        match &self.session {
            Session::Anonymous { secret, .. } => Some(secret.signer()),
            _ => None,
        }
    }
}
