//! Send gating: direct sends vs the captcha token path

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::energy::EnergyTracker;
use crate::error::Error;
use crate::session::Session;
use crate::Result;

/// Path an outgoing message takes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SendPath {
    /// Submit straight to the message-send service
    Direct,
    /// Obtain a captcha verification token first, then send bundled with
    /// the token request
    RequestToken,
}

impl SendPath {
    pub fn is_direct(&self) -> bool {
        matches!(self, SendPath::Direct)
    }
}

impl fmt::Display for SendPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendPath::Direct => write!(f, "direct"),
            SendPath::RequestToken => write!(f, "request-token"),
        }
    }
}

/// Decides how each outgoing message is dispatched
///
/// While the requesting-energy window is open, sends go direct: the pending
/// token request will replenish the quota, so a second token request before
/// the refresh confirms it would be a duplicate.
#[derive(Debug, Clone, Copy, Default)]
pub struct SendGate {
    requesting_energy: bool,
}

impl SendGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose the path for one message
    pub fn decide(&self, session: &Session, energy: &EnergyTracker, cost: u64) -> SendPath {
        if self.requesting_energy || (session.is_logged_in() && energy.has_enough(cost)) {
            SendPath::Direct
        } else {
            SendPath::RequestToken
        }
    }

    /// Open the dedup window after a token-path send
    pub fn open_window(&mut self) {
        self.requesting_energy = true;
    }

    /// Close the window once a refresh confirms a sufficient balance
    pub fn energy_updated(&mut self, energy: &EnergyTracker, cost: u64) {
        if energy.has_enough(cost) {
            self.requesting_energy = false;
        }
    }

    pub fn is_requesting_energy(&self) -> bool {
        self.requesting_energy
    }

    /// Trim a draft body, rejecting empty or whitespace-only input before
    /// either path is attempted
    pub fn prepare_body(text: &str) -> Result<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(Error::EmptyMessage);
        }
        Ok(trimmed.to_string())
    }
}
