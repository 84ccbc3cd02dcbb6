//! Account keys: seed handling, textual encodings, and address derivation

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use ed25519_dalek::{Signer as _, SigningKey};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Error;
use crate::{Result, SEED_SIZE};

/// 32-byte seed backing an account's signing key
///
/// User-facing form is 64 hex characters; the persisted form is base64 of
/// the raw bytes. Both decoders reject any other byte length.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey([u8; SEED_SIZE]);

impl SecretKey {
    /// Generate a fresh key from OS randomness
    pub fn generate() -> Self {
        let mut seed = [0u8; SEED_SIZE];
        OsRng.fill_bytes(&mut seed);
        Self(seed)
    }

    pub fn from_bytes(bytes: [u8; SEED_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SEED_SIZE] {
        &self.0
    }

    /// Parse the user-facing hex form
    pub fn from_hex(text: &str) -> Result<Self> {
        let bytes = hex::decode(text.trim()).map_err(|e| Error::InvalidKey(e.to_string()))?;
        Self::from_vec(bytes)
    }

    /// Cheap validity check for login forms, without decoding
    pub fn is_well_formed_hex(text: &str) -> bool {
        let text = text.trim();
        text.len() == crate::constants::SECRET_KEY_HEX_LEN
            && text.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// User-facing hex form (64 lowercase characters)
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Persisted form: base64 of the raw seed
    pub fn encode(&self) -> String {
        BASE64.encode(self.0)
    }

    /// Parse the persisted form
    pub fn decode(text: &str) -> Result<Self> {
        let bytes = BASE64
            .decode(text.trim())
            .map_err(|e| Error::InvalidKey(e.to_string()))?;
        Self::from_vec(bytes)
    }

    fn from_vec(bytes: Vec<u8>) -> Result<Self> {
        let len = bytes.len();
        let seed: [u8; SEED_SIZE] = bytes
            .try_into()
            .map_err(|_| Error::InvalidKey(format!("expected {} bytes, got {}", SEED_SIZE, len)))?;
        Ok(Self(seed))
    }

    /// Reconstruct the signing capability for this key
    pub fn signer(&self) -> Signer {
        Signer {
            signing: SigningKey::from_bytes(&self.0),
        }
    }

    /// Address derived deterministically from this key
    pub fn address(&self) -> Address {
        Address(SigningKey::from_bytes(&self.0).verifying_key().to_bytes())
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // key material stays out of logs
        write!(f, "SecretKey(..)")
    }
}

/// Public identifier of an account: the ed25519 verifying key bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(#[serde(with = "hex_addr")] pub [u8; SEED_SIZE]);

impl Address {
    /// Parse a `0x`-prefixed (or bare) hex address
    pub fn from_hex(text: &str) -> Result<Self> {
        let text = text.trim();
        let text = text.strip_prefix("0x").unwrap_or(text);
        let bytes = hex::decode(text).map_err(|e| Error::InvalidKey(e.to_string()))?;
        let len = bytes.len();
        let bytes: [u8; SEED_SIZE] = bytes
            .try_into()
            .map_err(|_| Error::InvalidKey(format!("expected {} bytes, got {}", SEED_SIZE, len)))?;
        Ok(Self(bytes))
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Shortened display form for UIs
    pub fn truncated(&self) -> String {
        let full = self.to_hex();
        format!("{}...{}", &full[..6], &full[full.len() - 6..])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Signing capability reconstructed from a secret key
pub struct Signer {
    signing: SigningKey,
}

impl Signer {
    pub fn address(&self) -> Address {
        Address(self.signing.verifying_key().to_bytes())
    }

    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing.sign(message).to_bytes()
    }
}

/// A freshly generated account: the address and its backing key
#[derive(Debug, Clone)]
pub struct Account {
    pub address: Address,
    pub secret: SecretKey,
}

impl Account {
    /// Generate a new account from a cryptographically secure seed
    pub fn generate() -> Self {
        let secret = SecretKey::generate();
        Self {
            address: secret.address(),
            secret,
        }
    }
}

mod hex_addr {
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(address: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let hex_str = format!("0x{}", hex::encode(address));
        serializer.serialize_str(&hex_str)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<[u8; 32], D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let s = s.strip_prefix("0x").unwrap_or(&s);
        let bytes = hex::decode(s).map_err(serde::de::Error::custom)?;
        bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("invalid address length"))
    }
}
