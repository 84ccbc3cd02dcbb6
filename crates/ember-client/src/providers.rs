//! Opaque auth collaborators: wallet and captcha providers

use async_trait::async_trait;

use ember_core::WalletIdentity;

use crate::error::Result;

/// External wallet/auth provider
#[async_trait]
pub trait WalletProvider {
    /// Run the provider's login flow; `None` when the user cancels
    async fn login(&self) -> Result<Option<WalletIdentity>>;
}

/// Captcha provider
#[async_trait]
pub trait CaptchaProvider {
    /// Run a verification; `None` when cancelled or failed
    async fn verify(&self) -> Result<Option<String>>;
}

/// Captcha provider backed by a pre-obtained token (CLI and tests)
#[derive(Debug, Clone, Default)]
pub struct PresetCaptcha {
    token: Option<String>,
}

impl PresetCaptcha {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    /// A provider with no token; every verification reads as cancelled
    pub fn empty() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CaptchaProvider for PresetCaptcha {
    async fn verify(&self) -> Result<Option<String>> {
        Ok(self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_preset_captcha_returns_token() {
        let captcha = PresetCaptcha::new("tok");
        assert_eq!(captcha.verify().await.unwrap(), Some("tok".to_string()));
    }

    #[tokio::test]
    async fn test_empty_captcha_reads_as_cancelled() {
        let captcha = PresetCaptcha::empty();
        assert_eq!(captcha.verify().await.unwrap(), None);
    }
}
