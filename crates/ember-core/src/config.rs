//! Client configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::ENERGY_PER_MESSAGE;

/// Configuration for the chat client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Application API base URL (token requests, message sends, file saves)
    pub api_url: String,
    /// Indexer base URL (energy balances, chat listings)
    pub indexer_url: String,
    /// IPFS gateway base URL for content CIDs
    pub ipfs_gateway: String,
    /// Space whose chats this client lists
    pub space_id: String,
    /// Path of the persisted session credentials
    pub session_file: PathBuf,
    /// Estimated energy consumed by one message
    #[serde(default = "default_message_cost")]
    pub message_cost: u64,
}

fn default_message_cost() -> u64 {
    ENERGY_PER_MESSAGE
}

impl ChatConfig {
    /// Create a configuration with client state under a base directory
    pub fn from_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        let base = base_dir.into();
        Self {
            api_url: "http://localhost:3000".into(),
            indexer_url: "http://localhost:4350".into(),
            ipfs_gateway: "https://ipfs.io/ipfs".into(),
            space_id: "1".into(),
            session_file: base.join("session.json"),
            message_cost: ENERGY_PER_MESSAGE,
        }
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_indexer_url(mut self, url: impl Into<String>) -> Self {
        self.indexer_url = url.into();
        self
    }

    pub fn with_space(mut self, space_id: impl Into<String>) -> Self {
        self.space_id = space_id.into();
        self
    }

    pub fn with_message_cost(mut self, cost: u64) -> Self {
        self.message_cost = cost;
        self
    }

    /// Load configuration from a JSON file
    pub fn load(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::from_base_dir("./ember-data")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_base_dir() {
        let config = ChatConfig::from_base_dir("/data/ember");
        assert_eq!(config.session_file, PathBuf::from("/data/ember/session.json"));
        assert_eq!(config.message_cost, ENERGY_PER_MESSAGE);
    }

    #[test]
    fn test_config_builders() {
        let config = ChatConfig::default()
            .with_api_url("https://api.example.org")
            .with_space("1984")
            .with_message_cost(42);
        assert_eq!(config.api_url, "https://api.example.org");
        assert_eq!(config.space_id, "1984");
        assert_eq!(config.message_cost, 42);
    }

    #[test]
    fn test_message_cost_defaults_when_absent() {
        let json = r#"{
            "api_url": "http://localhost:3000",
            "indexer_url": "http://localhost:4350",
            "ipfs_gateway": "https://ipfs.io/ipfs",
            "space_id": "1",
            "session_file": "/tmp/session.json"
        }"#;
        let config: ChatConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.message_cost, ENERGY_PER_MESSAGE);
    }

    #[test]
    fn test_config_save_load_round_trip() {
        let path = std::env::temp_dir().join("ember-config-test.json");
        let config = ChatConfig::default().with_space("77");
        config.save(&path).unwrap();

        let loaded = ChatConfig::load(&path).unwrap();
        assert_eq!(loaded.space_id, "77");
        assert_eq!(loaded.api_url, config.api_url);

        let _ = std::fs::remove_file(&path);
    }
}
