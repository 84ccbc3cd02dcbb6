//! HTTP contracts to the remote chat services

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use ember_core::{Address, ChatConfig};

use crate::chats::ChatSummary;
use crate::error::{ClientError, Result};

/// Parameters for one outgoing chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageParams {
    pub message: String,
    pub root_post_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

/// Body of a token request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestTokenParams {
    pub address: String,
    pub captcha_token: String,
}

/// Token request with the first message bundled in the same call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestTokenAndSendParams {
    #[serde(flatten)]
    pub token: RequestTokenParams,
    #[serde(flatten)]
    pub message: SendMessageParams,
}

/// Envelope every API endpoint answers with
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct SaveFileResponse {
    success: bool,
    #[serde(default)]
    cid: Option<String>,
    #[serde(default)]
    errors: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct EnergyResponse {
    energy: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatsResponse {
    chats: Vec<ChatSummary>,
}

/// Narrow contracts to the remote services
///
/// Implemented over HTTP by [`HttpGateway`]; tests swap in mocks.
#[async_trait]
pub trait ChatGateway {
    /// Exchange a captcha verification for a replenished quota
    async fn request_token(&self, params: &RequestTokenParams) -> Result<()>;

    /// Same exchange with a message send bundled in the request
    async fn request_token_and_send(&self, params: &RequestTokenAndSendParams) -> Result<()>;

    /// Submit a message on the direct path
    async fn send_message(&self, params: &SendMessageParams) -> Result<()>;

    /// Current energy quota of an address
    async fn energy_of(&self, address: &Address) -> Result<u64>;

    /// Chats registered in a space
    async fn chats_in_space(&self, space_id: &str) -> Result<Vec<ChatSummary>>;

    /// Persist content on IPFS, returning the CID
    async fn save_file(&self, content: &serde_json::Value) -> Result<String>;
}

/// Gateway implementation over the application API and the indexer
pub struct HttpGateway {
    http: Client,
    api_url: String,
    indexer_url: String,
}

impl HttpGateway {
    pub fn new(api_url: impl Into<String>, indexer_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            indexer_url: indexer_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ChatConfig) -> Self {
        Self::new(&config.api_url, &config.indexer_url)
    }

    /// POST to the application API and unwrap the response envelope
    ///
    /// `success=false` surfaces the service-provided message verbatim.
    async fn post_api<T: Serialize + Sync>(&self, path: &str, body: &T) -> Result<ApiResponse> {
        let url = format!("{}{}", self.api_url, path);
        let resp = self.http.post(&url).json(body).send().await?;

        if !resp.status().is_success() {
            return Err(ClientError::Server {
                status: resp.status().as_u16(),
                message: resp.text().await.unwrap_or_default(),
            });
        }

        let api: ApiResponse = resp.json().await?;
        if !api.success {
            return Err(ClientError::Service {
                message: api
                    .message
                    .unwrap_or_else(|| "request failed".to_string()),
            });
        }
        Ok(api)
    }

    async fn get_indexer<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.indexer_url, path);
        let resp = self.http.get(&url).send().await?;

        if !resp.status().is_success() {
            return Err(ClientError::Server {
                status: resp.status().as_u16(),
                message: resp.text().await.unwrap_or_default(),
            });
        }

        Ok(resp.json().await?)
    }
}

#[async_trait]
impl ChatGateway for HttpGateway {
    async fn request_token(&self, params: &RequestTokenParams) -> Result<()> {
        self.post_api("/api/request-token", params).await?;
        Ok(())
    }

    async fn request_token_and_send(&self, params: &RequestTokenAndSendParams) -> Result<()> {
        self.post_api("/api/request-token", params).await?;
        Ok(())
    }

    async fn send_message(&self, params: &SendMessageParams) -> Result<()> {
        self.post_api("/api/send-message", params).await?;
        Ok(())
    }

    async fn energy_of(&self, address: &Address) -> Result<u64> {
        let resp: EnergyResponse = self
            .get_indexer(&format!("/energy/{}", address.to_hex()))
            .await?;
        Ok(resp.energy)
    }

    async fn chats_in_space(&self, space_id: &str) -> Result<Vec<ChatSummary>> {
        let resp: ChatsResponse = self
            .get_indexer(&format!("/spaces/{}/chats", space_id))
            .await?;
        Ok(resp.chats)
    }

    async fn save_file(&self, content: &serde_json::Value) -> Result<String> {
        let url = format!("{}/api/save-file", self.api_url);
        let resp = self.http.post(&url).json(content).send().await?;

        if !resp.status().is_success() {
            return Err(ClientError::Server {
                status: resp.status().as_u16(),
                message: resp.text().await.unwrap_or_default(),
            });
        }

        let saved: SaveFileResponse = resp.json().await?;
        if !saved.success {
            return Err(ClientError::Service {
                message: saved.errors.unwrap_or_else(|| "save failed".to_string()),
            });
        }
        saved.cid.ok_or_else(|| ClientError::Service {
            message: "save succeeded without a CID".to_string(),
        })
    }
}
