//! Chat listing helpers

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Chat metadata as returned by the indexer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSummary {
    pub chat_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_cid: Option<String>,
    /// Unix millis of the newest message, if the chat has any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_message_at: Option<u64>,
}

/// Order chats newest-activity-first; chats with no messages sort last
pub fn sort_by_latest_message(chats: &mut [ChatSummary]) {
    chats.sort_by(|a, b| match (a.latest_message_at, b.latest_message_at) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
