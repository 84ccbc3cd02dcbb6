//! IPFS gateway URL helpers

/// Gateway URL for a content CID; `None` for an empty CID
pub fn content_url(gateway: &str, cid: &str) -> Option<String> {
    let cid = cid.trim();
    if cid.is_empty() {
        return None;
    }
    Some(format!("{}/{}", gateway.trim_end_matches('/'), cid))
}
