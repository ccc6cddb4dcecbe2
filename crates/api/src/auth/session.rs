use std::collections::HashMap;

use tokio::sync::RwLock;

/// Token ids revoked by logout, kept until the token would have expired
/// anyway.
#[derive(Default)]
pub struct RevokedTokens {
    /// jti -> expiry (Unix seconds)
    entries: RwLock<HashMap<String, i64>>,
}

impl RevokedTokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn revoke(&self, jti: &str, expires_at: i64) {
        let now = chrono::Utc::now().timestamp();
        let mut entries = self.entries.write().await;
        entries.retain(|_, exp| *exp > now);
        entries.insert(jti.to_string(), expires_at);
    }

    pub async fn is_revoked(&self, jti: &str) -> bool {
        self.entries.read().await.contains_key(jti)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
