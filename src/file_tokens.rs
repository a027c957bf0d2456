//! Short-lived tokens that refer to an uploaded file by name.
use crate::clock::Clock;
use crate::config::{ConfigError, FileTokenConfig};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Default token lifetime.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTokenData {
    pub file_name: String,
    pub issued_at: DateTime<Utc>,
}

/// Token map with an explicit TTL. Owned by whoever needs it; there is no
/// process-wide instance.
#[derive(Debug)]
pub struct FileTokenStore {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    tokens: Mutex<HashMap<String, FileTokenData>>,
}

impl FileTokenStore {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            tokens: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_default_ttl(clock: Arc<dyn Clock>) -> Self {
        Self::new(Duration::seconds(DEFAULT_TOKEN_TTL_SECS), clock)
    }

    /// Store whose TTL comes from the `[file_tokens]` table.
    pub fn from_config(
        config: &FileTokenConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(config.ttl()?, clock))
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn is_expired(&self, data: &FileTokenData, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(data.issued_at) > self.ttl
    }

    /// Register `file_name` and return its token (32 lowercase hex chars).
    /// Expired tokens are evicted on the way.
    pub fn issue(&self, file_name: impl Into<String>) -> String {
        let token = uuid::Uuid::new_v4().simple().to_string();
        let now = self.clock.now();
        let mut tokens = self.tokens.lock().unwrap_or_else(PoisonError::into_inner);
        tokens.insert(
            token.clone(),
            FileTokenData {
                file_name: file_name.into(),
                issued_at: now,
            },
        );
        tokens.retain(|_, data| !self.is_expired(data, now));
        token
    }

    #[must_use]
    pub fn get(&self, token: &str) -> Option<FileTokenData> {
        let now = self.clock.now();
        let tokens = self.tokens.lock().unwrap_or_else(PoisonError::into_inner);
        tokens
            .get(token)
            .filter(|data| !self.is_expired(data, now))
            .cloned()
    }

    pub fn clear(&self, token: &str) {
        let mut tokens = self.tokens.lock().unwrap_or_else(PoisonError::into_inner);
        tokens.remove(token);
    }

    /// Drop every expired token; returns how many were dropped.
    pub fn evict_expired(&self) -> usize {
        let now = self.clock.now();
        let mut tokens = self.tokens.lock().unwrap_or_else(PoisonError::into_inner);
        let before = tokens.len();
        tokens.retain(|_, data| !self.is_expired(data, now));
        before - tokens.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
