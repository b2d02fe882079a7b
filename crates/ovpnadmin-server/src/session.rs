//! In-memory session store and admin credential checks.
//!
//! Session IDs are random UUID v4 values handed to the browser; only their
//! SHA-256 hashes are kept server-side, each with an expiry timestamp. The
//! store is swept periodically by a background task. Sessions do not
//! survive a restart — the admin logs in again, nothing else is lost.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A live admin session.
#[derive(Debug, Clone)]
pub struct Session {
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

/// In-memory session store keyed by hashed session ID.
#[derive(Debug)]
pub struct SessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    /// Create a store whose sessions live for `ttl_secs` seconds.
    #[must_use]
    pub fn new(ttl_secs: u64) -> Self {
        let ttl_secs = i64::try_from(ttl_secs).unwrap_or(i64::MAX);
        Self {
            ttl: Duration::seconds(ttl_secs),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    fn hash_id(id: &str) -> String {
        hex::encode(Sha256::digest(id.as_bytes()))
    }

    /// Create a session for `username` and return the plaintext session ID
    /// destined for the cookie.
    pub async fn create(&self, username: &str) -> String {
        let id = Uuid::new_v4().as_simple().to_string();
        let session = Session {
            username: username.to_owned(),
            expires_at: Utc::now() + self.ttl,
        };
        self.sessions.write().await.insert(Self::hash_id(&id), session);
        id
    }

    /// Look up a session by its plaintext ID. Expired entries are removed
    /// on sight and treated as absent.
    pub async fn validate(&self, id: &str) -> Option<Session> {
        let key = Self::hash_id(id);
        {
            let sessions = self.sessions.read().await;
            match sessions.get(&key) {
                Some(s) if s.expires_at > Utc::now() => return Some(s.clone()),
                Some(_) => {}
                None => return None,
            }
        }
        // Expired — drop it.
        self.sessions.write().await.remove(&key);
        None
    }

    /// Remove a session. Idempotent.
    pub async fn revoke(&self, id: &str) {
        self.sessions.write().await.remove(&Self::hash_id(id));
    }

    /// Remove every expired session, returning how many were pruned.
    pub async fn sweep(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.expires_at > now);
        before - sessions.len()
    }

    /// Number of live entries (expired-but-unswept included).
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether the store holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

/// Hex SHA-256 of a password, the format `ADMIN_PASSWORD_HASH` expects.
#[must_use]
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Constant-time check of a submitted password against the configured hex
/// SHA-256 hash. An empty configured hash never matches.
#[must_use]
pub fn verify_password(password: &str, expected_hash_hex: &str) -> bool {
    let expected = expected_hash_hex.trim().to_lowercase();
    if expected.is_empty() {
        return false;
    }
    let submitted = hash_password(password);
    submitted.as_bytes().ct_eq(expected.as_bytes()).into()
}
