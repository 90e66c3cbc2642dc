//! In-memory conversation sessions, keyed by a browser cookie.
//!
//! Each session holds the full conversation history for its lifetime.
//! Identity is a `sid` cookie issued on first contact; the store evicts
//! the least recently used session when it reaches capacity, so an
//! unbounded stream of anonymous visitors cannot exhaust memory.

use std::collections::HashMap;

use axum::http::{HeaderMap, HeaderValue, header};
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use shastho_core::message::History;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "sid";

/// Maximum concurrent sessions held in memory.
const MAX_SESSIONS: usize = 10_000;

struct SessionEntry {
    history: History,
    last_seen: DateTime<Utc>,
}

/// Thread-safe store of per-session conversation histories.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionEntry>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the history for a session. Missing sessions read as empty.
    pub async fn history(&self, session_id: &str) -> History {
        let sessions = self.sessions.read().await;
        sessions
            .get(session_id)
            .map(|e| e.history.clone())
            .unwrap_or_default()
    }

    /// Record a completed exchange and return the updated full history.
    ///
    /// Creates the session if it does not exist yet. Called only after the
    /// upstream request succeeded, so a failed request leaves the history
    /// untouched.
    pub async fn append_exchange(
        &self,
        session_id: &str,
        user_text: &str,
        assistant_text: &str,
    ) -> History {
        let mut sessions = self.sessions.write().await;
        Self::evict_if_full(&mut sessions, session_id);

        let entry = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| SessionEntry {
                history: History::new(),
                last_seen: Utc::now(),
            });
        entry.history.append_exchange(user_text, assistant_text);
        entry.last_seen = Utc::now();
        entry.history.clone()
    }

    /// Clear the history for a session, keeping the session alive.
    pub async fn reset(&self, session_id: &str) {
        let mut sessions = self.sessions.write().await;
        Self::evict_if_full(&mut sessions, session_id);

        let entry = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| SessionEntry {
                history: History::new(),
                last_seen: Utc::now(),
            });
        entry.history.clear();
        entry.last_seen = Utc::now();
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    fn evict_if_full(sessions: &mut HashMap<String, SessionEntry>, incoming: &str) {
        if sessions.len() < MAX_SESSIONS || sessions.contains_key(incoming) {
            return;
        }
        if let Some(oldest) = sessions
            .iter()
            .min_by_key(|(_, e)| e.last_seen)
            .map(|(id, _)| id.clone())
        {
            debug!(session = %oldest, "Evicting least recently used session");
            sessions.remove(&oldest);
        }
    }
}

/// Extract the session id from the request's `Cookie` header, if present.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE && !value.is_empty()).then(|| value.to_string())
    })
}

/// Mint a fresh session id.
pub fn new_session_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Build the `Set-Cookie` value for a session id.
pub fn session_cookie(session_id: &str) -> HeaderValue {
    // Session ids are UUIDs, always valid header characters.
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE}={session_id}; Path=/; HttpOnly; SameSite=Lax"
    ))
    .unwrap_or_else(|_| HeaderValue::from_static(""))
}
