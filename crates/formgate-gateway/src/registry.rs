//! Live connection table and form-update fan-out
//!
//! The registry is an explicitly owned, injected handle shared by all
//! session tasks; every mutation and every snapshot-for-broadcast
//! takes the same lock, so a broadcast always observes a consistent
//! set of sessions.

use std::collections::HashMap;
use std::sync::Arc;

use formgate_core::{Form, FormStore};
use tokio::sync::{RwLock, mpsc};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::protocol::Outbound;

/// Opaque identifier for one live connection
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new() -> Self {
        Self(format!("conn_{}", Uuid::new_v4()))
    }

    /// Rebuild an id from its wire form (admin endpoints)
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registry entry: the handle other components use to reach a session.
/// Outbound messages are queued onto the session's writer; the store
/// handle lets admin endpoints read and reset that session's form.
pub struct Session {
    pub id: ConnectionId,
    outbound: mpsc::UnboundedSender<String>,
    store: Arc<RwLock<FormStore>>,
}

impl Session {
    pub fn new(
        id: ConnectionId,
        outbound: mpsc::UnboundedSender<String>,
        store: Arc<RwLock<FormStore>>,
    ) -> Self {
        Self { id, outbound, store }
    }

    /// Queue a raw message for delivery. Fails only when the
    /// connection's writer is gone.
    pub fn send(&self, message: String) -> Result<(), SendClosed> {
        self.outbound.send(message).map_err(|_| SendClosed)
    }

    pub fn store(&self) -> Arc<RwLock<FormStore>> {
        Arc::clone(&self.store)
    }
}

/// The session's outbound channel has been closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendClosed;

/// Process-wide table of live sessions
pub struct ConnectionRegistry {
    sessions: RwLock<HashMap<ConnectionId, Arc<Session>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub async fn insert(&self, session: Arc<Session>) {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.id.clone(), session);
    }

    /// Remove a session. Removing an absent id is a no-op.
    pub async fn remove(&self, id: &ConnectionId) {
        let mut sessions = self.sessions.write().await;
        sessions.remove(id);
    }

    pub async fn get(&self, id: &ConnectionId) -> Option<Arc<Session>> {
        let sessions = self.sessions.read().await;
        sessions.get(id).cloned()
    }

    /// Point-in-time copy of every live session, safe to iterate while
    /// other tasks connect and disconnect.
    pub async fn snapshot(&self) -> Vec<Arc<Session>> {
        let sessions = self.sessions.read().await;
        sessions.values().cloned().collect()
    }

    /// Connection ids of every live session
    pub async fn ids(&self) -> Vec<String> {
        let sessions = self.sessions.read().await;
        sessions.keys().map(|id| id.as_str().to_string()).collect()
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Best-effort fan-out of form updates to every live session. An
/// individual send failure is logged and swallowed; it never prevents
/// delivery to the remaining sessions.
pub struct Broadcaster {
    registry: Arc<ConnectionRegistry>,
}

impl Broadcaster {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    pub async fn form_update(&self, form: &Form) {
        let message = match serde_json::to_string(&Outbound::FormUpdate { data: form.clone() }) {
            Ok(message) => message,
            Err(err) => {
                warn!(error = %err, "failed to serialize form update");
                return;
            }
        };

        let sessions = self.registry.snapshot().await;
        debug!(
            form_id = %form.id,
            recipients = sessions.len(),
            "broadcasting form update"
        );
        for session in sessions {
            if session.send(message.clone()).is_err() {
                warn!(connection_id = %session.id, "dropping form update for closed connection");
            }
        }
    }
}
