//! Browser session registry.
//!
//! [`SessionStore`] maps UUID session identifiers to a [`Workspace`] behind its
//! own `tokio::sync::Mutex`. Operations on one session serialise on that lock
//! while different sessions proceed in parallel. Sessions idle longer than the
//! configured TTL are removed by a periodic sweep.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use kitewind_core::Workspace;

/// Unique session identifier (UUID v4 newtype).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub Uuid);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(SessionId)
    }
}

/// A workspace shared between handler tasks.
pub type SharedWorkspace = Arc<Mutex<Workspace>>;

struct SessionEntry {
    workspace: SharedWorkspace,
    last_active: Instant,
}

/// Registry of live sessions.
pub struct SessionStore {
    sessions: DashMap<SessionId, SessionEntry>,
}

impl SessionStore {
    pub fn new() -> Self {
        SessionStore {
            sessions: DashMap::new(),
        }
    }

    /// Stores `workspace` under a fresh identifier.
    pub fn insert(&self, workspace: Workspace) -> (SessionId, SharedWorkspace) {
        let id = SessionId(Uuid::new_v4());
        let workspace = Arc::new(Mutex::new(workspace));
        self.sessions.insert(
            id,
            SessionEntry {
                workspace: Arc::clone(&workspace),
                last_active: Instant::now(),
            },
        );
        (id, workspace)
    }

    /// Returns the session's workspace and marks it active.
    pub fn get(&self, id: &SessionId) -> Option<SharedWorkspace> {
        self.sessions.get_mut(id).map(|mut entry| {
            entry.last_active = Instant::now();
            Arc::clone(&entry.workspace)
        })
    }

    /// Removes a session. Returns `true` if it existed.
    pub fn remove(&self, id: &SessionId) -> bool {
        self.sessions.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Removes sessions that have been inactive longer than `timeout`.
    ///
    /// Returns the number of sessions removed.
    pub fn sweep_inactive(&self, timeout: Duration) -> usize {
        let now = Instant::now();
        let mut removed = 0;
        self.sessions.retain(|_, entry| {
            let active = now.duration_since(entry.last_active) < timeout;
            if !active {
                removed += 1;
            }
            active
        });
        removed
    }

    /// Spawns a task that sweeps idle sessions every `ttl / 4` (at least once
    /// a second).
    pub fn start_expiry_sweep(self: &Arc<Self>, ttl: Duration) {
        let store = Arc::clone(self);
        let interval = (ttl / 4).max(Duration::from_secs(1));
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(interval);
            loop {
                tick.tick().await;
                let removed = store.sweep_inactive(ttl);
                if removed > 0 {
                    tracing::info!("Swept {} idle session(s)", removed);
                }
            }
        });
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
