//! Per-user pending-action state
//!
//! Each user is either idle or waiting for one specific follow-up message.
//! Entries expire after a TTL so an abandoned flow quietly returns to idle,
//! and nothing survives a process restart.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Opaque user identifier supplied by the transport
pub type UserKey = u64;

/// What the controller expects next from a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    /// Next plain-text message names a new category
    AwaitingCategoryName,
    /// Next photo message is filed using its `category:subcategory` caption
    AwaitingImageTarget,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    state: SessionState,
    expires_at: Instant,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Concurrent session map keyed by user
#[derive(Debug, Clone)]
pub struct SessionStore {
    entries: Arc<DashMap<UserKey, Entry>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Current state; expired entries read as `Idle`.
    pub fn state(&self, user: UserKey) -> SessionState {
        let now = Instant::now();
        match self.entries.get(&user).map(|e| *e) {
            Some(entry) if !entry.is_expired(now) => entry.state,
            Some(_) => {
                self.entries.remove_if(&user, |_, e| e.is_expired(now));
                SessionState::Idle
            }
            None => SessionState::Idle,
        }
    }

    /// Replaces the user's state. Setting `Idle` drops the entry.
    pub fn set(&self, user: UserKey, state: SessionState) {
        if state == SessionState::Idle {
            self.entries.remove(&user);
            return;
        }
        self.entries.insert(
            user,
            Entry {
                state,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    /// Consumes the pending state if it is `expected` and still live.
    ///
    /// Returns `true` when the state was consumed; the user is idle afterwards.
    /// A different pending state is left in place.
    pub fn take(&self, user: UserKey, expected: SessionState) -> bool {
        let now = Instant::now();
        self.entries
            .remove_if(&user, |_, e| e.state == expected && !e.is_expired(now))
            .is_some()
    }

    /// Drops every expired entry, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, e| !e.is_expired(now));
        before.saturating_sub(self.entries.len())
    }

    /// Number of users with a pending action
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Spawns a background task purging expired entries every `interval`.
    pub fn spawn_cleanup_task(&self, interval: Duration) -> tokio::task::JoinHandle<()> {
        let sessions = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let purged = sessions.purge_expired();
                if purged > 0 {
                    log::debug!("Purged {} expired session(s)", purged);
                }
            }
        })
    }
}
