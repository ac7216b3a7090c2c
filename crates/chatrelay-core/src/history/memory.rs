//! In-process history store.
//!
//! Sessions live in a `DashMap` keyed by the client-supplied identifier. Each
//! append is a single read-modify-write under the shard lock, so concurrent
//! requests for one session never interleave inside its turn list.
//!
//! Two bounds keep memory in check:
//! - **Session count:** inserting a new key at capacity first purges idle
//!   sessions, then evicts the least-recently-used one.
//! - **Idle time:** sessions untouched for longer than the TTL are dropped by
//!   [`InMemoryHistoryStore::purge_expired`] (run periodically by the server)
//!   and are treated as empty when read.
//!
//! The count bound is soft under concurrent inserts of distinct new keys.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use chatrelay_types::chat::Turn;
use chatrelay_types::config::HistoryConfig;
use dashmap::DashMap;
use tracing::debug;

use super::store::HistoryStore;

struct SessionEntry {
    turns: VecDeque<Turn>,
    /// Logical clock value of the last read or write (LRU ordering).
    last_used: u64,
    /// Wall-clock time of the last read or write (idle expiry).
    touched_at: Instant,
}

/// Bounded, concurrent, memory-only [`HistoryStore`].
pub struct InMemoryHistoryStore {
    sessions: DashMap<String, SessionEntry>,
    clock: AtomicU64,
    max_turns: usize,
    max_sessions: usize,
    idle_ttl: Duration,
}

impl InMemoryHistoryStore {
    /// Create a store keeping `max_turns` per session and at most
    /// `max_sessions` sessions (minimum 1), each expiring after `idle_ttl`.
    pub fn new(max_turns: usize, max_sessions: usize, idle_ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            clock: AtomicU64::new(0),
            max_turns,
            max_sessions: max_sessions.max(1),
            idle_ttl,
        }
    }

    pub fn from_config(config: &HistoryConfig) -> Self {
        Self::new(
            config.max_turns,
            config.max_sessions,
            Duration::from_secs(config.idle_ttl_secs),
        )
    }

    /// Drop every session idle for longer than the TTL. Returns how many
    /// sessions were removed.
    pub fn purge_expired(&self) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, entry| entry.touched_at.elapsed() < self.idle_ttl);
        let removed = before.saturating_sub(self.sessions.len());
        if removed > 0 {
            debug!(removed, remaining = self.sessions.len(), "purged idle sessions");
        }
        removed
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }

    fn is_expired(&self, entry: &SessionEntry) -> bool {
        entry.touched_at.elapsed() >= self.idle_ttl
    }

    fn lookup(&self, session_id: &str) -> Vec<Turn> {
        if let Some(mut entry) = self.sessions.get_mut(session_id) {
            if !self.is_expired(&entry) {
                entry.last_used = self.tick();
                entry.touched_at = Instant::now();
                return entry.turns.iter().cloned().collect();
            }
        }

        self.sessions
            .remove_if(session_id, |_, entry| self.is_expired(entry));
        Vec::new()
    }

    /// Free one slot for a new session.
    fn make_room(&self) {
        if self.purge_expired() > 0 && self.sessions.len() < self.max_sessions {
            return;
        }

        let oldest = self
            .sessions
            .iter()
            .min_by_key(|entry| entry.value().last_used)
            .map(|entry| entry.key().clone());

        if let Some(key) = oldest {
            self.sessions.remove(&key);
            debug!(session_id = %key, "evicted least-recently-used session");
        }
    }

    fn record(&self, session_id: &str, user: Turn, assistant: Turn) {
        if !self.sessions.contains_key(session_id) && self.sessions.len() >= self.max_sessions {
            self.make_room();
        }

        let now = self.tick();
        let mut entry = self
            .sessions
            .entry(session_id.to_string())
            .or_insert_with(|| SessionEntry {
                turns: VecDeque::new(),
                last_used: now,
                touched_at: Instant::now(),
            });

        if self.is_expired(&entry) {
            entry.turns.clear();
        }

        entry.turns.push_back(user);
        entry.turns.push_back(assistant);
        while entry.turns.len() > self.max_turns {
            entry.turns.pop_front();
        }
        entry.last_used = now;
        entry.touched_at = Instant::now();
    }
}

impl Default for InMemoryHistoryStore {
    fn default() -> Self {
        Self::from_config(&HistoryConfig::default())
    }
}

impl HistoryStore for InMemoryHistoryStore {
    async fn get(&self, session_id: &str) -> Vec<Turn> {
        self.lookup(session_id)
    }

    async fn append(&self, session_id: Option<&str>, user: Turn, assistant: Turn) {
        match session_id {
            Some(id) if !id.is_empty() => self.record(id, user, assistant),
            _ => {}
        }
    }

    async fn session_count(&self) -> usize {
        self.sessions.len()
    }
}
