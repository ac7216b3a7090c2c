//! HistoryStore trait definition.

use chatrelay_types::chat::Turn;

/// Keyed store of recent turns per session.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition). Lookups never
/// fail: an unknown session simply has no history.
pub trait HistoryStore: Send + Sync {
    /// Turns recorded for `session_id`, oldest first. Empty for unknown keys.
    fn get(&self, session_id: &str) -> impl std::future::Future<Output = Vec<Turn>> + Send;

    /// Record one exchange for `session_id`.
    ///
    /// A no-op when `session_id` is absent or empty. Otherwise the two turns
    /// are appended and the sequence is trimmed from the front to the store's
    /// per-session bound.
    fn append(
        &self,
        session_id: Option<&str>,
        user: Turn,
        assistant: Turn,
    ) -> impl std::future::Future<Output = ()> + Send;

    /// Number of sessions currently held.
    fn session_count(&self) -> impl std::future::Future<Output = usize> + Send;
}
