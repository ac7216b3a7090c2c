//! Per-session conversation history.
//!
//! - `HistoryStore`: RPITIT trait so an external keyed cache can replace the
//!   in-process map in a multi-instance deployment
//! - `InMemoryHistoryStore`: bounded `DashMap`-backed implementation

pub mod memory;
pub mod store;

pub use memory::InMemoryHistoryStore;
pub use store::HistoryStore;
