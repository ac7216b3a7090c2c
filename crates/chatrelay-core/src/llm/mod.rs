//! Upstream model abstraction.
//!
//! - `LlmProvider`: RPITIT trait implemented by the concrete upstream client
//!   in chatrelay-infra

pub mod provider;

pub use provider::LlmProvider;
