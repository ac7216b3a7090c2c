//! Business logic and port definitions for chatrelay.
//!
//! This crate defines the "ports" (the history store and upstream provider
//! traits) that the infrastructure layer implements, plus the pure text
//! pipeline applied to model output. It depends only on `chatrelay-types`,
//! never on `chatrelay-infra` or any network crate.

pub mod chat;
pub mod format;
pub mod history;
pub mod llm;
