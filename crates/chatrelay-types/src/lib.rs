//! Shared domain types for chatrelay.
//!
//! This crate contains the core domain types used across the relay:
//! conversation turns, upstream generation requests/responses, configuration,
//! and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
