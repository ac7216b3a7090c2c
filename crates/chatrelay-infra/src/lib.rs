//! Infrastructure layer for chatrelay.
//!
//! Contains the implementation of the upstream provider trait defined in
//! `chatrelay-core` (Gemini over HTTPS) and the configuration loader.

pub mod config;
pub mod llm;
