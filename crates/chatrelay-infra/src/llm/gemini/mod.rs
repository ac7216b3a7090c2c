//! Google Gemini provider implementation.
//!
//! This module provides the [`GeminiProvider`] which implements the
//! [`LlmProvider`](chatrelay_core::llm::LlmProvider) trait for the
//! Generative Language API `generateContent` endpoint.

pub mod client;
pub mod types;

pub use client::GeminiProvider;
