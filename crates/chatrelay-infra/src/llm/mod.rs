//! Upstream model clients.

pub mod gemini;
