//! chatrelay application layer: HTTP relay server, shared state, and the
//! terminal client used by the `chatrelay` binary.

pub mod cli;
pub mod http;
pub mod state;
