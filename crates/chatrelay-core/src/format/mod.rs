//! Text pipeline applied to model output.
//!
//! - `sanitize`: server-side script-element strip and trim
//! - `markdown`: lightweight markdown to HTML (tokenizer + renderer)
//! - `reveal`: tag-aware typing reveal of rendered HTML

pub mod markdown;
pub mod reveal;
pub mod sanitize;

pub use markdown::format_markdown;
pub use sanitize::sanitize;
