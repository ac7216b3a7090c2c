//! Script-element strip applied to every upstream reply.
//!
//! Not a general HTML sanitizer: only `<script>` elements are removed. Other
//! markup passes through untouched and the client renders it as HTML.

use std::sync::LazyLock;

use regex::Regex;

/// `<script` as a whole word, through the nearest `</script>`, any case,
/// across lines.
static SCRIPT_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b.*?</script>").expect("script element pattern is valid")
});

/// Remove every `<script ...>...</script>` element and trim the result.
///
/// Matching is case-insensitive and non-greedy: an element ends at the
/// first `</script>` after its opening tag. An opening tag without a closing
/// tag is kept as text.
pub fn sanitize(raw: &str) -> String {
    SCRIPT_ELEMENT.replace_all(raw, "").trim().to_string()
}
