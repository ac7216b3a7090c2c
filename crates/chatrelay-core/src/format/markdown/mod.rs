//! Markdown-to-HTML formatting for model replies.
//!
//! Supports ATX headings, fenced code blocks, inline code, bold, italic,
//! bullet lines, and paragraphs. Anything else passes through as text.

pub mod lexer;
pub mod render;

pub use lexer::{Block, Inline, tokenize};

/// Convert `markdown` to HTML. Total: every input produces some output.
pub fn format_markdown(markdown: &str) -> String {
    render::render(&tokenize(markdown))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// First nesting violation in `html`, if any. `<br>` is a void element.
    fn nesting_error(html: &str) -> Option<String> {
        let mut open: Vec<&str> = Vec::new();
        let mut rest = html;
        while let Some(start) = rest.find('<') {
            let Some(len) = rest[start..].find('>') else {
                break;
            };
            let tag = &rest[start + 1..start + len];
            rest = &rest[start + len + 1..];

            if let Some(name) = tag.strip_prefix('/') {
                match open.pop() {
                    Some(top) if top == name => {}
                    top => return Some(format!("</{name}> closes {top:?}")),
                }
            } else {
                let name = tag.split_whitespace().next().unwrap_or_default();
                if name != "br" {
                    open.push(name);
                }
            }
        }
        (!open.is_empty()).then(|| format!("unclosed {open:?}"))
    }

    fn assert_well_nested(html: &str) {
        if let Some(err) = nesting_error(html) {
            panic!("{err} in {html:?}");
        }
    }

    fn corpus() -> Vec<&'static str> {
        vec![
            "",
            "plain text",
            "**bold** and *italic*",
            "# Title\n\nSome *text* with `code`.\n\n- one\n- **two**\n+ three",
            "```python\nprint('*hi*')\n```\nafter",
            "line one\nline two\n\nnext paragraph",
            "**unclosed bold and *unclosed italic",
            "*a **b** c* and **a *b* c**",
            "### Mixed `inline **not bold**` heading",
            "```\nnever closed\n**still bold**",
            "2 * 3 * 4 = 24",
        ]
    }

    #[test]
    fn test_bold_and_italic_sentence() {
        let html = format_markdown("**bold** and *italic*");
        assert!(html.contains(
            "<strong class=\"font-bold\">bold</strong> and <em class=\"italic\">italic</em>"
        ));
        assert_eq!(
            html,
            "<p class=\"my-2\"><strong class=\"font-bold\">bold</strong> and <em class=\"italic\">italic</em></p>"
        );
    }

    #[test]
    fn test_mixed_document() {
        let html = format_markdown(
            "## Steps\n1. Install\n- run `cargo build`\n\n```sh\necho *\n```\nDone.",
        );
        assert_eq!(
            html,
            [
                "<h2 class=\"font-bold text-2xl my-3\">Steps</h2>",
                "<p class=\"my-2\">1. Install</p>",
                "<li class=\"ml-4\">• run <code class=\"bg-gray-200 px-1 rounded\">cargo build</code></li>",
                "<pre class=\"bg-gray-800 text-white p-4 rounded-lg my-3 overflow-x-auto\"><code>echo *</code></pre>",
                "<p class=\"my-2\">Done.</p>",
            ]
            .join("<br>")
        );
    }

    #[test]
    fn test_no_raw_newlines_remain() {
        let html = format_markdown("# Title\nbody\n\n- a\n- b\n\n```\nx\ny\n```");
        assert!(!html.contains('\n'), "{html:?}");
        assert!(html.ends_with("<code>x<br>y</code></pre>"));
    }

    #[test]
    fn test_nesting_check_rejects_crossed_tags() {
        assert!(nesting_error("<strong class=\"font-bold\"><em>x</strong></em>").is_some());
        assert!(nesting_error("<p><li>x</li>").is_some());
        assert_well_nested("<p class=\"my-2\"><strong>a<em>b</em></strong><br>c</p>");
    }

    #[test]
    fn test_crlf_input_matches_lf_input() {
        assert_eq!(
            format_markdown("a\r\nb\r\n\r\n- c"),
            format_markdown("a\nb\n\n- c")
        );
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        assert_eq!(format_markdown(""), "");
        assert_eq!(format_markdown("\n\n  \n"), "");
    }

    #[test]
    fn test_output_is_well_nested() {
        for input in corpus() {
            assert_well_nested(&format_markdown(input));
        }
    }

    #[test]
    fn test_double_application_stays_well_nested() {
        for input in corpus() {
            let twice = format_markdown(&format_markdown(input));
            assert_well_nested(&twice);
        }
    }

    #[test]
    fn test_deterministic() {
        for input in corpus() {
            assert_eq!(format_markdown(input), format_markdown(input));
        }
    }
}
