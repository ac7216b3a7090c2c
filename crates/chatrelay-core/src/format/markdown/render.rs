//! HTML rendering of tokenized markdown.
//!
//! Class names match the stylesheet the browser client ships with. Text is
//! emitted unescaped.

use super::lexer::{Block, Inline};

const HEADING_CLASS: &str = "font-bold";
const CODE_BLOCK_CLASS: &str = "bg-gray-800 text-white p-4 rounded-lg my-3 overflow-x-auto";
const INLINE_CODE_CLASS: &str = "bg-gray-200 px-1 rounded";
const LIST_ITEM_CLASS: &str = "ml-4";
const PARAGRAPH_CLASS: &str = "my-2";
const LINE_BREAK: &str = "<br>";

/// Render blocks separated by line breaks. The output contains no raw
/// newlines.
pub fn render(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(render_block)
        .collect::<Vec<_>>()
        .join(LINE_BREAK)
}

fn render_block(block: &Block) -> String {
    match block {
        Block::Heading { level, content } => {
            let size = 4u8.saturating_sub(*level).max(1);
            format!(
                "<h{level} class=\"{HEADING_CLASS} text-{size}xl my-3\">{}</h{level}>",
                render_inline(content)
            )
        }
        Block::Code(code) => {
            let code = code.replace('\n', LINE_BREAK);
            format!("<pre class=\"{CODE_BLOCK_CLASS}\"><code>{code}</code></pre>")
        }
        Block::ListItem(content) => {
            format!(
                "<li class=\"{LIST_ITEM_CLASS}\">• {}</li>",
                render_inline(content)
            )
        }
        Block::Paragraph(lines) => {
            let body = lines
                .iter()
                .map(|line| render_inline(line))
                .collect::<Vec<_>>()
                .join(LINE_BREAK);
            format!("<p class=\"{PARAGRAPH_CLASS}\">{body}</p>")
        }
    }
}

fn render_inline(spans: &[Inline]) -> String {
    let mut out = String::new();
    for span in spans {
        match span {
            Inline::Text(text) => out.push_str(text),
            Inline::Code(code) => {
                out.push_str(&format!("<code class=\"{INLINE_CODE_CLASS}\">{code}</code>"));
            }
            Inline::Strong(inner) => {
                out.push_str(&format!(
                    "<strong class=\"font-bold\">{}</strong>",
                    render_inline(inner)
                ));
            }
            Inline::Emphasis(inner) => {
                out.push_str(&format!("<em class=\"italic\">{}</em>", render_inline(inner)));
            }
        }
    }
    out
}
