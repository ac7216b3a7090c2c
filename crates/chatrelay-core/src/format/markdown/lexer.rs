//! Line-oriented tokenizer for the markdown subset the client understands.
//!
//! Block structure is decided per line (heading, list item, fence, blank,
//! paragraph text); inline spans are parsed within a single line only.

/// Inline span inside a heading, list item, or paragraph line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    /// Single-backtick code span, content verbatim.
    Code(String),
    Strong(Vec<Inline>),
    Emphasis(Vec<Inline>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, content: Vec<Inline> },
    /// Fenced code block. Inner lines verbatim, language tag dropped.
    Code(String),
    ListItem(Vec<Inline>),
    /// Consecutive non-blank lines, each parsed separately.
    Paragraph(Vec<Vec<Inline>>),
}

/// Split `source` into blocks.
pub fn tokenize(source: &str) -> Vec<Block> {
    let normalized = source.replace("\r\n", "\n");
    let lines: Vec<&str> = normalized.split('\n').collect();

    let mut blocks = Vec::new();
    let mut paragraph: Vec<Vec<Inline>> = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if is_fence_open(line) {
            if let Some(end) = closing_fence(&lines, i + 1) {
                flush(&mut paragraph, &mut blocks);
                blocks.push(Block::Code(lines[i + 1..end].join("\n")));
                i = end + 1;
                continue;
            }
        }

        if line.trim().is_empty() {
            flush(&mut paragraph, &mut blocks);
        } else if let Some((level, text)) = heading(line) {
            flush(&mut paragraph, &mut blocks);
            blocks.push(Block::Heading {
                level,
                content: parse_inline(text),
            });
        } else if let Some(text) = list_item(line) {
            flush(&mut paragraph, &mut blocks);
            blocks.push(Block::ListItem(parse_inline(text)));
        } else {
            paragraph.push(parse_inline(line));
        }

        i += 1;
    }

    flush(&mut paragraph, &mut blocks);
    blocks
}

fn flush(paragraph: &mut Vec<Vec<Inline>>, blocks: &mut Vec<Block>) {
    if !paragraph.is_empty() {
        blocks.push(Block::Paragraph(std::mem::take(paragraph)));
    }
}

/// "```" optionally followed by a word-character language tag.
fn is_fence_open(line: &str) -> bool {
    line.strip_prefix("```").is_some_and(|tag| {
        tag.trim_end()
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_')
    })
}

fn closing_fence(lines: &[&str], from: usize) -> Option<usize> {
    (from..lines.len()).find(|&j| lines[j].trim_end() == "```")
}

fn heading(line: &str) -> Option<(u8, &str)> {
    let hashes = line.bytes().take_while(|&b| b == b'#').count();
    if !(1..=6).contains(&hashes) {
        return None;
    }
    let text = line[hashes..].strip_prefix(' ')?.trim();
    if text.is_empty() {
        return None;
    }
    Some((hashes as u8, text))
}

fn list_item(line: &str) -> Option<&str> {
    let rest = line.trim_start();
    let marker = rest.chars().next()?;
    if !matches!(marker, '-' | '*' | '+') {
        return None;
    }
    let after = &rest[1..];
    if !after.starts_with(char::is_whitespace) {
        return None;
    }
    let text = after.trim();
    (!text.is_empty()).then_some(text)
}

/// Parse inline spans: code, then bold, then italic.
///
/// Delimiters only count when flanking: an opener must be followed by
/// non-whitespace and a closer preceded by non-whitespace. Unmatched
/// delimiters stay as literal text.
pub fn parse_inline(text: &str) -> Vec<Inline> {
    let mut spans = Vec::new();
    let mut literal = String::new();
    let mut i = 0;

    while i < text.len() {
        let rest = &text[i..];

        if rest.starts_with('`') {
            if let Some(len) = rest[1..].find('`').filter(|&len| len > 0) {
                push_literal(&mut literal, &mut spans);
                spans.push(Inline::Code(rest[1..1 + len].to_string()));
                i += len + 2;
                continue;
            }
        } else if rest.starts_with("**") {
            if let Some(end) = strong_close(text, i + 2) {
                push_literal(&mut literal, &mut spans);
                spans.push(Inline::Strong(parse_inline(&text[i + 2..end])));
                i = end + 2;
                continue;
            }
        } else if rest.starts_with('*') {
            if let Some(end) = emphasis_close(text, i + 1) {
                push_literal(&mut literal, &mut spans);
                spans.push(Inline::Emphasis(parse_inline(&text[i + 1..end])));
                i = end + 1;
                continue;
            }
        }

        // Unmatched '**' is literal as a whole so its second star cannot
        // open an emphasis.
        let step = if rest.starts_with("**") {
            2
        } else {
            rest.chars().next().map_or(1, char::len_utf8)
        };
        literal.push_str(&rest[..step]);
        i += step;
    }

    push_literal(&mut literal, &mut spans);
    spans
}

fn push_literal(literal: &mut String, spans: &mut Vec<Inline>) {
    if !literal.is_empty() {
        spans.push(Inline::Text(std::mem::take(literal)));
    }
}

fn opens_at(text: &str, content_start: usize) -> bool {
    text[content_start..]
        .chars()
        .next()
        .is_some_and(|c| !c.is_whitespace())
}

fn closes_at(text: &str, pos: usize) -> bool {
    text[..pos]
        .chars()
        .next_back()
        .is_some_and(|c| !c.is_whitespace())
}

/// Position of the `**` closing a bold span whose content starts at `start`.
fn strong_close(text: &str, start: usize) -> Option<usize> {
    if !opens_at(text, start) {
        return None;
    }
    let mut from = start + text[start..].chars().next()?.len_utf8();
    while let Some(offset) = text.get(from..)?.find("**") {
        let pos = from + offset;
        if closes_at(text, pos) {
            return Some(pos);
        }
        from = pos + 1;
    }
    None
}

/// Position of the lone `*` closing an italic span whose content starts at
/// `start`. Stars that belong to a `**` pair are skipped.
fn emphasis_close(text: &str, start: usize) -> Option<usize> {
    if !opens_at(text, start) {
        return None;
    }
    let bytes = text.as_bytes();
    let mut pos = start + 1;
    while pos < bytes.len() {
        if bytes[pos] == b'*' {
            if bytes.get(pos + 1) == Some(&b'*') {
                pos += 2;
                continue;
            }
            if closes_at(text, pos) {
                return Some(pos);
            }
        }
        pos += 1;
    }
    None
}
