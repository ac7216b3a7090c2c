//! Typing reveal for rendered HTML.
//!
//! The HTML is split into tags and text runs. Tags appear whole; text appears
//! one character at a time. Every intermediate frame is a prefix of the input
//! that never ends inside a tag, and the last frame is the input itself.

use std::time::Duration;

/// Pause after each revealed text character.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// A complete `<...>` tag.
    Tag(&'a str),
    /// Text between tags, whitespace-only runs included.
    Text(&'a str),
}

/// Split `html` into alternating tag and text segments.
///
/// A `<` with no closing `>` starts a text run that extends to the end.
pub fn segments(html: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut rest = html;

    while !rest.is_empty() {
        if rest.starts_with('<') {
            if let Some(end) = rest.find('>') {
                out.push(Segment::Tag(&rest[..=end]));
                rest = &rest[end + 1..];
                continue;
            }
            out.push(Segment::Text(rest));
            break;
        }

        let end = rest.find('<').unwrap_or(rest.len());
        out.push(Segment::Text(&rest[..end]));
        rest = &rest[end..];
    }

    out
}

/// Successive prefixes of an HTML string, one per reveal step.
pub struct Frames<'a> {
    html: &'a str,
    cuts: std::vec::IntoIter<(usize, bool)>,
}

impl<'a> Frames<'a> {
    pub fn new(html: &'a str) -> Self {
        let mut cuts = Vec::new();
        let mut offset = 0;

        for segment in segments(html) {
            match segment {
                Segment::Tag(tag) => {
                    offset += tag.len();
                    cuts.push((offset, false));
                }
                Segment::Text(text) => {
                    for ch in text.chars() {
                        offset += ch.len_utf8();
                        cuts.push((offset, true));
                    }
                }
            }
        }

        Self {
            html,
            cuts: cuts.into_iter(),
        }
    }
}

impl<'a> Iterator for Frames<'a> {
    /// The visible prefix, and whether the step revealed a text character.
    type Item = (&'a str, bool);

    fn next(&mut self) -> Option<Self::Item> {
        let (cut, is_text) = self.cuts.next()?;
        Some((&self.html[..cut], is_text))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.cuts.size_hint()
    }
}

/// Play the reveal: `on_frame` receives each prefix, with a `delay` pause
/// after every text character.
pub async fn reveal<F>(html: &str, delay: Duration, mut on_frame: F)
where
    F: FnMut(&str),
{
    for (frame, is_text) in Frames::new(html) {
        on_frame(frame);
        if is_text && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
