//! Splitting HTML fragments into markup and text so transliteration only
//! ever touches text-node characters.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Quoted attribute values may contain '>'. A tag with a stray quote
    // falls back to ending at the first '>'.
    static ref MARKUP: Regex = Regex::new(
        r#"(?s)<!--.*?-->|<[/!?a-zA-Z](?:[^>"']|"[^"]*"|'[^']*')*>|<[/!?a-zA-Z][^>]*>|&(?:#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z][a-zA-Z0-9]*);"#
    )
    .expect("Invalid MARKUP regex pattern");
    static ref TAG: Regex =
        Regex::new(r"^<(/?)([a-zA-Z][a-zA-Z0-9]*)").expect("Invalid TAG regex pattern");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Text,
    Markup,
}

/// A contiguous run of either text or markup, borrowed from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub kind: SegmentKind,
    /// Byte offset of the segment in the source string.
    pub start: usize,
    pub text: &'a str,
}

impl Segment<'_> {
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }

    pub fn is_markup(&self) -> bool {
        self.kind == SegmentKind::Markup
    }
}

/// Split `html` into alternating text and markup segments covering the whole
/// input. Empty text segments are never produced.
pub fn segments(html: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut cursor = 0;

    for m in MARKUP.find_iter(html) {
        if m.start() > cursor {
            out.push(Segment {
                kind: SegmentKind::Text,
                start: cursor,
                text: &html[cursor..m.start()],
            });
        }
        out.push(Segment {
            kind: SegmentKind::Markup,
            start: m.start(),
            text: m.as_str(),
        });
        cursor = m.end();
    }

    if cursor < html.len() {
        out.push(Segment {
            kind: SegmentKind::Text,
            start: cursor,
            text: &html[cursor..],
        });
    }

    out
}

/// Rebuild `html`, passing every text segment through `f` and copying every
/// markup segment verbatim.
pub fn map_text<F>(html: &str, mut f: F) -> String
where
    F: FnMut(&str) -> String,
{
    let mut out = String::with_capacity(html.len());
    for segment in segments(html) {
        match segment.kind {
            SegmentKind::Text => out.push_str(&f(segment.text)),
            SegmentKind::Markup => out.push_str(segment.text),
        }
    }
    out
}

/// Concatenated text segments, markup dropped.
pub fn text_content(html: &str) -> String {
    segments(html)
        .into_iter()
        .filter(|s| !s.is_markup())
        .map(|s| s.text)
        .collect()
}

/// The markup segment strictly containing `byte_idx`, if any. Offsets equal
/// to a segment's start or end are boundaries and do not count as inside.
pub fn markup_around(html: &str, byte_idx: usize) -> Option<(usize, usize)> {
    segments(html)
        .into_iter()
        .filter(|s| s.is_markup())
        .find(|s| s.start < byte_idx && byte_idx < s.end())
        .map(|s| (s.start, s.end()))
}

pub fn is_inside_markup(html: &str, byte_idx: usize) -> bool {
    markup_around(html, byte_idx).is_some()
}

/// Lowercase tag name of a tag segment and whether it is a closing tag.
/// Comments and entities yield `None`.
pub fn tag_name(markup: &str) -> Option<(String, bool)> {
    TAG.captures(markup)
        .map(|caps| (caps[2].to_ascii_lowercase(), !caps[1].is_empty()))
}

const VOID_TAGS: [&str; 8] = ["br", "img", "hr", "input", "meta", "link", "wbr", "source"];

/// Elements that never take a closing tag.
pub fn is_void_tag(name: &str) -> bool {
    VOID_TAGS.contains(&name)
}

/// Whether a markup segment opens an element that expects a closing tag.
pub fn opens_element(markup: &str) -> Option<String> {
    match tag_name(markup)? {
        (name, false) if !is_void_tag(&name) && !markup.ends_with("/>") => Some(name),
        _ => None,
    }
}

/// Whether every element opened in `fragment` is closed inside it, in order,
/// and nothing is closed that was opened outside it.
pub fn is_balanced(fragment: &str) -> bool {
    let mut open: Vec<String> = Vec::new();
    for segment in segments(fragment).into_iter().filter(|s| s.is_markup()) {
        if let Some(name) = opens_element(segment.text) {
            open.push(name);
        } else if let Some((name, true)) = tag_name(segment.text) {
            if open.pop().as_deref() != Some(name.as_str()) {
                return false;
            }
        }
    }
    open.is_empty()
}

/// Escape text so it can be inserted into an HTML fragment as a text node.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
