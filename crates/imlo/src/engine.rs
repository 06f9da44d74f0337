use serde::{Deserialize, Serialize};

use crate::html;
use crate::rules::{RuleTable, CYRILLIC_TO_LATIN, LATIN_TO_CYRILLIC};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    LatinToCyrillic,
    CyrillicToLatin,
}

impl Direction {
    pub fn table(self) -> &'static RuleTable {
        match self {
            Direction::LatinToCyrillic => &LATIN_TO_CYRILLIC,
            Direction::CyrillicToLatin => &CYRILLIC_TO_LATIN,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Direction::LatinToCyrillic => Direction::CyrillicToLatin,
            Direction::CyrillicToLatin => Direction::LatinToCyrillic,
        }
    }
}

/// Greedy longest-match transliterator over one rule table.
#[derive(Debug, Clone, Copy)]
pub struct Transliterator {
    direction: Direction,
    table: &'static RuleTable,
}

impl Transliterator {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            table: direction.table(),
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Transliterate plain text. Every character is treated as text, so
    /// markup passed here gets transliterated too; use [`transliterate`]
    /// for HTML.
    ///
    /// [`transliterate`]: Transliterator::transliterate
    pub fn transliterate_text(&self, text: &str) -> String {
        // Byte offset of every char start, plus the end of the string.
        let bounds: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        let char_count = bounds.len() - 1;
        let max_len = self.table.max_source_chars();

        let mut out = String::with_capacity(text.len() * 2);
        let mut pos = 0;

        while pos < char_count {
            let longest = max_len.min(char_count - pos);
            let matched = (1..=longest).rev().find_map(|len| {
                let candidate = &text[bounds[pos]..bounds[pos + len]];
                self.table.lookup(candidate).map(|target| (len, target))
            });

            match matched {
                Some((len, target)) => {
                    let source = &text[bounds[pos]..bounds[pos + len]];
                    if is_title_case_expansion(source, target)
                        && in_all_caps_word(text, bounds[pos], bounds[pos + len])
                    {
                        out.push_str(&target.to_uppercase());
                    } else {
                        out.push_str(target);
                    }
                    pos += len;
                }
                None => {
                    out.push_str(&text[bounds[pos]..bounds[pos + 1]]);
                    pos += 1;
                }
            }
        }

        out
    }

    /// Transliterate an HTML fragment (or plain text), leaving tags,
    /// attributes, comments and entities byte-identical.
    pub fn transliterate(&self, html: &str) -> String {
        html::map_text(html, |text| self.transliterate_text(text))
    }
}

/// An upper-case source mapped to a target that still has lower-case
/// letters, like "Ш" -> "Sh".
fn is_title_case_expansion(source: &str, target: &str) -> bool {
    source.chars().any(char::is_uppercase)
        && !source.chars().any(char::is_lowercase)
        && target.chars().any(char::is_lowercase)
}

/// Whether the letters around `start..end` are upper case. The following
/// letter decides; at the end of a word the preceding one does.
fn in_all_caps_word(text: &str, start: usize, end: usize) -> bool {
    match text[end..].chars().next() {
        Some(next) if next.is_uppercase() => true,
        Some(next) if next.is_lowercase() => false,
        _ => text[..start]
            .chars()
            .next_back()
            .is_some_and(char::is_uppercase),
    }
}

pub fn to_cyrillic(html: &str) -> String {
    Transliterator::new(Direction::LatinToCyrillic).transliterate(html)
}

pub fn to_latin(html: &str) -> String {
    Transliterator::new(Direction::CyrillicToLatin).transliterate(html)
}
