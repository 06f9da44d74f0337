use serde::{Deserialize, Serialize};

use crate::engine::Direction;
use crate::html;

/// Share of letters one script needs before a text counts as written in it.
const DOMINANCE: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Script {
    Latin,
    Cyrillic,
    Mixed,
    Unknown,
}

fn is_cyrillic(c: char) -> bool {
    matches!(c, '\u{0400}'..='\u{04FF}' | '\u{0500}'..='\u{052F}')
}

fn is_latin(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, '\u{00C0}'..='\u{024F}')
}

/// Classify the dominant script of the text nodes in `html`.
pub fn detect(html: &str) -> Script {
    let mut latin = 0usize;
    let mut cyrillic = 0usize;

    for segment in html::segments(html).into_iter().filter(|s| !s.is_markup()) {
        for c in segment.text.chars() {
            if is_cyrillic(c) {
                cyrillic += 1;
            } else if is_latin(c) {
                latin += 1;
            }
        }
    }

    let total = latin + cyrillic;
    if total == 0 {
        return Script::Unknown;
    }

    let total = total as f64;
    if latin as f64 / total >= DOMINANCE {
        Script::Latin
    } else if cyrillic as f64 / total >= DOMINANCE {
        Script::Cyrillic
    } else {
        Script::Mixed
    }
}

impl Direction {
    /// Direction that converts text written in `script` into the other one.
    pub fn for_script(script: Script) -> Option<Direction> {
        match script {
            Script::Latin => Some(Direction::LatinToCyrillic),
            Script::Cyrillic => Some(Direction::CyrillicToLatin),
            Script::Mixed | Script::Unknown => None,
        }
    }

    pub fn source_script(self) -> Script {
        match self {
            Direction::LatinToCyrillic => Script::Latin,
            Direction::CyrillicToLatin => Script::Cyrillic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_ignores_markup() {
        assert_eq!(detect(r#"<span class="latin-heavy">Шаҳар</span>"#), Script::Cyrillic);
        assert_eq!(detect("<p>Toshkent shahri</p>"), Script::Latin);
    }

    #[test]
    fn test_detect_mixed_and_unknown() {
        assert_eq!(detect("Toshkent Тошкент"), Script::Mixed);
        assert_eq!(detect("123 !?"), Script::Unknown);
        assert_eq!(detect(""), Script::Unknown);
    }

    #[test]
    fn test_direction_for_script() {
        assert_eq!(
            Direction::for_script(Script::Latin),
            Some(Direction::LatinToCyrillic)
        );
        assert_eq!(Direction::for_script(Script::Mixed), None);
        assert_eq!(Direction::CyrillicToLatin.source_script(), Script::Cyrillic);
    }
}
