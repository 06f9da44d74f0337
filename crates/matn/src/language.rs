use imlo::Script;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Language a piece of site content is published in. The codes are the ones
/// the content API uses in its URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ContentLanguage {
    #[serde(rename = "uz")]
    UzLatin,
    #[serde(rename = "oz")]
    UzCyrillic,
    #[serde(rename = "ru")]
    Russian,
    #[serde(rename = "en")]
    English,
}

impl ContentLanguage {
    pub const ALL: [ContentLanguage; 4] = [
        ContentLanguage::UzLatin,
        ContentLanguage::UzCyrillic,
        ContentLanguage::Russian,
        ContentLanguage::English,
    ];

    pub fn code(self) -> &'static str {
        match self {
            ContentLanguage::UzLatin => "uz",
            ContentLanguage::UzCyrillic => "oz",
            ContentLanguage::Russian => "ru",
            ContentLanguage::English => "en",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|lang| lang.code() == code)
    }

    /// Uzbek content is published in both scripts, so editing it needs the
    /// transliteration surface.
    pub fn requires_dual_script(self) -> bool {
        matches!(self, ContentLanguage::UzLatin | ContentLanguage::UzCyrillic)
    }

    pub fn native_script(self) -> Script {
        match self {
            ContentLanguage::UzLatin | ContentLanguage::English => Script::Latin,
            ContentLanguage::UzCyrillic | ContentLanguage::Russian => Script::Cyrillic,
        }
    }
}

impl fmt::Display for ContentLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for lang in ContentLanguage::ALL {
            assert_eq!(ContentLanguage::from_code(lang.code()), Some(lang));
        }
        assert_eq!(ContentLanguage::from_code(" OZ "), Some(ContentLanguage::UzCyrillic));
        assert_eq!(ContentLanguage::from_code("de"), None);
    }

    #[test]
    fn test_dual_script_only_for_uzbek() {
        assert!(ContentLanguage::UzLatin.requires_dual_script());
        assert!(ContentLanguage::UzCyrillic.requires_dual_script());
        assert!(!ContentLanguage::Russian.requires_dual_script());
        assert!(!ContentLanguage::English.requires_dual_script());
    }

    #[test]
    fn test_serde_uses_codes() {
        let json = serde_json::to_string(&ContentLanguage::UzCyrillic).unwrap();
        assert_eq!(json, "\"oz\"");
        let lang: ContentLanguage = serde_json::from_str("\"ru\"").unwrap();
        assert_eq!(lang, ContentLanguage::Russian);
        assert_eq!(lang.native_script(), Script::Cyrillic);
    }
}
