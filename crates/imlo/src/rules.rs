//! Directional rule tables for Uzbek Latin and Cyrillic.
//!
//! The two tables are authored independently. `CYRILLIC_TO_LATIN` is not
//! derived from `LATIN_TO_CYRILLIC` because several letters collapse
//! (`е`/`э` both become `e`, `ь` disappears), so neither table is the exact
//! inverse of the other.

use lazy_static::lazy_static;
use std::collections::HashMap;

/// A single substitution. `source` may span several characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub source: &'static str,
    pub target: &'static str,
}

/// Ordered set of rules for one direction.
#[derive(Debug)]
pub struct RuleTable {
    name: &'static str,
    rules: Vec<Rule>,
    index: HashMap<&'static str, &'static str>,
    max_source_chars: usize,
}

impl RuleTable {
    pub fn new(name: &'static str, pairs: &[(&'static str, &'static str)]) -> Self {
        let mut rules = Vec::with_capacity(pairs.len());
        let mut index = HashMap::with_capacity(pairs.len());
        let mut max_source_chars = 0;

        for &(source, target) in pairs {
            if source.is_empty() {
                continue;
            }
            if index.insert(source, target).is_some() {
                log::warn!("Rule table {}: duplicate source {:?}, keeping last", name, source);
                rules.retain(|r: &Rule| r.source != source);
            }
            max_source_chars = max_source_chars.max(source.chars().count());
            rules.push(Rule { source, target });
        }

        Self {
            name,
            rules,
            index,
            max_source_chars,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Length in chars of the longest source pattern.
    pub fn max_source_chars(&self) -> usize {
        self.max_source_chars
    }

    pub fn lookup(&self, source: &str) -> Option<&'static str> {
        self.index.get(source).copied()
    }
}

// Every rule that involves an apostrophe is written once per accepted
// apostrophe shape: ASCII, left/right single quotes, modifier letter turned
// comma, and a backtick.
macro_rules! apostrophe_rules {
    ($($a:literal),+ $(,)?) => {
        /// Apostrophe shapes accepted in `o'`, `g'`, `yo'` and `s'h`.
        pub const OKINA: &[&str] = &[$($a),+];

        const APOSTROPHE_PAIRS: &[(&str, &str)] = &[$(
            // "yo'l" is "йўл", not "ё" + "ъ" + "л".
            (concat!("yo", $a), "йў"),
            (concat!("Yo", $a), "Йў"),
            (concat!("YO", $a), "ЙЎ"),
            // Separating apostrophe: "Is'hoq" is "Исҳоқ".
            (concat!("s", $a, "h"), "сҳ"),
            (concat!("S", $a, "h"), "Сҳ"),
            (concat!("S", $a, "H"), "СҲ"),
            (concat!("o", $a), "ў"),
            (concat!("O", $a), "Ў"),
            (concat!("g", $a), "ғ"),
            (concat!("G", $a), "Ғ"),
        )+];
    };
}

apostrophe_rules!("'", "\u{2018}", "\u{2019}", "\u{02BB}", "`");

fn latin_to_cyrillic_pairs() -> Vec<(&'static str, &'static str)> {
    let mut pairs: Vec<(&'static str, &'static str)> = APOSTROPHE_PAIRS.to_vec();

    pairs.extend([
        ("sh", "ш"),
        ("Sh", "Ш"),
        ("SH", "Ш"),
        ("ch", "ч"),
        ("Ch", "Ч"),
        ("CH", "Ч"),
        ("yo", "ё"),
        ("Yo", "Ё"),
        ("YO", "Ё"),
        ("yu", "ю"),
        ("Yu", "Ю"),
        ("YU", "Ю"),
        ("ya", "я"),
        ("Ya", "Я"),
        ("YA", "Я"),
        ("ye", "е"),
        ("Ye", "Е"),
        ("YE", "Е"),
    ]);

    pairs.extend([
        ("a", "а"),
        ("b", "б"),
        ("c", "ц"),
        ("d", "д"),
        // Always "е". Word-initial "э" ("ekran") needs a dictionary.
        ("e", "е"),
        ("f", "ф"),
        ("g", "г"),
        ("h", "ҳ"),
        ("i", "и"),
        ("j", "ж"),
        ("k", "к"),
        ("l", "л"),
        ("m", "м"),
        ("n", "н"),
        ("o", "о"),
        ("p", "п"),
        ("q", "қ"),
        ("r", "р"),
        ("s", "с"),
        ("t", "т"),
        ("u", "у"),
        ("v", "в"),
        ("x", "х"),
        ("y", "й"),
        ("z", "з"),
        ("A", "А"),
        ("B", "Б"),
        ("C", "Ц"),
        ("D", "Д"),
        ("E", "Е"),
        ("F", "Ф"),
        ("G", "Г"),
        ("H", "Ҳ"),
        ("I", "И"),
        ("J", "Ж"),
        ("K", "К"),
        ("L", "Л"),
        ("M", "М"),
        ("N", "Н"),
        ("O", "О"),
        ("P", "П"),
        ("Q", "Қ"),
        ("R", "Р"),
        ("S", "С"),
        ("T", "Т"),
        ("U", "У"),
        ("V", "В"),
        ("X", "Х"),
        ("Y", "Й"),
        ("Z", "З"),
        // Tutuq belgisi
        ("'", "ъ"),
        ("\u{2019}", "ъ"),
        ("\u{02BC}", "ъ"),
    ]);

    pairs
}

// Multi-letter targets are title case ("Ш" -> "Sh"). The engine upper-cases
// them inside all-caps words.
const CYRILLIC_TO_LATIN_PAIRS: &[(&str, &str)] = &[
    ("сҳ", "s'h"),
    ("Сҳ", "S'h"),
    ("СҲ", "S'H"),
    ("а", "a"),
    ("б", "b"),
    ("в", "v"),
    ("г", "g"),
    ("д", "d"),
    ("е", "e"),
    ("ё", "yo"),
    ("ж", "j"),
    ("з", "z"),
    ("и", "i"),
    ("й", "y"),
    ("к", "k"),
    ("л", "l"),
    ("м", "m"),
    ("н", "n"),
    ("о", "o"),
    ("п", "p"),
    ("р", "r"),
    ("с", "s"),
    ("т", "t"),
    ("у", "u"),
    ("ф", "f"),
    ("х", "x"),
    ("ц", "ts"),
    ("ч", "ch"),
    ("ш", "sh"),
    ("щ", "sh"),
    ("ъ", "'"),
    ("ы", "i"),
    ("ь", ""),
    ("э", "e"),
    ("ю", "yu"),
    ("я", "ya"),
    ("ў", "o'"),
    ("қ", "q"),
    ("ғ", "g'"),
    ("ҳ", "h"),
    ("А", "A"),
    ("Б", "B"),
    ("В", "V"),
    ("Г", "G"),
    ("Д", "D"),
    ("Е", "E"),
    ("Ё", "Yo"),
    ("Ж", "J"),
    ("З", "Z"),
    ("И", "I"),
    ("Й", "Y"),
    ("К", "K"),
    ("Л", "L"),
    ("М", "M"),
    ("Н", "N"),
    ("О", "O"),
    ("П", "P"),
    ("Р", "R"),
    ("С", "S"),
    ("Т", "T"),
    ("У", "U"),
    ("Ф", "F"),
    ("Х", "X"),
    ("Ц", "Ts"),
    ("Ч", "Ch"),
    ("Ш", "Sh"),
    ("Щ", "Sh"),
    ("Ъ", "'"),
    ("Ы", "I"),
    ("Ь", ""),
    ("Э", "E"),
    ("Ю", "Yu"),
    ("Я", "Ya"),
    ("Ў", "O'"),
    ("Қ", "Q"),
    ("Ғ", "G'"),
    ("Ҳ", "H"),
];

lazy_static! {
    pub static ref LATIN_TO_CYRILLIC: RuleTable =
        RuleTable::new("latin-to-cyrillic", &latin_to_cyrillic_pairs());
    pub static ref CYRILLIC_TO_LATIN: RuleTable =
        RuleTable::new("cyrillic-to-latin", CYRILLIC_TO_LATIN_PAIRS);
}
