pub mod engine;
pub mod html;
pub mod rules;
pub mod sanitize;
pub mod script;

pub use engine::{to_cyrillic, to_latin, Direction, Transliterator};
pub use script::{detect, Script};
