// Matn library exports

pub mod command;
pub mod config;
pub mod document;
pub mod language;
pub mod record;
pub mod repository;
pub mod session;

pub use command::{CommandOutcome, FormatCommand, HeadingLevel};
pub use config::Config;
pub use document::{DocumentState, EditableDocument, Selection};
pub use language::ContentLanguage;
pub use repository::{InMemoryRepository, Repository};
pub use session::{EditorOutput, EditorSession, ReactiveProps, Seed, Surface};
