//! Editing session over one or two surfaces.
//!
//! A session owns the `main` document and, for languages published in both
//! scripts, a `translit` document. The two are never synchronized; the only
//! link is the explicit transliteration action, which rewrites content in
//! place on whichever surface is active.

use imlo::{sanitize, Direction, Transliterator};

use crate::command::{self, CommandOutcome, FormatCommand};
use crate::config::{Config, DirectionSetting};
use crate::document::{DocumentState, EditableDocument, Selection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    Main,
    Translit,
}

/// Initial content, read once by [`EditorSession::mount`]. Nothing re-applies
/// it later, so a host re-rendering with a new seed cannot clobber edits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Seed {
    pub initial_content: String,
    pub initial_translit_content: String,
}

impl Seed {
    pub fn new(initial_content: impl Into<String>, initial_translit_content: impl Into<String>) -> Self {
        Self {
            initial_content: initial_content.into(),
            initial_translit_content: initial_translit_content.into(),
        }
    }
}

/// Inputs the host may change while the session is mounted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReactiveProps {
    pub show_transliteration: bool,
}

/// Final HTML of both surfaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorOutput {
    pub content: String,
    pub translit_content: String,
}

type ChangeCallback = Box<dyn FnMut(&str)>;

pub struct EditorSession {
    main: EditableDocument,
    translit: EditableDocument,
    show_transliteration: bool,
    active: Surface,
    focused: Option<Surface>,
    direction: DirectionSetting,
    sanitize_output: bool,
    on_change: Option<ChangeCallback>,
    on_translit_change: Option<ChangeCallback>,
}

impl EditorSession {
    pub fn mount(seed: Seed, props: ReactiveProps, config: &Config) -> Self {
        let history_limit = config.editor.history_limit;
        log::debug!(
            "Mounting editor session (transliteration: {})",
            props.show_transliteration
        );

        Self {
            main: EditableDocument::seeded(&seed.initial_content).with_history_limit(history_limit),
            translit: EditableDocument::seeded(&seed.initial_translit_content)
                .with_history_limit(history_limit),
            show_transliteration: props.show_transliteration,
            active: Surface::Main,
            focused: None,
            direction: config.transliteration.direction,
            sanitize_output: config.editor.sanitize_output,
            on_change: None,
            on_translit_change: None,
        }
    }

    pub fn on_change(mut self, callback: impl FnMut(&str) + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    pub fn on_translit_change(mut self, callback: impl FnMut(&str) + 'static) -> Self {
        self.on_translit_change = Some(Box::new(callback));
        self
    }

    /// Apply new reactive props. Hiding transliteration sends the user back to
    /// the main tab; the transliteration document itself is kept.
    pub fn update_props(&mut self, props: ReactiveProps) {
        self.show_transliteration = props.show_transliteration;
        if !self.show_transliteration && self.active == Surface::Translit {
            self.active = Surface::Main;
            if self.focused.is_some() {
                self.focused = Some(Surface::Main);
            }
        }
    }

    pub fn show_transliteration(&self) -> bool {
        self.show_transliteration
    }

    pub fn active_surface(&self) -> Surface {
        self.active
    }

    pub fn focused_surface(&self) -> Option<Surface> {
        self.focused
    }

    /// Make `surface` the target of subsequent commands. Fails when the
    /// transliteration tab is hidden.
    pub fn switch_tab(&mut self, surface: Surface) -> bool {
        if surface == Surface::Translit && !self.show_transliteration {
            return false;
        }
        self.active = surface;
        self.focused = Some(surface);
        true
    }

    pub fn focus(&mut self) {
        self.focused = Some(self.active);
    }

    pub fn blur(&mut self) {
        self.focused = None;
    }

    pub fn document(&self, surface: Surface) -> &EditableDocument {
        match surface {
            Surface::Main => &self.main,
            Surface::Translit => &self.translit,
        }
    }

    pub fn html(&self, surface: Surface) -> String {
        self.document(surface).html()
    }

    pub fn state(&self, surface: Surface) -> DocumentState {
        self.document(surface).state()
    }

    pub fn selection(&self) -> Selection {
        self.document(self.active).selection()
    }

    fn active_mut(&mut self) -> &mut EditableDocument {
        match self.active {
            Surface::Main => &mut self.main,
            Surface::Translit => &mut self.translit,
        }
    }

    fn notify(&mut self, surface: Surface) {
        let html = self.html(surface);
        let callback = match surface {
            Surface::Main => self.on_change.as_mut(),
            Surface::Translit => self.on_translit_change.as_mut(),
        };
        if let Some(callback) = callback {
            callback(&html);
        }
    }

    pub fn set_selection(&mut self, anchor: usize, head: usize) {
        self.focus();
        self.active_mut().set_selection(anchor, head);
    }

    pub fn select_all(&mut self) {
        self.focus();
        self.active_mut().select_all();
    }

    /// A typing event on the active surface.
    pub fn insert_text(&mut self, text: &str) {
        self.focus();
        self.active_mut().insert_text(text);
        self.notify(self.active);
    }

    pub fn delete_backward(&mut self) -> bool {
        self.focus();
        let removed = self.active_mut().delete_backward();
        if removed {
            self.notify(self.active);
        }
        removed
    }

    /// Paste an HTML fragment; it is sanitized before it reaches the document.
    pub fn paste_html(&mut self, html: &str) {
        self.focus();
        let clean = sanitize::sanitize_editor_html(html);
        self.active_mut().replace_selection(&clean);
        self.notify(self.active);
    }

    /// Run a formatting command on the active surface's selection, then give
    /// focus back to that surface.
    pub fn apply_command(&mut self, command: FormatCommand, value: Option<&str>) -> CommandOutcome {
        let outcome = command::apply(self.active_mut(), command, value);
        self.focus();
        if outcome.is_applied() {
            self.notify(self.active);
        }
        outcome
    }

    /// Transliterate the selection, or the whole active surface when the
    /// selection is collapsed. The direction comes from config; with `auto`
    /// it follows the dominant script of the text being converted, and text
    /// with no clear script is left alone.
    pub fn transliterate_selection_or_all(&mut self) -> CommandOutcome {
        let direction = match self.direction.fixed() {
            Some(direction) => direction,
            None => {
                let doc = self.document(self.active);
                let source = if doc.selection().is_collapsed() {
                    doc.html()
                } else {
                    doc.selected_html()
                };
                match Direction::for_script(imlo::detect(&source)) {
                    Some(direction) => direction,
                    None => {
                        log::debug!("No dominant script, transliteration skipped");
                        return CommandOutcome::NoOp;
                    }
                }
            }
        };
        self.transliterate_selection_or_all_with(direction)
    }

    pub fn transliterate_selection_or_all_with(&mut self, direction: Direction) -> CommandOutcome {
        let transliterator = Transliterator::new(direction);

        // Surfaces always hold HTML, so markup is never transliterated here.
        let doc = self.active_mut();
        if doc.selection().is_collapsed() {
            let converted = transliterator.transliterate(&doc.html());
            doc.select_all();
            doc.replace_selection(&converted);
            log::debug!("Transliterated whole surface ({:?})", direction);
        } else {
            let converted = transliterator.transliterate(&doc.selected_html());
            doc.replace_selection_keep_selected(&converted);
            log::debug!("Transliterated selection ({:?})", direction);
        }

        self.focus();
        self.notify(self.active);
        CommandOutcome::Applied
    }

    pub fn undo(&mut self) -> bool {
        self.focus();
        let undone = self.active_mut().undo();
        if undone {
            self.notify(self.active);
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        self.focus();
        let redone = self.active_mut().redo();
        if redone {
            self.notify(self.active);
        }
        redone
    }

    /// Current HTML of both surfaces, sanitized when configured.
    pub fn export(&self) -> EditorOutput {
        let finish = |html: String| {
            if self.sanitize_output {
                sanitize::sanitize_editor_html(&html)
            } else {
                html
            }
        };
        EditorOutput {
            content: finish(self.main.html()),
            translit_content: finish(self.translit.html()),
        }
    }

    /// Discard the session, handing back its final content.
    pub fn unmount(self) -> EditorOutput {
        log::debug!("Unmounting editor session");
        self.export()
    }
}
