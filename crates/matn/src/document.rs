use imlo::html::{self, SegmentKind};
use ropey::Rope;
use std::ops::Range;

const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Selection in char indices of the HTML serialization. `anchor` is where the
/// selection started, `head` where it ends (the caret).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub anchor: usize,
    pub head: usize,
}

impl Selection {
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    pub fn caret(pos: usize) -> Self {
        Self::new(pos, pos)
    }

    pub fn start(&self) -> usize {
        self.anchor.min(self.head)
    }

    pub fn end(&self) -> usize {
        self.anchor.max(self.head)
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.head
    }

    pub fn range(&self) -> Range<usize> {
        self.start()..self.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentState {
    /// Nothing typed yet; seeded content does not count as input.
    Empty,
    Editing,
}

#[derive(Clone)]
struct Snapshot {
    content: String,
    selection: Selection,
}

/// Rich-text buffer holding an HTML fragment and a selection.
#[derive(Clone)]
pub struct EditableDocument {
    rope: Rope,
    selection: Selection,
    state: DocumentState,
    history: Vec<Snapshot>,
    history_index: usize,
    history_limit: usize,
}

impl EditableDocument {
    pub fn new() -> Self {
        Self::seeded("")
    }

    /// Create a document whose content is `html`. The caret sits at the end.
    pub fn seeded(html: &str) -> Self {
        let rope = Rope::from_str(html);
        let selection = Selection::caret(rope.len_chars());
        Self {
            rope,
            selection,
            state: DocumentState::Empty,
            history: vec![Snapshot {
                content: html.to_string(),
                selection,
            }],
            history_index: 0,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit.max(1);
        self
    }

    pub fn html(&self) -> String {
        self.rope.to_string()
    }

    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    pub fn state(&self) -> DocumentState {
        self.state
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Selection as a byte range into [`html`](Self::html).
    pub fn selection_bytes(&self) -> Range<usize> {
        self.rope.char_to_byte(self.selection.start())..self.rope.char_to_byte(self.selection.end())
    }

    /// Move the selection. Both ends are clamped to the document and pushed
    /// outward so neither sits inside a tag or entity. A caret inside a tag
    /// moves past it.
    pub fn set_selection(&mut self, anchor: usize, head: usize) {
        let len = self.rope.len_chars();
        let (anchor, head) = (anchor.min(len), head.min(len));
        let html = self.html();

        if anchor == head {
            let caret = self.snap(&html, anchor, true);
            self.selection = Selection::caret(caret);
            return;
        }

        let start = self.snap(&html, anchor.min(head), false);
        let end = self.snap(&html, anchor.max(head), true);
        self.selection = if anchor < head {
            Selection::new(start, end)
        } else {
            Selection::new(end, start)
        };
    }

    pub fn select_all(&mut self) {
        self.selection = Selection::new(0, self.rope.len_chars());
    }

    pub fn collapse_to_end(&mut self) {
        self.selection = Selection::caret(self.selection.end());
    }

    fn snap(&self, html: &str, char_idx: usize, forward: bool) -> usize {
        let byte_idx = self.rope.char_to_byte(char_idx);
        match html::markup_around(html, byte_idx) {
            Some((_, end)) if forward => self.rope.byte_to_char(end),
            Some((start, _)) => self.rope.byte_to_char(start),
            None => char_idx,
        }
    }

    pub fn selected_html(&self) -> String {
        self.rope.slice(self.selection.range()).to_string()
    }

    /// Replace the bytes in `range` with `replacement` and select
    /// `select` (byte offsets relative to `replacement`). Content outside
    /// `range` is left untouched.
    pub fn splice(&mut self, range: Range<usize>, replacement: &str, select: Range<usize>) {
        let start = self.rope.byte_to_char(range.start);
        let end = self.rope.byte_to_char(range.end);
        self.rope.remove(start..end);
        self.rope.insert(start, replacement);

        let sel_start = start + replacement[..select.start].chars().count();
        let sel_end = start + replacement[..select.end].chars().count();
        self.selection = Selection::new(sel_start, sel_end);

        self.state = DocumentState::Editing;
        self.save_state();
    }

    /// Replace the selection with an HTML fragment, leaving the caret after it.
    pub fn replace_selection(&mut self, fragment: &str) {
        let range = self.selection_bytes();
        self.splice(range, fragment, fragment.len()..fragment.len());
    }

    /// Replace the selection with an HTML fragment and keep the fragment
    /// selected.
    pub fn replace_selection_keep_selected(&mut self, fragment: &str) {
        let range = self.selection_bytes();
        self.splice(range, fragment, 0..fragment.len());
    }

    /// Type text at the caret, replacing any selection.
    pub fn insert_text(&mut self, text: &str) {
        self.replace_selection(&html::escape_text(text));
    }

    /// Delete the selection, or the text character (or entity) before the
    /// caret. Tags are stepped over, never broken. Returns whether anything
    /// was removed.
    pub fn delete_backward(&mut self) -> bool {
        if !self.selection.is_collapsed() {
            self.replace_selection("");
            return true;
        }

        let html = self.html();
        let caret = self.rope.char_to_byte(self.selection.head);
        let target = html::segments(&html)
            .into_iter()
            .rev()
            .filter(|s| s.start < caret)
            .find_map(|s| match s.kind {
                SegmentKind::Text => {
                    let end = s.end().min(caret);
                    html[s.start..end]
                        .char_indices()
                        .last()
                        .map(|(i, c)| s.start + i..s.start + i + c.len_utf8())
                }
                SegmentKind::Markup if s.text.starts_with('&') && s.end() <= caret => {
                    Some(s.start..s.end())
                }
                SegmentKind::Markup => None,
            });

        match target {
            Some(range) => {
                self.splice(range, "", 0..0);
                true
            }
            None => false,
        }
    }

    fn save_state(&mut self) {
        let current_state = Snapshot {
            content: self.rope.to_string(),
            selection: self.selection,
        };

        if let Some(last_state) = self.history.get(self.history_index) {
            if last_state.content == current_state.content {
                return;
            }
        }

        self.history.truncate(self.history_index + 1);
        self.history.push(current_state);
        self.history_index += 1;

        if self.history.len() > self.history_limit {
            self.history.remove(0);
            self.history_index -= 1;
        }
    }

    pub fn undo(&mut self) -> bool {
        if self.history_index > 0 {
            self.history_index -= 1;
            self.restore();
            true
        } else {
            false
        }
    }

    pub fn redo(&mut self) -> bool {
        if self.history_index + 1 < self.history.len() {
            self.history_index += 1;
            self.restore();
            true
        } else {
            false
        }
    }

    fn restore(&mut self) {
        let state = &self.history[self.history_index];
        self.rope = Rope::from_str(&state.content);
        self.selection = state.selection;
        self.state = DocumentState::Editing;
    }
}

impl Default for EditableDocument {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_is_empty() {
        let doc = EditableDocument::new();
        assert!(doc.is_empty());
        assert_eq!(doc.state(), DocumentState::Empty);
        assert!(doc.selection().is_collapsed());
    }

    #[test]
    fn test_seed_does_not_start_editing() {
        let doc = EditableDocument::seeded("<p>hello</p>");
        assert_eq!(doc.html(), "<p>hello</p>");
        assert_eq!(doc.state(), DocumentState::Empty);
        assert_eq!(doc.selection(), Selection::caret(12));
    }

    #[test]
    fn test_first_input_starts_editing() {
        let mut doc = EditableDocument::new();
        doc.insert_text("salom");
        assert_eq!(doc.state(), DocumentState::Editing);
        doc.insert_text("!");
        assert_eq!(doc.state(), DocumentState::Editing);
        assert_eq!(doc.html(), "salom!");
    }

    #[test]
    fn test_insert_text_escapes_markup() {
        let mut doc = EditableDocument::new();
        doc.insert_text("a<b>&");
        assert_eq!(doc.html(), "a&lt;b&gt;&amp;");
    }

    #[test]
    fn test_selection_snaps_out_of_tags() {
        let mut doc = EditableDocument::seeded("<p>gul bor</p>");
        // Start inside "<p>", end inside "</p>".
        doc.set_selection(1, 12);
        assert_eq!(doc.selection(), Selection::new(0, 14));

        doc.set_selection(5, 1);
        assert_eq!(doc.selection(), Selection::new(5, 0));
        assert_eq!(doc.selected_html(), "<p>gu");
    }

    #[test]
    fn test_caret_inside_tag_moves_past_it() {
        let mut doc = EditableDocument::seeded("<b>x</b>");
        doc.set_selection(1, 1);
        assert_eq!(doc.selection(), Selection::caret(3));
    }

    #[test]
    fn test_selection_clamped_to_length() {
        let mut doc = EditableDocument::seeded("abc");
        doc.set_selection(1, 99);
        assert_eq!(doc.selection(), Selection::new(1, 3));
    }

    #[test]
    fn test_splice_leaves_outside_untouched() {
        let mut doc = EditableDocument::seeded("Салом, дунё");
        doc.set_selection(0, 5);
        doc.replace_selection_keep_selected("Salom");
        assert_eq!(doc.html(), "Salom, дунё");
        assert_eq!(doc.selected_html(), "Salom");
    }

    #[test]
    fn test_delete_backward_steps_over_tags() {
        let mut doc = EditableDocument::seeded("<b>ab</b>");
        assert!(doc.delete_backward());
        assert_eq!(doc.html(), "<b>a</b>");
        assert!(doc.delete_backward());
        assert_eq!(doc.html(), "<b></b>");
        assert!(!doc.delete_backward());
    }

    #[test]
    fn test_delete_backward_removes_whole_entity() {
        let mut doc = EditableDocument::seeded("a&amp;");
        assert!(doc.delete_backward());
        assert_eq!(doc.html(), "a");
    }

    #[test]
    fn test_delete_backward_with_selection() {
        let mut doc = EditableDocument::seeded("salom dunyo");
        doc.set_selection(5, 11);
        assert!(doc.delete_backward());
        assert_eq!(doc.html(), "salom");
    }

    #[test]
    fn test_undo_redo() {
        let mut doc = EditableDocument::new();
        assert!(!doc.undo());
        doc.insert_text("H");
        doc.insert_text("i");
        assert!(doc.undo());
        assert_eq!(doc.html(), "H");
        assert!(doc.redo());
        assert_eq!(doc.html(), "Hi");
        assert!(!doc.redo());
        assert!(doc.undo());
        assert!(doc.undo());
        assert_eq!(doc.html(), "");
        assert!(!doc.undo());
    }

    #[test]
    fn test_history_limit() {
        let mut doc = EditableDocument::new().with_history_limit(10);
        for _ in 0..20 {
            doc.insert_text("a");
        }
        let mut undos = 0;
        while doc.undo() {
            undos += 1;
        }
        assert_eq!(undos, 9);
        assert_eq!(doc.html(), "a".repeat(11));
    }
}
