use imlo::html;
use imlo::sanitize::is_safe_url;
use std::ops::Range;

use crate::document::EditableDocument;

/// Inline formatting that "clear formatting" removes. Links survive.
const INLINE_TAGS: [&str; 11] = [
    "b", "strong", "i", "em", "u", "s", "strike", "font", "span", "sub", "sup",
];

const INDENT_OPEN: &str = r#"<div style="margin-left: 40px">"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    pub fn tag(self) -> &'static str {
        match self {
            HeadingLevel::H1 => "h1",
            HeadingLevel::H2 => "h2",
            HeadingLevel::H3 => "h3",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "h1" => Some(HeadingLevel::H1),
            "h2" => Some(HeadingLevel::H2),
            "h3" => Some(HeadingLevel::H3),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatCommand {
    Bold,
    Italic,
    Underline,
    JustifyLeft,
    JustifyCenter,
    JustifyRight,
    JustifyFull,
    OrderedList,
    UnorderedList,
    Indent,
    Outdent,
    Heading(HeadingLevel),
    CreateLink,
    InsertImage,
    CodeBlock,
    Blockquote,
    ClearFormatting,
    FontSize,
    FontColor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Applied,
    /// The command did not apply here (no selection, bad value, nothing to
    /// undo). Never an error.
    NoOp,
}

impl CommandOutcome {
    pub fn is_applied(self) -> bool {
        self == CommandOutcome::Applied
    }
}

impl FormatCommand {
    /// Parse a host editing primitive name (`bold`, `justifyCenter`,
    /// `formatBlock` + `h2`, ...). Names are case-insensitive.
    pub fn from_name(name: &str, value: Option<&str>) -> Option<Self> {
        let command = match name.trim().to_ascii_lowercase().as_str() {
            "bold" => FormatCommand::Bold,
            "italic" => FormatCommand::Italic,
            "underline" => FormatCommand::Underline,
            "justifyleft" => FormatCommand::JustifyLeft,
            "justifycenter" => FormatCommand::JustifyCenter,
            "justifyright" => FormatCommand::JustifyRight,
            "justifyfull" => FormatCommand::JustifyFull,
            "insertorderedlist" => FormatCommand::OrderedList,
            "insertunorderedlist" => FormatCommand::UnorderedList,
            "indent" => FormatCommand::Indent,
            "outdent" => FormatCommand::Outdent,
            "createlink" => FormatCommand::CreateLink,
            "insertimage" => FormatCommand::InsertImage,
            "codeblock" => FormatCommand::CodeBlock,
            "blockquote" => FormatCommand::Blockquote,
            "removeformat" => FormatCommand::ClearFormatting,
            "fontsize" => FormatCommand::FontSize,
            "forecolor" => FormatCommand::FontColor,
            "formatblock" | "heading" => {
                let block = value?
                    .trim()
                    .trim_start_matches('<')
                    .trim_end_matches('>')
                    .to_ascii_lowercase();
                match block.as_str() {
                    "pre" => FormatCommand::CodeBlock,
                    "blockquote" => FormatCommand::Blockquote,
                    other => FormatCommand::Heading(HeadingLevel::from_tag(other)?),
                }
            }
            _ => return None,
        };
        Some(command)
    }

    pub fn name(&self) -> &'static str {
        match self {
            FormatCommand::Bold => "bold",
            FormatCommand::Italic => "italic",
            FormatCommand::Underline => "underline",
            FormatCommand::JustifyLeft => "justifyLeft",
            FormatCommand::JustifyCenter => "justifyCenter",
            FormatCommand::JustifyRight => "justifyRight",
            FormatCommand::JustifyFull => "justifyFull",
            FormatCommand::OrderedList => "insertOrderedList",
            FormatCommand::UnorderedList => "insertUnorderedList",
            FormatCommand::Indent => "indent",
            FormatCommand::Outdent => "outdent",
            FormatCommand::Heading(_) => "formatBlock",
            FormatCommand::CreateLink => "createLink",
            FormatCommand::InsertImage => "insertImage",
            FormatCommand::CodeBlock => "codeBlock",
            FormatCommand::Blockquote => "blockquote",
            FormatCommand::ClearFormatting => "removeFormat",
            FormatCommand::FontSize => "fontSize",
            FormatCommand::FontColor => "foreColor",
        }
    }

    pub fn takes_value(&self) -> bool {
        matches!(
            self,
            FormatCommand::CreateLink
                | FormatCommand::InsertImage
                | FormatCommand::FontSize
                | FormatCommand::FontColor
        )
    }
}

/// Apply `command` to the document's current selection.
pub fn apply(
    doc: &mut EditableDocument,
    command: FormatCommand,
    value: Option<&str>,
) -> CommandOutcome {
    let html = doc.html();
    let sel = doc.selection_bytes();

    let outcome = if command == FormatCommand::InsertImage {
        insert_image(doc, value)
    } else if sel.is_empty() {
        CommandOutcome::NoOp
    } else {
        let edit = Edit {
            html: &html,
            sel: sel.clone(),
        };
        match command {
            FormatCommand::Bold => edit.toggle_inline(doc, &["b", "strong"]),
            FormatCommand::Italic => edit.toggle_inline(doc, &["i", "em"]),
            FormatCommand::Underline => edit.toggle_inline(doc, &["u"]),
            FormatCommand::JustifyLeft => edit.align(doc, "left"),
            FormatCommand::JustifyCenter => edit.align(doc, "center"),
            FormatCommand::JustifyRight => edit.align(doc, "right"),
            FormatCommand::JustifyFull => edit.align(doc, "justify"),
            FormatCommand::OrderedList => edit.toggle_list(doc, "ol"),
            FormatCommand::UnorderedList => edit.toggle_list(doc, "ul"),
            FormatCommand::Indent => edit.wrap(doc, INDENT_OPEN, "</div>"),
            FormatCommand::Outdent => edit.outdent(doc),
            FormatCommand::Heading(level) => {
                let tag = level.tag();
                edit.block(doc, &format!("<{}>", tag), &format!("</{}>", tag))
            }
            FormatCommand::CodeBlock => edit.block(doc, "<pre>", "</pre>"),
            FormatCommand::Blockquote => edit.block(doc, "<blockquote>", "</blockquote>"),
            FormatCommand::CreateLink => match value.map(str::trim) {
                Some(url) if is_safe_url(url) => {
                    edit.wrap(doc, &format!(r#"<a href="{}">"#, escape_attr(url)), "</a>")
                }
                _ => CommandOutcome::NoOp,
            },
            FormatCommand::ClearFormatting => edit.clear_formatting(doc),
            FormatCommand::FontSize => match value.and_then(|v| v.trim().parse::<u8>().ok()) {
                Some(size @ 1..=7) => {
                    edit.font(doc, "size", &size.to_string())
                }
                _ => CommandOutcome::NoOp,
            },
            FormatCommand::FontColor => match value.map(str::trim) {
                Some(color) if is_valid_color(color) => edit.font(doc, "color", color),
                _ => CommandOutcome::NoOp,
            },
            FormatCommand::InsertImage => CommandOutcome::NoOp,
        }
    };

    match outcome {
        CommandOutcome::Applied => log::debug!("Applied {}", command.name()),
        CommandOutcome::NoOp => {
            log::debug!("Ignored {} (value: {:?})", command.name(), value)
        }
    }
    outcome
}

fn insert_image(doc: &mut EditableDocument, value: Option<&str>) -> CommandOutcome {
    match value.map(str::trim) {
        Some(src) if is_safe_url(src) => {
            doc.replace_selection(&format!(r#"<img src="{}">"#, escape_attr(src)));
            CommandOutcome::Applied
        }
        _ => CommandOutcome::NoOp,
    }
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn is_valid_color(color: &str) -> bool {
    match color.strip_prefix('#') {
        Some(hex) => matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => !color.is_empty() && color.len() <= 20 && color.chars().all(|c| c.is_ascii_alphabetic()),
    }
}

fn strip_inline(fragment: &str) -> String {
    html::segments(fragment)
        .into_iter()
        .filter(|s| {
            !s.is_markup()
                || !matches!(html::tag_name(s.text), Some((name, _)) if INLINE_TAGS.contains(&name.as_str()))
        })
        .map(|s| s.text)
        .collect()
}

/// An element whose opening tag precedes some position and whose closing
/// tag does not.
struct OpenElement {
    name: String,
    /// Byte range of the opening tag.
    tag: Range<usize>,
}

/// Elements still open at byte offset `pos`, outermost first.
fn open_elements_at(html: &str, pos: usize) -> Vec<OpenElement> {
    let mut stack: Vec<OpenElement> = Vec::new();
    for segment in html::segments(html)
        .into_iter()
        .take_while(|s| s.end() <= pos)
        .filter(|s| s.is_markup())
    {
        if let Some(name) = html::opens_element(segment.text) {
            stack.push(OpenElement {
                name,
                tag: segment.start..segment.end(),
            });
        } else if let Some((name, true)) = html::tag_name(segment.text) {
            if let Some(idx) = stack.iter().rposition(|e| e.name == name) {
                stack.truncate(idx);
            }
        }
    }
    stack
}

/// Byte range of the tag closing `element`.
fn matching_close(html: &str, element: &OpenElement) -> Option<Range<usize>> {
    let mut depth = 0usize;
    for segment in html::segments(html)
        .into_iter()
        .filter(|s| s.is_markup() && s.start >= element.tag.end)
    {
        if html::opens_element(segment.text).as_deref() == Some(element.name.as_str()) {
            depth += 1;
        } else if let Some((name, true)) = html::tag_name(segment.text) {
            if name == element.name {
                if depth == 0 {
                    return Some(segment.start..segment.end());
                }
                depth -= 1;
            }
        }
    }
    None
}

/// Snapshot of the document taken before a command runs.
struct Edit<'a> {
    html: &'a str,
    sel: Range<usize>,
}

impl Edit<'_> {
    fn fragment(&self) -> &str {
        &self.html[self.sel.clone()]
    }

    fn before(&self) -> &str {
        &self.html[..self.sel.start]
    }

    fn after(&self) -> &str {
        &self.html[self.sel.end..]
    }

    /// Splices that would cut an element in half are refused.
    fn balanced(&self) -> bool {
        html::is_balanced(self.fragment())
    }

    fn wrapped_by(&self, open: &str, close: &str) -> bool {
        self.before().ends_with(open) && self.after().starts_with(close)
    }

    /// Replace `open` + selection + `close` with just the selection.
    fn unwrap_outer(&self, doc: &mut EditableDocument, open_len: usize, close_len: usize) -> CommandOutcome {
        let frag = self.fragment();
        doc.splice(
            self.sel.start - open_len..self.sel.end + close_len,
            frag,
            0..frag.len(),
        );
        CommandOutcome::Applied
    }

    /// Replace the selection with its content minus `open` and `close`.
    fn unwrap_inner(&self, doc: &mut EditableDocument, open: &str, close: &str) -> Option<CommandOutcome> {
        let frag = self.fragment();
        let inner = frag.strip_prefix(open)?.strip_suffix(close)?;
        if inner.contains(open) {
            return None;
        }
        doc.splice(self.sel.clone(), inner, 0..inner.len());
        Some(CommandOutcome::Applied)
    }

    fn wrap(&self, doc: &mut EditableDocument, open: &str, close: &str) -> CommandOutcome {
        if !self.balanced() {
            return CommandOutcome::NoOp;
        }
        let frag = self.fragment();
        let replacement = format!("{}{}{}", open, frag, close);
        doc.splice(self.sel.clone(), &replacement, open.len()..open.len() + frag.len());
        CommandOutcome::Applied
    }

    fn toggle_inline(&self, doc: &mut EditableDocument, tags: &[&str]) -> CommandOutcome {
        if !self.balanced() {
            return CommandOutcome::NoOp;
        }
        for tag in tags {
            let open = format!("<{}>", tag);
            let close = format!("</{}>", tag);
            if let Some(outcome) = self.unwrap_inner(doc, &open, &close) {
                return outcome;
            }
        }
        if let Some(outcome) = self.split_enclosing(doc, tags) {
            return outcome;
        }
        let tag = tags[0];
        self.wrap(doc, &format!("<{}>", tag), &format!("</{}>", tag))
    }

    /// Remove the nearest enclosing element named in `tags` from the
    /// selection only. Content of that element before and after the selection
    /// keeps it, and elements nested between it and the selection are closed
    /// and reopened around each piece.
    fn split_enclosing(&self, doc: &mut EditableDocument, tags: &[&str]) -> Option<CommandOutcome> {
        let stack = open_elements_at(self.html, self.sel.start);
        let idx = stack
            .iter()
            .rposition(|e| tags.contains(&e.name.as_str()))?;
        let outer = &stack[idx];
        let close = matching_close(self.html, outer)?;
        if close.start < self.sel.end {
            return None;
        }

        let open_tag = &self.html[outer.tag.clone()];
        let close_tag = &self.html[close.clone()];
        let inner = &stack[idx + 1..];
        let reopen: String = inner.iter().map(|e| &self.html[e.tag.clone()]).collect();
        let reclose: String = inner.iter().rev().map(|e| format!("</{}>", e.name)).collect();
        let left = &self.html[outer.tag.end..self.sel.start];
        let right = &self.html[self.sel.end..close.start];

        let mut replacement = String::new();
        if left != reopen {
            replacement.push_str(open_tag);
            replacement.push_str(left);
            replacement.push_str(&reclose);
            replacement.push_str(close_tag);
        }
        replacement.push_str(&reopen);
        let selected_start = replacement.len();
        replacement.push_str(self.fragment());
        let selected_end = replacement.len();
        replacement.push_str(&reclose);
        if right != reclose {
            replacement.push_str(open_tag);
            replacement.push_str(&reopen);
            replacement.push_str(right);
            replacement.push_str(close_tag);
        }

        doc.splice(
            outer.tag.start..close.end,
            &replacement,
            selected_start..selected_end,
        );
        Some(CommandOutcome::Applied)
    }

    /// Wrap in a block element unless already wrapped by it.
    fn block(&self, doc: &mut EditableDocument, open: &str, close: &str) -> CommandOutcome {
        if self.wrapped_by(open, close) {
            return CommandOutcome::NoOp;
        }
        self.wrap(doc, open, close)
    }

    fn align(&self, doc: &mut EditableDocument, alignment: &str) -> CommandOutcome {
        let open = format!(r#"<div style="text-align: {}">"#, alignment);
        if self.wrapped_by(&open, "</div>") {
            return CommandOutcome::NoOp;
        }

        let existing = ["left", "center", "right", "justify"]
            .iter()
            .map(|a| format!(r#"<div style="text-align: {}">"#, a))
            .find(|o| self.wrapped_by(o, "</div>"));

        match existing {
            Some(_) if !self.balanced() => CommandOutcome::NoOp,
            Some(old_open) => {
                let frag = self.fragment();
                let replacement = format!("{}{}</div>", open, frag);
                doc.splice(
                    self.sel.start - old_open.len()..self.sel.end + "</div>".len(),
                    &replacement,
                    open.len()..open.len() + frag.len(),
                );
                CommandOutcome::Applied
            }
            None => self.wrap(doc, &open, "</div>"),
        }
    }

    fn toggle_list(&self, doc: &mut EditableDocument, list_tag: &str) -> CommandOutcome {
        let open = format!("<{}><li>", list_tag);
        let close = format!("</li></{}>", list_tag);

        let unwrapped = if self.wrapped_by(&open, &close) {
            Some((self.sel.start - open.len()..self.sel.end + close.len(), self.fragment()))
        } else {
            self.fragment()
                .strip_prefix(open.as_str())
                .and_then(|f| f.strip_suffix(close.as_str()))
                .map(|inner| (self.sel.clone(), inner))
        };

        if let Some((range, items)) = unwrapped {
            let lines = items.replace("</li><li>", "<br>");
            doc.splice(range, &lines, 0..lines.len());
            return CommandOutcome::Applied;
        }

        if !self.balanced() {
            return CommandOutcome::NoOp;
        }
        let normalized = self
            .fragment()
            .replace("<br />", "<br>")
            .replace("<br/>", "<br>");
        let items: Vec<&str> = normalized
            .split("<br>")
            .filter(|item| !item.trim().is_empty())
            .collect();
        if items.is_empty() {
            return CommandOutcome::NoOp;
        }

        let replacement = format!("{}{}{}", open, items.join("</li><li>"), close);
        let inner_end = replacement.len() - close.len();
        doc.splice(self.sel.clone(), &replacement, open.len()..inner_end);
        CommandOutcome::Applied
    }

    fn outdent(&self, doc: &mut EditableDocument) -> CommandOutcome {
        if self.wrapped_by(INDENT_OPEN, "</div>") {
            return self.unwrap_outer(doc, INDENT_OPEN.len(), "</div>".len());
        }
        self.unwrap_inner(doc, INDENT_OPEN, "</div>")
            .unwrap_or(CommandOutcome::NoOp)
    }

    fn font(&self, doc: &mut EditableDocument, attr: &str, value: &str) -> CommandOutcome {
        let open = format!(r#"<font {}="{}">"#, attr, escape_attr(value));
        if self.wrapped_by(&open, "</font>") {
            return CommandOutcome::NoOp;
        }

        // Re-sizing or re-coloring replaces the directly enclosing font tag.
        let prefix = format!(r#"<font {}=""#, attr);
        let enclosing = html::segments(self.before())
            .last()
            .filter(|s| s.is_markup() && s.text.starts_with(&prefix) && s.end() == self.sel.start)
            .map(|s| s.text.len());

        match enclosing {
            Some(_) if !self.balanced() => CommandOutcome::NoOp,
            Some(old_len) if self.after().starts_with("</font>") => {
                let frag = self.fragment();
                let replacement = format!("{}{}</font>", open, frag);
                doc.splice(
                    self.sel.start - old_len..self.sel.end + "</font>".len(),
                    &replacement,
                    open.len()..open.len() + frag.len(),
                );
                CommandOutcome::Applied
            }
            _ => self.wrap(doc, &open, "</font>"),
        }
    }

    fn clear_formatting(&self, doc: &mut EditableDocument) -> CommandOutcome {
        if !self.balanced() {
            return CommandOutcome::NoOp;
        }
        let mut start = self.sel.start;
        let mut end = self.sel.end;

        // Peel inline wrappers that enclose the selection exactly.
        loop {
            let open = html::segments(&self.html[..start])
                .last()
                .filter(|s| s.is_markup())
                .and_then(|s| html::tag_name(s.text).map(|t| (t, s.text.len())));
            let close = html::segments(&self.html[end..])
                .first()
                .filter(|s| s.is_markup())
                .and_then(|s| html::tag_name(s.text).map(|t| (t, s.text.len())));

            match (open, close) {
                (Some(((open_name, false), open_len)), Some(((close_name, true), close_len)))
                    if open_name == close_name && INLINE_TAGS.contains(&open_name.as_str()) =>
                {
                    start -= open_len;
                    end += close_len;
                }
                _ => break,
            }
        }

        let cleaned = strip_inline(self.fragment());
        if cleaned == self.html[start..end] {
            return CommandOutcome::NoOp;
        }
        doc.splice(start..end, &cleaned, 0..cleaned.len());
        CommandOutcome::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with(html: &str, anchor: usize, head: usize) -> EditableDocument {
        let mut doc = EditableDocument::seeded(html);
        doc.set_selection(anchor, head);
        doc
    }

    #[test]
    fn test_from_name() {
        assert_eq!(FormatCommand::from_name("bold", None), Some(FormatCommand::Bold));
        assert_eq!(
            FormatCommand::from_name("justifyCenter", None),
            Some(FormatCommand::JustifyCenter)
        );
        assert_eq!(
            FormatCommand::from_name("formatBlock", Some("<h2>")),
            Some(FormatCommand::Heading(HeadingLevel::H2))
        );
        assert_eq!(
            FormatCommand::from_name("formatBlock", Some("pre")),
            Some(FormatCommand::CodeBlock)
        );
        assert_eq!(FormatCommand::from_name("formatBlock", Some("h4")), None);
        assert_eq!(FormatCommand::from_name("formatBlock", None), None);
        assert_eq!(FormatCommand::from_name("strikeThrough", None), None);
        assert_eq!(FormatCommand::from_name("foreColor", None), Some(FormatCommand::FontColor));
    }

    #[test]
    fn test_bold_wraps_and_toggles_back() {
        let mut doc = doc_with("gul bor", 0, 3);
        assert_eq!(apply(&mut doc, FormatCommand::Bold, None), CommandOutcome::Applied);
        assert_eq!(doc.html(), "<b>gul</b> bor");
        assert_eq!(doc.selected_html(), "gul");

        assert_eq!(apply(&mut doc, FormatCommand::Bold, None), CommandOutcome::Applied);
        assert_eq!(doc.html(), "gul bor");
        assert_eq!(doc.selected_html(), "gul");
    }

    #[test]
    fn test_bold_inside_bold_splits_the_element() {
        let mut doc = doc_with("<b>gul</b>", 4, 6);
        assert_eq!(doc.selected_html(), "ul");
        assert_eq!(apply(&mut doc, FormatCommand::Bold, None), CommandOutcome::Applied);
        assert_eq!(doc.html(), "<b>g</b>ul");
        assert_eq!(doc.selected_html(), "ul");

        let mut doc = doc_with("<b>gul bor</b>", 5, 8);
        apply(&mut doc, FormatCommand::Bold, None);
        assert_eq!(doc.html(), "<b>gu</b>l b<b>or</b>");
        assert_eq!(doc.selected_html(), "l b");
    }

    #[test]
    fn test_bold_through_nested_element_is_removed() {
        let mut doc = doc_with("<b><i>gul</i></b>", 6, 9);
        assert_eq!(doc.selected_html(), "gul");
        apply(&mut doc, FormatCommand::Bold, None);
        assert_eq!(doc.html(), "<i>gul</i>");
        assert_eq!(doc.selected_html(), "gul");

        let mut doc = doc_with("<b><i>gul bor</i></b>", 6, 9);
        apply(&mut doc, FormatCommand::Bold, None);
        assert_eq!(doc.html(), "<i>gul</i><b><i> bor</i></b>");
    }

    #[test]
    fn test_italic_inside_bold_still_wraps() {
        let mut doc = doc_with("<b>gul</b>", 3, 6);
        apply(&mut doc, FormatCommand::Italic, None);
        assert_eq!(doc.html(), "<b><i>gul</i></b>");
    }

    #[test]
    fn test_selection_across_elements_is_not_wrapped() {
        let html = "<p>gul</p><p>bor</p>";
        let mut doc = doc_with(html, 5, 14);
        assert_eq!(doc.selected_html(), "l</p><p>b");
        for command in [
            FormatCommand::Bold,
            FormatCommand::JustifyCenter,
            FormatCommand::Heading(HeadingLevel::H1),
            FormatCommand::Indent,
            FormatCommand::OrderedList,
            FormatCommand::ClearFormatting,
        ] {
            assert_eq!(apply(&mut doc, command, None), CommandOutcome::NoOp);
        }
        assert_eq!(
            apply(&mut doc, FormatCommand::CreateLink, Some("/x")),
            CommandOutcome::NoOp
        );
        assert_eq!(apply(&mut doc, FormatCommand::FontSize, Some("4")), CommandOutcome::NoOp);
        assert_eq!(doc.html(), html);
    }

    #[test]
    fn test_bold_unwraps_selected_strong() {
        let mut doc = doc_with("<strong>gul</strong>", 0, 20);
        apply(&mut doc, FormatCommand::Bold, None);
        assert_eq!(doc.html(), "gul");
    }

    #[test]
    fn test_wrapping_commands_noop_on_collapsed_selection() {
        let mut doc = doc_with("gul", 1, 1);
        for command in [
            FormatCommand::Bold,
            FormatCommand::JustifyCenter,
            FormatCommand::OrderedList,
            FormatCommand::Heading(HeadingLevel::H1),
            FormatCommand::ClearFormatting,
        ] {
            assert_eq!(apply(&mut doc, command, None), CommandOutcome::NoOp);
        }
        assert_eq!(doc.html(), "gul");
    }

    #[test]
    fn test_alignment_replaces_existing() {
        let mut doc = doc_with("matn", 0, 4);
        apply(&mut doc, FormatCommand::JustifyCenter, None);
        assert_eq!(doc.html(), r#"<div style="text-align: center">matn</div>"#);
        assert_eq!(apply(&mut doc, FormatCommand::JustifyCenter, None), CommandOutcome::NoOp);
        apply(&mut doc, FormatCommand::JustifyRight, None);
        assert_eq!(doc.html(), r#"<div style="text-align: right">matn</div>"#);
    }

    #[test]
    fn test_list_from_lines_and_back() {
        let mut doc = doc_with("bir<br>ikki", 0, 11);
        apply(&mut doc, FormatCommand::UnorderedList, None);
        assert_eq!(doc.html(), "<ul><li>bir</li><li>ikki</li></ul>");
        assert_eq!(doc.selected_html(), "bir</li><li>ikki");

        apply(&mut doc, FormatCommand::UnorderedList, None);
        assert_eq!(doc.html(), "bir<br>ikki");
    }

    #[test]
    fn test_indent_outdent() {
        let mut doc = doc_with("matn", 0, 4);
        assert_eq!(apply(&mut doc, FormatCommand::Outdent, None), CommandOutcome::NoOp);
        apply(&mut doc, FormatCommand::Indent, None);
        assert_eq!(doc.html(), format!("{}matn</div>", INDENT_OPEN));
        apply(&mut doc, FormatCommand::Outdent, None);
        assert_eq!(doc.html(), "matn");
    }

    #[test]
    fn test_heading_and_blocks_are_idempotent() {
        let mut doc = doc_with("Sarlavha", 0, 8);
        apply(&mut doc, FormatCommand::Heading(HeadingLevel::H2), None);
        assert_eq!(doc.html(), "<h2>Sarlavha</h2>");
        assert_eq!(
            apply(&mut doc, FormatCommand::Heading(HeadingLevel::H2), None),
            CommandOutcome::NoOp
        );

        let mut doc = doc_with("kod", 0, 3);
        apply(&mut doc, FormatCommand::CodeBlock, None);
        assert_eq!(doc.html(), "<pre>kod</pre>");
    }

    #[test]
    fn test_create_link_requires_safe_url() {
        let mut doc = doc_with("sayt", 0, 4);
        assert_eq!(apply(&mut doc, FormatCommand::CreateLink, None), CommandOutcome::NoOp);
        assert_eq!(
            apply(&mut doc, FormatCommand::CreateLink, Some("javascript:alert(1)")),
            CommandOutcome::NoOp
        );
        apply(&mut doc, FormatCommand::CreateLink, Some("https://gov.uz/?a=1&b=\"2\""));
        assert_eq!(
            doc.html(),
            r#"<a href="https://gov.uz/?a=1&amp;b=&quot;2&quot;">sayt</a>"#
        );
    }

    #[test]
    fn test_insert_image_at_caret() {
        let mut doc = doc_with("ab", 1, 1);
        apply(&mut doc, FormatCommand::InsertImage, Some("/rasm.png"));
        assert_eq!(doc.html(), r#"a<img src="/rasm.png">b"#);
        assert!(doc.selection().is_collapsed());
    }

    #[test]
    fn test_font_size_and_color_validation() {
        let mut doc = doc_with("matn", 0, 4);
        assert_eq!(apply(&mut doc, FormatCommand::FontSize, Some("9")), CommandOutcome::NoOp);
        assert_eq!(apply(&mut doc, FormatCommand::FontColor, Some("red;x")), CommandOutcome::NoOp);

        apply(&mut doc, FormatCommand::FontSize, Some("5"));
        assert_eq!(doc.html(), r#"<font size="5">matn</font>"#);
        apply(&mut doc, FormatCommand::FontSize, Some("3"));
        assert_eq!(doc.html(), r#"<font size="3">matn</font>"#);

        apply(&mut doc, FormatCommand::FontColor, Some("#ff0000"));
        assert_eq!(
            doc.html(),
            r##"<font size="3"><font color="#ff0000">matn</font></font>"##
        );
    }

    #[test]
    fn test_clear_formatting_peels_wrappers() {
        let mut doc = doc_with("x <b><i>gul</i></b> y", 0, 0);
        // Select just "gul".
        doc.set_selection(8, 11);
        assert_eq!(doc.selected_html(), "gul");
        apply(&mut doc, FormatCommand::ClearFormatting, None);
        assert_eq!(doc.html(), "x gul y");
    }

    #[test]
    fn test_clear_formatting_inside_fragment_keeps_links() {
        let mut doc = doc_with(r#"<b>a</b> <a href="/x">b</a>"#, 0, 27);
        apply(&mut doc, FormatCommand::ClearFormatting, None);
        assert_eq!(doc.html(), r#"a <a href="/x">b</a>"#);
    }
}
