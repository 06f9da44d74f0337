use ammonia::Builder;

const URL_SCHEMES: [&str; 4] = ["http", "https", "mailto", "tel"];

/// Clean HTML produced by the editor, keeping the formatting the editor
/// itself can produce.
pub fn sanitize_editor_html(html: &str) -> String {
    create_editor_sanitizer().clean(html).to_string()
}

/// Strictest cleaning: ammonia defaults, nothing editor-specific.
pub fn sanitize_html(html: &str) -> String {
    Builder::new().clean(html).to_string()
}

fn create_editor_sanitizer() -> Builder<'static> {
    let mut builder = Builder::new();
    builder
        .add_tags(&["font"])
        .add_tag_attributes("font", &["size", "color"])
        .add_tag_attributes("div", &["style"])
        .add_tag_attributes("p", &["style"])
        .add_tag_attributes("span", &["style"])
        .url_schemes(URL_SCHEMES.iter().copied().collect());
    builder
}

/// Whether `url` may be used for a link or image: http(s), mailto, tel, or
/// relative.
pub fn is_safe_url(url: &str) -> bool {
    // Browsers ignore whitespace and control characters inside a scheme, so
    // "java\tscript:" must be treated as "javascript:".
    let compact: String = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect();
    if compact.is_empty() {
        return false;
    }

    let scheme_end = compact.find(':');
    let path_start = compact.find(['/', '?', '#']);
    match (scheme_end, path_start) {
        (Some(colon), Some(slash)) if slash < colon => true,
        (Some(colon), _) => {
            let scheme = compact[..colon].to_ascii_lowercase();
            URL_SCHEMES.contains(&scheme.as_str())
        }
        (None, _) => true,
    }
}
