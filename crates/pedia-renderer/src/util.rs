//! Shared utility functions for HTML rendering.

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Convert text to URL-safe slug.
///
/// Converts to lowercase, replaces whitespace/dashes/underscores with single dashes,
/// and removes other non-alphanumeric characters.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut result = String::new();
    let mut last_was_dash = true; // Prevents leading dash

    for c in text.trim().chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && (c.is_whitespace() || c == '-' || c == '_') {
            result.push('-');
            last_was_dash = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }

    result
}

/// Relative URL from one page to another.
///
/// Pages are written as `{slug}/index.html`, so every page URL is a
/// directory: the link from `a/b` to `a/c` climbs out of `b/` first.
///
/// # Examples
///
/// ```
/// use pedia_renderer::page_href;
///
/// assert_eq!(page_href("hash-map", "array-list"), "../array-list/");
/// assert_eq!(page_href("", "hash-map"), "hash-map/");
/// assert_eq!(page_href("collections/hash-map", ""), "../../");
/// assert_eq!(page_href("guide", "guide"), "./");
/// ```
#[must_use]
pub fn page_href(from: &str, to: &str) -> String {
    let from_segs: Vec<&str> = from.split('/').filter(|s| !s.is_empty()).collect();
    let to_segs: Vec<&str> = to.split('/').filter(|s| !s.is_empty()).collect();

    let common = from_segs
        .iter()
        .zip(&to_segs)
        .take_while(|(a, b)| a == b)
        .count();

    let mut href = "../".repeat(from_segs.len() - common);
    for segment in &to_segs[common..] {
        href.push_str(segment);
        href.push('/');
    }

    if href.is_empty() {
        "./".to_owned()
    } else {
        href
    }
}

/// Relative URL from a page to a file under the output root.
#[must_use]
pub fn asset_href(from: &str, asset_path: &str) -> String {
    let depth = from.split('/').filter(|s| !s.is_empty()).count();
    format!("{}{asset_path}", "../".repeat(depth))
}

/// Output file for a page slug (`""` -> `index.html`).
#[must_use]
pub fn page_output_path(slug: &str) -> String {
    if slug.is_empty() {
        "index.html".to_owned()
    } else {
        format!("{slug}/index.html")
    }
}
