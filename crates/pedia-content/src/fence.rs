//! Fenced code block helpers.

use std::collections::BTreeMap;

/// Parsed fence info string.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct FenceInfo {
    pub language: Option<String>,
    pub filename: Option<String>,
    pub attrs: BTreeMap<String, String>,
}

/// Parse fence info string into language, filename and attributes.
///
/// Format: `language [key=value ...] [{lines}]`. Values may be quoted with
/// `"` or `'` to include spaces. `filename` (or its alias `title`) becomes
/// the display filename; a `{...}` group is stored as `highlight`.
pub(crate) fn parse_fence_info(info: &str) -> FenceInfo {
    let mut tokens = tokenize(info).into_iter();
    let mut result = FenceInfo::default();

    if let Some(first) = tokens.next() {
        match first {
            Token::Word(word) if !word.contains('=') => result.language = Some(word),
            other => result.push(other),
        }
    }
    for token in tokens {
        result.push(token);
    }

    if result.filename.is_none() {
        result.filename = result.attrs.remove("title");
    }
    result
}

impl FenceInfo {
    fn push(&mut self, token: Token) {
        match token {
            Token::Word(word) => {
                if let Some((key, value)) = word.split_once('=') {
                    if key == "filename" {
                        self.filename = Some(value.to_owned());
                    } else {
                        self.attrs.insert(key.to_owned(), value.to_owned());
                    }
                } else {
                    self.attrs.insert(word, String::new());
                }
            }
            Token::Braces(lines) => {
                self.attrs.insert("highlight".to_owned(), lines);
            }
        }
    }
}

enum Token {
    /// `key=value` (quotes removed) or a bare flag.
    Word(String),
    /// Contents of a `{...}` group.
    Braces(String),
}

fn tokenize(info: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = info.trim().chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        if c == '{' {
            chars.next();
            let inner: String = chars.by_ref().take_while(|c| *c != '}').collect();
            tokens.push(Token::Braces(inner.trim().to_owned()));
            continue;
        }

        let mut word = String::new();
        let mut quote: Option<char> = None;
        while let Some(&c) = chars.peek() {
            match quote {
                Some(q) if c == q => quote = None,
                Some(_) => word.push(c),
                None if c == '"' || c == '\'' => quote = Some(c),
                None if c.is_whitespace() => break,
                None => word.push(c),
            }
            chars.next();
        }
        tokens.push(Token::Word(word));
    }

    tokens
}

/// Check that a fenced block's raw source closes its fence.
///
/// `raw` is the parser's source span of the block, starting at the opening
/// fence, and `code` is the body the parser collected. The span of a closed
/// block holds one line past the body; an open block stops at its last
/// body line. Returns the expected closing fence when it is missing.
pub(crate) fn missing_close(raw: &str, code: &str) -> Option<String> {
    let opening = strip_container_prefix(raw.lines().next()?);
    let fence_char = opening.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let fence_len = opening.chars().take_while(|c| *c == fence_char).count();

    if raw.lines().count() == code.lines().count() + 2 {
        return None;
    }
    Some(std::iter::repeat_n(fence_char, fence_len).collect())
}

fn strip_container_prefix(line: &str) -> &str {
    line.trim_start_matches(|c: char| c.is_whitespace() || c == '>')
        .trim_end()
}

/// First line of the raw block, used to describe it in errors.
pub(crate) fn opening_line(raw: &str) -> &str {
    raw.lines().next().map_or("", strip_container_prefix)
}
