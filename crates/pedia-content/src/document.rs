//! Parsed document model.
//!
//! A [`Document`] is an ordered tree of [`ContentBlock`] values plus the
//! metadata resolved while parsing. Documents are immutable once built.

use std::collections::BTreeMap;
use std::path::PathBuf;

/// A single content page.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    /// URL path without leading or trailing slashes (`""` for the root page).
    pub slug: String,
    /// Resolved page title.
    pub title: String,
    /// Metadata block from the top of the source.
    pub front_matter: FrontMatter,
    /// Body content in source order.
    pub blocks: Vec<ContentBlock>,
    /// Source file path relative to the content root.
    pub source_path: PathBuf,
}

impl Document {
    /// Plain text of the whole body, one line per block.
    ///
    /// Code blocks are skipped; this text feeds the search index.
    #[must_use]
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            block.collect_text(&mut out);
        }
        out.truncate(out.trim_end().len());
        out
    }

    /// Level-1 heading text of the first H1 block, if any.
    #[must_use]
    pub fn first_h1(&self) -> Option<String> {
        self.blocks.iter().find_map(|block| match block {
            ContentBlock::Heading { level: 1, content } => Some(inline_text(content)),
            _ => None,
        })
    }
}

/// A document's place in the site navigation.
///
/// Positions run `0..n` without gaps; `prev`/`next` links follow them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationEntry {
    pub slug: String,
    pub title: String,
    pub position: usize,
}

/// Metadata declared in a leading `---` block.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrontMatter {
    /// Explicit page title.
    pub title: Option<String>,
    /// Short page summary, used for the `<meta name="description">` tag.
    pub description: Option<String>,
    /// Any other keys, ordered by name.
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Block-level content.
#[derive(Clone, Debug, PartialEq)]
pub enum ContentBlock {
    /// Section heading, level 1..=6.
    Heading { level: u8, content: Vec<Inline> },
    /// Paragraph of inline content.
    Paragraph(Vec<Inline>),
    /// Fenced or indented code.
    CodeBlock(CodeBlock),
    /// Ordered or unordered list.
    List(List),
    /// Blockquote, optionally a GitHub-style callout (`> [!NOTE]`).
    Quote {
        callout: Option<CalloutKind>,
        blocks: Vec<ContentBlock>,
    },
    /// Pipe table.
    Table(Table),
    /// Embedded MDX/HTML component, kept verbatim.
    Component(String),
    /// Thematic break.
    Rule,
}

impl ContentBlock {
    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Heading { content, .. } | Self::Paragraph(content) => {
                out.push_str(&inline_text(content));
                out.push('\n');
            }
            Self::List(list) => {
                for item in &list.items {
                    for block in &item.blocks {
                        block.collect_text(out);
                    }
                }
            }
            Self::Quote { blocks, .. } => {
                for block in blocks {
                    block.collect_text(out);
                }
            }
            Self::Table(table) => {
                for row in std::iter::once(&table.head).chain(&table.rows) {
                    let cells: Vec<String> = row.iter().map(|cell| inline_text(cell)).collect();
                    out.push_str(&cells.join(" "));
                    out.push('\n');
                }
            }
            Self::CodeBlock(_) | Self::Component(_) | Self::Rule => {}
        }
    }
}

/// A code snippet. `code` is the literal fence body.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodeBlock {
    /// Language tag from the info string (`java`).
    pub language: Option<String>,
    /// Display filename (`filename="Main.java"`).
    pub filename: Option<String>,
    /// Remaining info-string attributes.
    pub attrs: BTreeMap<String, String>,
    /// Literal code text.
    pub code: String,
}

/// Ordered (`start` is `Some`) or bullet list.
#[derive(Clone, Debug, PartialEq)]
pub struct List {
    pub start: Option<u64>,
    /// Tight lists render items without paragraph wrappers.
    pub tight: bool,
    pub items: Vec<ListItem>,
}

/// One list entry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListItem {
    /// Task list checkbox state (`- [x]`).
    pub task: Option<bool>,
    pub blocks: Vec<ContentBlock>,
}

/// Column alignment of a table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColumnAlign {
    #[default]
    None,
    Left,
    Center,
    Right,
}

/// Pipe table: header cells, then body rows of cells.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    pub alignments: Vec<ColumnAlign>,
    pub head: Vec<Vec<Inline>>,
    pub rows: Vec<Vec<Vec<Inline>>>,
}

/// GitHub alert kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalloutKind {
    Note,
    Tip,
    Important,
    Warning,
    Caution,
}

impl CalloutKind {
    /// Lowercase name used for CSS classes.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Tip => "tip",
            Self::Important => "important",
            Self::Warning => "warning",
            Self::Caution => "caution",
        }
    }

    /// Capitalized label shown as the callout title.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Note => "Note",
            Self::Tip => "Tip",
            Self::Important => "Important",
            Self::Warning => "Warning",
            Self::Caution => "Caution",
        }
    }
}

/// Inline content.
#[derive(Clone, Debug, PartialEq)]
pub enum Inline {
    Text(String),
    Code(String),
    Emphasis(Vec<Inline>),
    Strong(Vec<Inline>),
    Strikethrough(Vec<Inline>),
    Link {
        url: String,
        title: String,
        content: Vec<Inline>,
    },
    Image {
        src: String,
        title: String,
        alt: String,
    },
    /// Raw inline HTML.
    Html(String),
    SoftBreak,
    HardBreak,
}

/// Concatenate the visible text of inline content.
#[must_use]
pub fn inline_text(inlines: &[Inline]) -> String {
    let mut out = String::new();
    push_inline_text(inlines, &mut out);
    out
}

fn push_inline_text(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Text(text) | Inline::Code(text) => out.push_str(text),
            Inline::Emphasis(children)
            | Inline::Strong(children)
            | Inline::Strikethrough(children)
            | Inline::Link {
                content: children, ..
            } => push_inline_text(children, out),
            Inline::Image { alt, .. } => out.push_str(alt),
            Inline::SoftBreak | Inline::HardBreak => out.push(' '),
            Inline::Html(_) => {}
        }
    }
}

/// Title-case the last slug segment (`collections/hash-map` -> `Hash Map`).
///
/// The root slug yields `Home`.
#[must_use]
pub fn title_from_slug(slug: &str) -> String {
    let segment = slug.rsplit('/').next().unwrap_or_default();
    let mut result = String::with_capacity(segment.len());
    for word in segment.split(['-', '_', ' ']).filter(|w| !w.is_empty()) {
        if !result.is_empty() {
            result.push(' ');
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            result.extend(first.to_uppercase());
            result.push_str(chars.as_str());
        }
    }
    if result.is_empty() {
        "Home".to_owned()
    } else {
        result
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_title_from_slug() {
        assert_eq!(title_from_slug("hash-map"), "Hash Map");
        assert_eq!(title_from_slug("collections/array_list"), "Array List");
        assert_eq!(title_from_slug("abstract"), "Abstract");
        assert_eq!(title_from_slug(""), "Home");
    }

    #[test]
    fn test_inline_text_flattens_formatting() {
        let inlines = vec![
            Inline::Text("Use ".to_owned()),
            Inline::Code("HashMap".to_owned()),
            Inline::SoftBreak,
            Inline::Strong(vec![Inline::Emphasis(vec![Inline::Text(
                "carefully".to_owned(),
            )])]),
            Inline::Html("<br>".to_owned()),
        ];
        assert_eq!(inline_text(&inlines), "Use HashMap carefully");
    }

    #[test]
    fn test_plain_text_skips_code() {
        let doc = Document {
            slug: "hash-map".to_owned(),
            title: "HashMap".to_owned(),
            front_matter: FrontMatter::default(),
            blocks: vec![
                ContentBlock::Heading {
                    level: 1,
                    content: vec![Inline::Text("HashMap".to_owned())],
                },
                ContentBlock::CodeBlock(CodeBlock {
                    code: "map.put(1, 2);".to_owned(),
                    ..CodeBlock::default()
                }),
                ContentBlock::Paragraph(vec![Inline::Text("Buckets.".to_owned())]),
            ],
            source_path: PathBuf::from("hash-map.md"),
        };
        assert_eq!(doc.plain_text(), "HashMap\nBuckets.");
        assert_eq!(doc.first_h1().as_deref(), Some("HashMap"));
    }
}
