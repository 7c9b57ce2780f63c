//! Markdown/MDX to [`Document`] conversion.
//!
//! Builds the block tree from `pulldown-cmark` events. The offset iterator
//! gives each fenced code block's source span, which is checked for a
//! closing fence: `pulldown-cmark` silently closes fences at end of input,
//! but an unclosed snippet in a reference page is an authoring error.

use std::borrow::Cow;
use std::iter::Peekable;
use std::ops::Range;
use std::path::Path;

use pulldown_cmark::{
    Alignment, BlockQuoteKind, CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd,
};

use crate::document::{
    CalloutKind, CodeBlock, ColumnAlign, ContentBlock, Document, Inline, List, ListItem, Table,
    inline_text, title_from_slug,
};
use crate::error::{MalformedContentError, MalformedReason};
use crate::fence::{missing_close, opening_line, parse_fence_info};
use crate::{front_matter, mdx};

/// Parser options for content documents.
#[must_use]
pub fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_GFM
}

/// Parse one content source into a [`Document`].
///
/// `source_path` is relative to the content root; an `.mdx` extension
/// enables ESM stripping. The title resolves to the front matter `title`,
/// then the first level-1 heading, then the title-cased slug.
///
/// # Errors
///
/// Returns [`MalformedContentError`] for unclosed front matter, front matter
/// that is not a mapping, or an unterminated code fence.
pub fn parse_document(
    slug: &str,
    source_path: &Path,
    text: &str,
) -> Result<Document, MalformedContentError> {
    let split = front_matter::split(text).map_err(|reason| MalformedContentError {
        slug: slug.to_owned(),
        line: 1,
        block: "front matter".to_owned(),
        reason,
    })?;

    let body = if is_mdx(source_path) {
        Cow::Owned(mdx::strip_esm(split.body))
    } else {
        Cow::Borrowed(split.body)
    };

    let events = Parser::new_ext(&body, parser_options()).into_offset_iter();
    let mut builder = TreeBuilder {
        events: events.peekable(),
        source: &body,
        slug,
        line_offset: split.line_offset,
        pending_task: None,
    };
    let blocks = builder.blocks()?;

    let mut document = Document {
        slug: slug.to_owned(),
        title: String::new(),
        front_matter: split.front_matter,
        blocks,
        source_path: source_path.to_path_buf(),
    };
    document.title = document
        .front_matter
        .title
        .clone()
        .or_else(|| document.first_h1())
        .map(|title| title.trim().to_owned())
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| title_from_slug(slug));

    Ok(document)
}

fn is_mdx(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "mdx")
}

/// Recursive-descent builder over the event stream.
struct TreeBuilder<'a, 's, I: Iterator<Item = (Event<'a>, Range<usize>)>> {
    events: Peekable<I>,
    source: &'s str,
    slug: &'s str,
    line_offset: usize,
    /// Task marker seen inside a paragraph, claimed by the enclosing item.
    pending_task: Option<bool>,
}

impl<'a, I: Iterator<Item = (Event<'a>, Range<usize>)>> TreeBuilder<'a, '_, I> {
    /// Blocks up to (and consuming) the end of the current container.
    fn blocks(&mut self) -> Result<Vec<ContentBlock>, MalformedContentError> {
        let mut blocks = Vec::new();
        while let Some((event, range)) = self.events.next() {
            if matches!(event, Event::End(_)) {
                break;
            }
            if let Some(block) = self.block(event, range)? {
                blocks.push(block);
            }
        }
        Ok(blocks)
    }

    fn block(
        &mut self,
        event: Event<'a>,
        range: Range<usize>,
    ) -> Result<Option<ContentBlock>, MalformedContentError> {
        let block = match event {
            Event::Start(Tag::Paragraph) => ContentBlock::Paragraph(self.inlines()),
            Event::Start(Tag::Heading { level, .. }) => ContentBlock::Heading {
                level: heading_level(level),
                content: self.inlines(),
            },
            Event::Start(Tag::BlockQuote(kind)) => ContentBlock::Quote {
                callout: kind.map(callout_kind),
                blocks: self.blocks()?,
            },
            Event::Start(Tag::CodeBlock(kind)) => self.code_block(kind, range)?,
            Event::Start(Tag::List(start)) => self.list(start)?,
            Event::Start(Tag::Table(alignments)) => ContentBlock::Table(self.table(&alignments)),
            Event::Start(Tag::HtmlBlock) => ContentBlock::Component(self.html_block()),
            Event::Html(html) => ContentBlock::Component(html.into_string()),
            Event::Rule => ContentBlock::Rule,
            event if is_inline(&event) => {
                let mut inlines = Vec::new();
                self.inline_event(event, &mut inlines);
                self.inline_run(&mut inlines);
                ContentBlock::Paragraph(inlines)
            }
            Event::Start(_) => {
                self.skip_container();
                return Ok(None);
            }
            _ => return Ok(None),
        };
        Ok(Some(block))
    }

    fn code_block(
        &mut self,
        kind: CodeBlockKind<'a>,
        range: Range<usize>,
    ) -> Result<ContentBlock, MalformedContentError> {
        let mut code = String::new();
        for (event, _) in self.events.by_ref() {
            match event {
                Event::Text(text) => code.push_str(&text),
                Event::End(_) => break,
                _ => {}
            }
        }

        let CodeBlockKind::Fenced(info) = kind else {
            return Ok(ContentBlock::CodeBlock(CodeBlock {
                code,
                ..CodeBlock::default()
            }));
        };

        let raw = self.source.get(range.clone()).unwrap_or_default();
        if let Some(fence) = missing_close(raw, &code) {
            return Err(self.malformed(
                range.start,
                format!("code fence {}", opening_line(raw)),
                MalformedReason::UnterminatedFence { fence },
            ));
        }

        let info = parse_fence_info(&info);
        Ok(ContentBlock::CodeBlock(CodeBlock {
            language: info.language,
            filename: info.filename,
            attrs: info.attrs,
            code,
        }))
    }

    fn list(&mut self, start: Option<u64>) -> Result<ContentBlock, MalformedContentError> {
        let mut tight = true;
        let mut items = Vec::new();
        while let Some((event, _)) = self.events.next() {
            match event {
                Event::Start(Tag::Item) => items.push(self.item(&mut tight)?),
                Event::End(_) => break,
                _ => {}
            }
        }
        Ok(ContentBlock::List(List {
            start,
            tight,
            items,
        }))
    }

    /// One list item. Loose lists wrap item text in paragraphs; tight lists
    /// emit bare inline events, which are grouped into a paragraph here.
    fn item(&mut self, tight: &mut bool) -> Result<ListItem, MalformedContentError> {
        let mut item = ListItem::default();
        while let Some((event, range)) = self.events.next() {
            match event {
                Event::End(TagEnd::Item) => break,
                Event::TaskListMarker(checked) => item.task = Some(checked),
                Event::Start(Tag::Paragraph) => {
                    *tight = false;
                    item.blocks.push(ContentBlock::Paragraph(self.inlines()));
                }
                event => {
                    if let Some(block) = self.block(event, range)? {
                        item.blocks.push(block);
                    }
                }
            }
            if let Some(checked) = self.pending_task.take() {
                item.task.get_or_insert(checked);
            }
        }
        Ok(item)
    }

    fn table(&mut self, alignments: &[Alignment]) -> Table {
        let mut table = Table {
            alignments: alignments.iter().map(|a| column_align(*a)).collect(),
            ..Table::default()
        };
        let mut row = Vec::new();
        while let Some((event, _)) = self.events.next() {
            match event {
                Event::Start(Tag::TableCell) => row.push(self.inlines()),
                Event::End(TagEnd::TableHead) => table.head = std::mem::take(&mut row),
                Event::End(TagEnd::TableRow) => table.rows.push(std::mem::take(&mut row)),
                Event::End(TagEnd::Table) => break,
                _ => {}
            }
        }
        table
    }

    fn html_block(&mut self) -> String {
        let mut html = String::new();
        for (event, _) in self.events.by_ref() {
            match event {
                Event::Html(text) | Event::Text(text) => html.push_str(&text),
                Event::End(_) => break,
                _ => {}
            }
        }
        html
    }

    /// Inline content up to (and consuming) the end of the current element.
    fn inlines(&mut self) -> Vec<Inline> {
        let mut out = Vec::new();
        while let Some((event, _)) = self.events.next() {
            if matches!(event, Event::End(_)) {
                break;
            }
            self.inline_event(event, &mut out);
        }
        out
    }

    /// Consecutive inline events not wrapped in any block.
    fn inline_run(&mut self, out: &mut Vec<Inline>) {
        while self.events.peek().is_some_and(|(event, _)| is_inline(event)) {
            if let Some((event, _)) = self.events.next() {
                self.inline_event(event, out);
            }
        }
    }

    fn inline_event(&mut self, event: Event<'a>, out: &mut Vec<Inline>) {
        match event {
            Event::Text(text) | Event::InlineMath(text) | Event::DisplayMath(text) => {
                push_inline(out, Inline::Text(text.into_string()));
            }
            Event::Code(code) => out.push(Inline::Code(code.into_string())),
            Event::InlineHtml(html) | Event::Html(html) => out.push(Inline::Html(html.into_string())),
            Event::SoftBreak => out.push(Inline::SoftBreak),
            Event::HardBreak => out.push(Inline::HardBreak),
            Event::TaskListMarker(checked) => self.pending_task = Some(checked),
            Event::Start(Tag::Emphasis) => out.push(Inline::Emphasis(self.inlines())),
            Event::Start(Tag::Strong) => out.push(Inline::Strong(self.inlines())),
            Event::Start(Tag::Strikethrough) => out.push(Inline::Strikethrough(self.inlines())),
            Event::Start(Tag::Link {
                dest_url, title, ..
            }) => out.push(Inline::Link {
                url: dest_url.into_string(),
                title: title.into_string(),
                content: self.inlines(),
            }),
            Event::Start(Tag::Image {
                dest_url, title, ..
            }) => {
                let alt = inline_text(&self.inlines());
                out.push(Inline::Image {
                    src: dest_url.into_string(),
                    title: title.into_string(),
                    alt,
                });
            }
            Event::Start(Tag::Superscript | Tag::Subscript) => {
                for inline in self.inlines() {
                    push_inline(out, inline);
                }
            }
            Event::Start(_) => self.skip_container(),
            _ => {}
        }
    }

    /// Skip an unsupported element and everything inside it.
    fn skip_container(&mut self) {
        let mut depth = 1usize;
        for (event, _) in self.events.by_ref() {
            match event {
                Event::Start(_) => depth += 1,
                Event::End(_) => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
        }
    }

    fn malformed(&self, offset: usize, block: String, reason: MalformedReason) -> MalformedContentError {
        let preceding = self.source.get(..offset).unwrap_or(self.source);
        let line = self.line_offset + preceding.bytes().filter(|b| *b == b'\n').count() + 1;
        MalformedContentError {
            slug: self.slug.to_owned(),
            line,
            block,
            reason,
        }
    }
}

/// Append an inline, merging adjacent text runs.
fn push_inline(out: &mut Vec<Inline>, inline: Inline) {
    if let (Some(Inline::Text(last)), Inline::Text(text)) = (out.last_mut(), &inline) {
        last.push_str(text);
        return;
    }
    out.push(inline);
}

fn is_inline(event: &Event<'_>) -> bool {
    matches!(
        event,
        Event::Text(_)
            | Event::Code(_)
            | Event::InlineHtml(_)
            | Event::InlineMath(_)
            | Event::SoftBreak
            | Event::HardBreak
            | Event::FootnoteReference(_)
            | Event::Start(
                Tag::Emphasis
                    | Tag::Strong
                    | Tag::Strikethrough
                    | Tag::Superscript
                    | Tag::Subscript
                    | Tag::Link { .. }
                    | Tag::Image { .. }
            )
    )
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn callout_kind(kind: BlockQuoteKind) -> CalloutKind {
    match kind {
        BlockQuoteKind::Note => CalloutKind::Note,
        BlockQuoteKind::Tip => CalloutKind::Tip,
        BlockQuoteKind::Important => CalloutKind::Important,
        BlockQuoteKind::Warning => CalloutKind::Warning,
        BlockQuoteKind::Caution => CalloutKind::Caution,
    }
}

fn column_align(alignment: Alignment) -> ColumnAlign {
    match alignment {
        Alignment::None => ColumnAlign::None,
        Alignment::Left => ColumnAlign::Left,
        Alignment::Center => ColumnAlign::Center,
        Alignment::Right => ColumnAlign::Right,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(text: &str) -> Document {
        parse_document("hash-map", Path::new("hash-map.md"), text).unwrap()
    }

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_owned())
    }

    #[test]
    fn test_title_from_first_h1() {
        let doc = parse("# HashMap\n\nA map.\n");
        assert_eq!(doc.title, "HashMap");
        assert_eq!(
            doc.blocks,
            vec![
                ContentBlock::Heading {
                    level: 1,
                    content: vec![text("HashMap")],
                },
                ContentBlock::Paragraph(vec![text("A map.")]),
            ]
        );
    }

    #[test]
    fn test_title_precedence() {
        let doc = parse("---\ntitle: Hash Maps in Java\n---\n# HashMap\n");
        assert_eq!(doc.title, "Hash Maps in Java");

        let doc = parse("Just prose.\n");
        assert_eq!(doc.title, "Hash Map");
    }

    #[test]
    fn test_code_block_with_filename() {
        let source = "```java filename=\"Main.java\"\nMap<String, Integer> m = new HashMap<>();\n```\n";
        let doc = parse(source);
        assert_eq!(
            doc.blocks,
            vec![ContentBlock::CodeBlock(CodeBlock {
                language: Some("java".to_owned()),
                filename: Some("Main.java".to_owned()),
                attrs: std::collections::BTreeMap::new(),
                code: "Map<String, Integer> m = new HashMap<>();\n".to_owned(),
            })]
        );
    }

    #[test]
    fn test_code_text_is_literal() {
        let code = "for (int i = 0; i < n; i++) {\n    // *not* emphasis\n\n    list.add(i);\n}\n";
        let doc = parse(&format!("```java\n{code}```\n"));
        let ContentBlock::CodeBlock(block) = &doc.blocks[0] else {
            panic!("expected code block, got {:?}", doc.blocks[0]);
        };
        assert_eq!(block.code, code);
    }

    #[test]
    fn test_unterminated_fence() {
        let source = "# HashMap\n\nIntro.\n\n```java\nint x = 1;\n";
        let err = parse_document("hash-map", Path::new("hash-map.md"), source).unwrap_err();
        assert_eq!(err.slug, "hash-map");
        assert_eq!(err.line, 5);
        assert_eq!(err.block, "code fence ```java");
        assert_eq!(
            err.reason,
            MalformedReason::UnterminatedFence {
                fence: "```".to_owned()
            }
        );
    }

    #[test]
    fn test_unterminated_fence_line_counts_front_matter() {
        let source = "---\ntitle: T\n---\n\n~~~\ncode\n";
        let err = parse_document("t", Path::new("t.md"), source).unwrap_err();
        assert_eq!(err.line, 5);
        assert_eq!(
            err.reason,
            MalformedReason::UnterminatedFence {
                fence: "~~~".to_owned()
            }
        );
    }

    #[test]
    fn test_shorter_closing_fence_does_not_close() {
        let source = "````md\n```java\nx\n```\n";
        let err = parse_document("t", Path::new("t.md"), source).unwrap_err();
        assert!(matches!(err.reason, MalformedReason::UnterminatedFence { .. }));
    }

    #[test]
    fn test_indented_closing_fence_does_not_close() {
        let source = "# T\n\n```java\nint x;\n    ```\n";
        let err = parse_document("t", Path::new("t.md"), source).unwrap_err();
        assert_eq!(err.line, 3);
        assert_eq!(
            err.reason,
            MalformedReason::UnterminatedFence {
                fence: "```".to_owned()
            }
        );
    }

    #[test]
    fn test_closing_fence_with_small_indent_closes() {
        let doc = parse("```java\nint x;\n   ```\n\nAfter.\n");
        assert_eq!(doc.blocks.len(), 2);
        assert!(matches!(
            &doc.blocks[0],
            ContentBlock::CodeBlock(code) if code.code == "int x;\n"
        ));
    }

    #[test]
    fn test_front_matter_error_reports_line_one() {
        let err = parse_document("t", Path::new("t.md"), "---\ntitle: x\n").unwrap_err();
        assert_eq!(err.line, 1);
        assert_eq!(err.reason, MalformedReason::UnterminatedFrontMatter);
    }

    #[test]
    fn test_inline_formatting_kept() {
        let doc = parse("Use **`put`** and *get*, not ~~old~~ [docs](https://docs.oracle.com \"Oracle\").\n");
        assert_eq!(
            doc.blocks,
            vec![ContentBlock::Paragraph(vec![
                text("Use "),
                Inline::Strong(vec![Inline::Code("put".to_owned())]),
                text(" and "),
                Inline::Emphasis(vec![text("get")]),
                text(", not "),
                Inline::Strikethrough(vec![text("old")]),
                text(" "),
                Inline::Link {
                    url: "https://docs.oracle.com".to_owned(),
                    title: "Oracle".to_owned(),
                    content: vec![text("docs")],
                },
                text("."),
            ])]
        );
    }

    #[test]
    fn test_tight_list_with_task_markers() {
        let doc = parse("- [x] done\n- [ ] todo\n- plain\n");
        assert_eq!(
            doc.blocks,
            vec![ContentBlock::List(List {
                start: None,
                tight: true,
                items: vec![
                    ListItem {
                        task: Some(true),
                        blocks: vec![ContentBlock::Paragraph(vec![text("done")])],
                    },
                    ListItem {
                        task: Some(false),
                        blocks: vec![ContentBlock::Paragraph(vec![text("todo")])],
                    },
                    ListItem {
                        task: None,
                        blocks: vec![ContentBlock::Paragraph(vec![text("plain")])],
                    },
                ],
            })]
        );
    }

    #[test]
    fn test_loose_ordered_list() {
        let doc = parse("3. first\n\n4. second\n");
        let ContentBlock::List(list) = &doc.blocks[0] else {
            panic!("expected list");
        };
        assert_eq!(list.start, Some(3));
        assert!(!list.tight);
        assert_eq!(list.items.len(), 2);
        assert_eq!(
            list.items[1].blocks,
            vec![ContentBlock::Paragraph(vec![text("second")])]
        );
    }

    #[test]
    fn test_nested_list_with_code() {
        let doc = parse("- outer\n  - inner\n\n  ```java\n  x();\n  ```\n");
        let ContentBlock::List(list) = &doc.blocks[0] else {
            panic!("expected list");
        };
        let first = &list.items[0].blocks;
        assert!(matches!(first[1], ContentBlock::List(_)));
        assert!(first.iter().any(|block| matches!(
            block,
            ContentBlock::CodeBlock(code) if code.code == "x();\n"
        )));
    }

    #[test]
    fn test_callout_quote() {
        let doc = parse("> [!WARNING]\n> Not thread-safe.\n");
        assert_eq!(
            doc.blocks,
            vec![ContentBlock::Quote {
                callout: Some(CalloutKind::Warning),
                blocks: vec![ContentBlock::Paragraph(vec![text("Not thread-safe.")])],
            }]
        );
    }

    #[test]
    fn test_table() {
        let doc = parse("| Op | Cost |\n|:---|---:|\n| `get` | O(1) |\n");
        assert_eq!(
            doc.blocks,
            vec![ContentBlock::Table(Table {
                alignments: vec![ColumnAlign::Left, ColumnAlign::Right],
                head: vec![vec![text("Op")], vec![text("Cost")]],
                rows: vec![vec![
                    vec![Inline::Code("get".to_owned())],
                    vec![text("O(1)")],
                ]],
            })]
        );
    }

    #[test]
    fn test_mdx_component_passthrough() {
        let source = "import Tabs from '@theme/Tabs';\n\n# Title\n\n<Tabs>\n<TabItem value=\"java\">\n\n```java\nx();\n```\n\n</TabItem>\n</Tabs>\n";
        let doc = parse_document("t", Path::new("t.mdx"), source).unwrap();
        assert_eq!(doc.title, "Title");
        assert_eq!(
            doc.blocks[1],
            ContentBlock::Component("<Tabs>\n<TabItem value=\"java\">\n".to_owned())
        );
        assert!(matches!(doc.blocks[2], ContentBlock::CodeBlock(_)));
        assert_eq!(
            doc.blocks[3],
            ContentBlock::Component("</TabItem>\n</Tabs>\n".to_owned())
        );
    }

    #[test]
    fn test_import_kept_in_plain_markdown() {
        let doc = parse("import is a keyword.\n");
        assert_eq!(
            doc.blocks,
            vec![ContentBlock::Paragraph(vec![text("import is a keyword.")])]
        );
    }

    #[test]
    fn test_image_alt_text() {
        let doc = parse("![bucket *layout*](buckets.png \"Buckets\")\n");
        assert_eq!(
            doc.blocks,
            vec![ContentBlock::Paragraph(vec![Inline::Image {
                src: "buckets.png".to_owned(),
                title: "Buckets".to_owned(),
                alt: "bucket layout".to_owned(),
            }])]
        );
    }

    #[test]
    fn test_parse_is_deterministic() {
        let source = "# A\n\n- x\n- y\n\n```java\nz\n```\n\n| a |\n|---|\n| b |\n";
        assert_eq!(parse(source), parse(source));
    }
}
