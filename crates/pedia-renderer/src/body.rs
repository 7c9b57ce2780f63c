//! Document body rendering.
//!
//! Produces semantic HTML5 for a block tree:
//! - `<figure class="code-block">` around `<pre><code>` for code blocks
//! - `<div class="alert">` for callouts, `<blockquote>` otherwise
//! - Relative `.md`/`.mdx` link resolution to page URLs

use std::collections::{HashMap, HashSet};
use std::fmt::Write;
use std::path::Path;

use pedia_content::{
    CodeBlock, ColumnAlign, ContentBlock, Document, Inline, List, Table, inline_text,
};

use crate::toc::TocEntry;
use crate::util::{asset_href, escape_html, page_href, slugify};

/// Rendered body HTML with its table of contents.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderedBody {
    /// Body HTML.
    pub html: String,
    /// Headings in document order, excluding the title heading.
    pub toc: Vec<TocEntry>,
}

/// Location of the page being rendered, for link resolution.
#[derive(Clone, Copy, Debug)]
pub struct LinkBase<'a> {
    /// Slug of the current page.
    pub slug: &'a str,
    /// Directory of the current source, relative to the content root.
    pub source_dir: &'a str,
}

impl<'a> LinkBase<'a> {
    /// Link base for a parsed document.
    #[must_use]
    pub fn for_document(document: &'a Document) -> Self {
        let source_dir = document
            .source_path
            .parent()
            .and_then(Path::to_str)
            .unwrap_or_default();
        Self {
            slug: &document.slug,
            source_dir,
        }
    }
}

/// Render a block tree to HTML.
///
/// Headings get unique ids (`faq`, `faq-1`, ...). The first level-1
/// heading is the page title: it is rendered but left out of the TOC.
#[must_use]
pub fn render_body(blocks: &[ContentBlock], base: &LinkBase<'_>) -> RenderedBody {
    let mut renderer = BodyRenderer {
        base: *base,
        out: String::with_capacity(4096),
        toc: Vec::new(),
        id_counts: HashMap::new(),
        used_ids: HashSet::new(),
        seen_title: false,
    };
    renderer.blocks(blocks);
    RenderedBody {
        html: renderer.out,
        toc: renderer.toc,
    }
}

struct BodyRenderer<'a> {
    base: LinkBase<'a>,
    out: String,
    toc: Vec<TocEntry>,
    /// Last suffix tried per base id.
    id_counts: HashMap<String, usize>,
    used_ids: HashSet<String>,
    seen_title: bool,
}

impl BodyRenderer<'_> {
    fn blocks(&mut self, blocks: &[ContentBlock]) {
        for block in blocks {
            self.block(block);
            self.out.push('\n');
        }
    }

    fn block(&mut self, block: &ContentBlock) {
        match block {
            ContentBlock::Heading { level, content } => self.heading(*level, content),
            ContentBlock::Paragraph(content) => {
                self.out.push_str("<p>");
                self.inlines(content);
                self.out.push_str("</p>");
            }
            ContentBlock::CodeBlock(code) => self.code_block(code),
            ContentBlock::List(list) => self.list(list),
            ContentBlock::Quote {
                callout: Some(kind),
                blocks,
            } => {
                let _ = write!(
                    self.out,
                    r#"<div class="alert alert-{}"><div class="alert-title">{}</div><div class="alert-content">"#,
                    kind.as_str(),
                    kind.label()
                );
                self.out.push('\n');
                self.blocks(blocks);
                self.out.push_str("</div></div>");
            }
            ContentBlock::Quote {
                callout: None,
                blocks,
            } => {
                self.out.push_str("<blockquote>\n");
                self.blocks(blocks);
                self.out.push_str("</blockquote>");
            }
            ContentBlock::Table(table) => self.table(table),
            ContentBlock::Component(html) => self.out.push_str(html.trim_end()),
            ContentBlock::Rule => self.out.push_str("<hr>"),
        }
    }

    fn heading(&mut self, level: u8, content: &[Inline]) {
        let text = inline_text(content);
        let id = self.generate_id(&text);
        let _ = write!(self.out, r#"<h{level} id="{id}">"#);
        self.inlines(content);
        let _ = write!(self.out, "</h{level}>");

        let is_title = level == 1 && !self.seen_title;
        if is_title {
            self.seen_title = true;
        } else {
            self.toc.push(TocEntry {
                level,
                title: text.trim().to_owned(),
                id,
            });
        }
    }

    /// Generate a unique ID for a heading.
    fn generate_id(&mut self, text: &str) -> String {
        let slug = slugify(text);
        let base_id = if slug.is_empty() {
            "section".to_owned()
        } else {
            slug
        };
        let count = self.id_counts.entry(base_id.clone()).or_default();
        let mut id = base_id.clone();
        while self.used_ids.contains(&id) {
            *count += 1;
            id = format!("{base_id}-{count}");
        }
        self.used_ids.insert(id.clone());
        id
    }

    /// Code text is emitted as one escaped run so the source survives
    /// byte-for-byte once unescaped.
    fn code_block(&mut self, code: &CodeBlock) {
        self.out.push_str(r#"<figure class="code-block""#);
        if let Some(lang) = &code.language {
            let _ = write!(self.out, r#" data-language="{}""#, escape_html(lang));
        }
        if let Some(lines) = code.attrs.get("highlight") {
            let _ = write!(self.out, r#" data-highlight="{}""#, escape_html(lines));
        }
        self.out.push('>');
        if let Some(filename) = &code.filename {
            let _ = write!(self.out, "<figcaption>{}</figcaption>", escape_html(filename));
        }
        match &code.language {
            Some(lang) => {
                let _ = write!(
                    self.out,
                    r#"<pre><code class="language-{}">{}</code></pre>"#,
                    escape_html(lang),
                    escape_html(&code.code)
                );
            }
            None => {
                let _ = write!(self.out, "<pre><code>{}</code></pre>", escape_html(&code.code));
            }
        }
        self.out.push_str("</figure>");
    }

    fn list(&mut self, list: &List) {
        let close = match list.start {
            Some(1) => {
                self.out.push_str("<ol>");
                "</ol>"
            }
            Some(n) => {
                let _ = write!(self.out, r#"<ol start="{n}">"#);
                "</ol>"
            }
            None => {
                self.out.push_str("<ul>");
                "</ul>"
            }
        };
        self.out.push('\n');

        for item in &list.items {
            match item.task {
                Some(checked) => {
                    self.out.push_str(r#"<li class="task-list-item">"#);
                    let checked = if checked { " checked" } else { "" };
                    let _ = write!(self.out, r#"<input type="checkbox" disabled{checked}> "#);
                }
                None => self.out.push_str("<li>"),
            }
            for (index, block) in item.blocks.iter().enumerate() {
                match block {
                    ContentBlock::Paragraph(content) if list.tight => {
                        if index > 0 {
                            self.out.push('\n');
                        }
                        self.inlines(content);
                    }
                    other => {
                        self.out.push('\n');
                        self.block(other);
                    }
                }
            }
            self.out.push_str("</li>\n");
        }
        self.out.push_str(close);
    }

    fn table(&mut self, table: &Table) {
        self.out.push_str("<table>\n<thead><tr>");
        for (index, cell) in table.head.iter().enumerate() {
            self.cell("th", alignment_style(table, index), cell);
        }
        self.out.push_str("</tr></thead>\n<tbody>\n");
        for row in &table.rows {
            self.out.push_str("<tr>");
            for (index, cell) in row.iter().enumerate() {
                self.cell("td", alignment_style(table, index), cell);
            }
            self.out.push_str("</tr>\n");
        }
        self.out.push_str("</tbody>\n</table>");
    }

    fn cell(&mut self, tag: &str, align: &str, content: &[Inline]) {
        let _ = write!(self.out, "<{tag}{align}>");
        self.inlines(content);
        let _ = write!(self.out, "</{tag}>");
    }

    fn inlines(&mut self, inlines: &[Inline]) {
        for inline in inlines {
            self.inline(inline);
        }
    }

    fn inline(&mut self, inline: &Inline) {
        match inline {
            Inline::Text(text) => self.out.push_str(&escape_html(text)),
            Inline::Code(code) => {
                let _ = write!(self.out, "<code>{}</code>", escape_html(code));
            }
            Inline::Emphasis(children) => self.wrap("em", children),
            Inline::Strong(children) => self.wrap("strong", children),
            Inline::Strikethrough(children) => self.wrap("s", children),
            Inline::Link {
                url,
                title,
                content,
            } => {
                let href = resolve_link(url, &self.base);
                let _ = write!(self.out, r#"<a href="{}""#, escape_html(&href));
                if !title.is_empty() {
                    let _ = write!(self.out, r#" title="{}""#, escape_html(title));
                }
                self.out.push('>');
                self.inlines(content);
                self.out.push_str("</a>");
            }
            Inline::Image { src, title, alt } => {
                let src = resolve_link(src, &self.base);
                let _ = write!(self.out, r#"<img src="{}""#, escape_html(&src));
                if !title.is_empty() {
                    let _ = write!(self.out, r#" title="{}""#, escape_html(title));
                }
                let _ = write!(self.out, r#" alt="{}">"#, escape_html(alt));
            }
            Inline::Html(html) => self.out.push_str(html),
            Inline::SoftBreak => self.out.push('\n'),
            Inline::HardBreak => self.out.push_str("<br>\n"),
        }
    }

    fn wrap(&mut self, tag: &str, children: &[Inline]) {
        let _ = write!(self.out, "<{tag}>");
        self.inlines(children);
        let _ = write!(self.out, "</{tag}>");
    }
}

fn alignment_style(table: &Table, index: usize) -> &'static str {
    match table.alignments.get(index) {
        Some(ColumnAlign::Left) => r#" style="text-align:left""#,
        Some(ColumnAlign::Center) => r#" style="text-align:center""#,
        Some(ColumnAlign::Right) => r#" style="text-align:right""#,
        Some(ColumnAlign::None) | None => "",
    }
}

/// Resolve a content link to a URL relative to the current page.
///
/// Relative `.md`/`.mdx` links resolve against the current source
/// directory; a leading `/` starts at the content root:
/// - `array-list.md` from `hash-map` -> `../array-list/`
/// - `../index.md#faq` from `guide/setup` -> `../../#faq`
///
/// Other relative links point at static files, which are published at the
/// same path under the output root: `diagram.png` from `hash-map` ->
/// `../diagram.png`.
///
/// Links with a scheme, protocol-relative links and fragment-only links
/// are returned unchanged.
fn resolve_link(url: &str, base: &LinkBase<'_>) -> String {
    if url.starts_with('#') || url.starts_with("//") || has_scheme(url) {
        return url.to_owned();
    }

    let (path_part, suffix) = url
        .find(['?', '#'])
        .map_or((url, ""), |pos| (&url[..pos], &url[pos..]));
    if path_part.is_empty() {
        return url.to_owned();
    }

    let resolve = |path: &str| match path.strip_prefix('/') {
        Some(absolute) => resolve_relative_path(absolute, ""),
        None => resolve_relative_path(path, base.source_dir),
    };

    let Some(without_ext) = path_part
        .strip_suffix(".md")
        .or_else(|| path_part.strip_suffix(".mdx"))
    else {
        return format!("{}{suffix}", asset_href(base.slug, &resolve(path_part)));
    };

    let resolved = resolve(without_ext);
    let target = if resolved == "index" {
        ""
    } else {
        resolved.strip_suffix("/index").unwrap_or(&resolved)
    };

    format!("{}{suffix}", page_href(base.slug, target))
}

/// `mailto:x`, `https://x`, `data:...`; a colon after a slash is a path.
fn has_scheme(url: &str) -> bool {
    url.split_once(':').is_some_and(|(scheme, _)| {
        scheme.starts_with(|c: char| c.is_ascii_alphabetic())
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

/// Resolve a relative path against a base directory.
///
/// Handles `.` (current), `..` (parent), and plain relative paths.
fn resolve_relative_path(relative: &str, base: &str) -> String {
    let mut segments: Vec<&str> = base.split('/').filter(|s| !s.is_empty()).collect();

    for component in relative.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                // Ignore if already at root to prevent traversal
                segments.pop();
            }
            _ => segments.push(component),
        }
    }

    segments.join("/")
}
