//! HTML theme for Pedia sites.
//!
//! Rendering happens in two steps:
//! - [`render_body`]: block tree to article HTML plus TOC entries
//! - [`render_page`]: article wrapped in the site layout (header, sidebar,
//!   TOC, prev/next links, footer)
//!
//! Both are pure functions of their input. Code blocks are emitted with a
//! `language-*` class and left for the stylesheet or a client-side
//! highlighter to color, so the code text stays byte-identical.
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use pedia_content::parse_document;
//! use pedia_renderer::{LinkBase, render_body};
//!
//! let doc = parse_document("hash-map", Path::new("hash-map.md"), "# HashMap\n\n## Buckets\n").unwrap();
//! let body = render_body(&doc.blocks, &LinkBase::for_document(&doc));
//! assert_eq!(body.toc[0].id, "buckets");
//! ```

mod body;
mod page;
mod toc;
mod util;

pub use body::{LinkBase, RenderedBody, render_body};
pub use page::{PageContext, THEME_CSS_PATH, edit_url, render_landing, render_page};
pub use toc::{TocEntry, TocNode, build_toc};
pub use util::{asset_href, escape_html, page_href, page_output_path, slugify};

/// Bundled stylesheet, written to [`THEME_CSS_PATH`].
pub const THEME_CSS: &str = include_str!("../assets/theme.css");
