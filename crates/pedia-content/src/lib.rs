//! Document model and content parser for Pedia.
//!
//! Turns one `.md` or `.mdx` source into a [`Document`]: front matter,
//! resolved title and an ordered tree of [`ContentBlock`] values.
//!
//! # Quick Start
//!
//! ```
//! use std::path::Path;
//! use pedia_content::{ContentBlock, parse_document};
//!
//! let doc = parse_document(
//!     "hash-map",
//!     Path::new("hash-map.md"),
//!     "# HashMap\n\n```java\nmap.put(k, v);\n```\n",
//! )
//! .unwrap();
//! assert_eq!(doc.title, "HashMap");
//! assert!(matches!(doc.blocks[1], ContentBlock::CodeBlock(_)));
//! ```

mod document;
mod error;
mod fence;
mod front_matter;
mod mdx;
mod parser;

pub use document::{
    CalloutKind, CodeBlock, ColumnAlign, ContentBlock, Document, FrontMatter, Inline, List,
    ListItem, NavigationEntry, Table, inline_text, title_from_slug,
};
pub use error::{MalformedContentError, MalformedReason};
pub use parser::{parse_document, parser_options};
