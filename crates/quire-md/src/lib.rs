//! Markdown parser with front matter extraction and path rewriting.
//!
//! This crate turns Markdown pages into an HTML document tree, extracts their
//! front matter, and rewrites root-relative paths for deployment under a base
//! path.

pub mod frontmatter;
pub mod parser;
pub mod paths;
pub mod render;
pub mod tree;

pub use frontmatter::Frontmatter;
pub use parser::{parse_doc, ParseError, ParsedDoc};
pub use paths::{rewrite_paths, PathRewriter, Target};
pub use tree::{Attribute, Document, Element, Node};
