//! Markdown document parser.

use pulldown_cmark::{Options, Parser};

use crate::frontmatter::{extract_frontmatter, Frontmatter, FrontmatterError};
use crate::render::render_events;
use crate::tree::Document;

/// A parsed Markdown document.
#[derive(Debug, Clone)]
pub struct ParsedDoc {
    /// Parsed front matter (if present)
    pub frontmatter: Option<Frontmatter>,

    /// Rendered body
    pub document: Document,
}

impl ParsedDoc {
    /// Front matter, or an empty one when the page has none.
    pub fn meta(&self) -> Frontmatter {
        self.frontmatter.clone().unwrap_or_default()
    }
}

/// Errors that can occur when parsing Markdown.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Frontmatter error: {0}")]
    Frontmatter(#[from] FrontmatterError),
}

/// Markdown extensions enabled for every page.
pub fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES
}

/// Parse a Markdown document into front matter and a document tree.
pub fn parse_doc(source: &str) -> Result<ParsedDoc, ParseError> {
    let (frontmatter, content) = extract_frontmatter(source)?;

    let document = render_events(Parser::new_ext(content, options()));

    Ok(ParsedDoc {
        frontmatter,
        document,
    })
}
