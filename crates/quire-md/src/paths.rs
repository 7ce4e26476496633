//! Root-relative path rewriting.
//!
//! Pages link to each other and to images with root-relative paths such as
//! `/notes.html` or `/images/logo.png`. When the site is deployed under a
//! prefix, those paths have to carry the prefix too. [`PathRewriter`] walks a
//! rendered [`Document`] and prepends the configured base path to every
//! root-relative `a[href]` and `img[src]`.
//!
//! Links that land on a generated page (ending in `.html`) also get a
//! `#_content` fragment so narrow layouts with a fixed header scroll straight
//! to the page content.
//!
//! The pass is not idempotent: running it twice prefixes the base path twice.
//! Run it exactly once, right after a page is rendered.

use crate::tree::{Document, Element};

/// Fragment appended to rewritten links that point at a generated page.
pub const CONTENT_ANCHOR: &str = "#_content";

/// How a reference is treated by the rewriter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Starts with `/` but does not point at a page
    RootRelative,
    /// Starts with `/` and ends with `.html`
    PageLink,
    /// Anything else, left untouched
    Other,
}

impl Target {
    /// Classify a reference value.
    pub fn classify(value: &str) -> Self {
        if !value.starts_with('/') {
            Self::Other
        } else if value.ends_with(".html") {
            Self::PageLink
        } else {
            Self::RootRelative
        }
    }
}

/// Prefixes root-relative links and image sources with a base path.
#[derive(Debug, Clone, Default)]
pub struct PathRewriter {
    base: String,
}

impl PathRewriter {
    /// Create a rewriter for the given base path, e.g. `/docs`.
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    /// The configured base path.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Rewrite every matching element in the document and return it.
    pub fn rewrite(&self, mut doc: Document) -> Document {
        doc.walk_mut(|element| self.rewrite_element(element));
        doc
    }

    fn rewrite_element(&self, element: &mut Element) {
        match element.name.as_str() {
            "a" => {
                if let Some(href) = element.attr("href").and_then(|v| self.link(v)) {
                    element.set_attr("href", href);
                }
            }
            "img" => {
                if let Some(src) = element.attr("src").and_then(|v| self.source(v)) {
                    element.set_attr("src", src);
                }
            }
            _ => {}
        }
    }

    /// New value for a link reference, or `None` to leave it alone.
    pub fn link(&self, href: &str) -> Option<String> {
        if Target::classify(href) == Target::Other {
            return None;
        }

        let mut path = format!("{}{}", self.base, href);
        if Target::classify(&path) == Target::PageLink {
            path.push_str(CONTENT_ANCHOR);
        }
        Some(path)
    }

    /// New value for an image source, or `None` to leave it alone.
    pub fn source(&self, src: &str) -> Option<String> {
        match Target::classify(src) {
            Target::Other => None,
            _ => Some(format!("{}{}", self.base, src)),
        }
    }
}

/// Rewrite root-relative paths in `doc` against `base`.
pub fn rewrite_paths(doc: Document, base: &str) -> Document {
    PathRewriter::new(base).rewrite(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Node;
    use pretty_assertions::assert_eq;

    fn element(name: &str, attrs: &[(&str, &str)]) -> Element {
        attrs
            .iter()
            .fold(Element::new(name), |el, (k, v)| el.with_attr(k, *v))
    }

    fn single(el: Element) -> Document {
        Document::new(vec![Node::Element(el)])
    }

    fn first(doc: &Document) -> &Element {
        match &doc.children[0] {
            Node::Element(el) => el,
            other => panic!("expected element, got {:?}", other),
        }
    }

    #[test]
    fn classifies_targets() {
        assert_eq!(Target::classify("/notes.html"), Target::PageLink);
        assert_eq!(Target::classify("/images/a.png"), Target::RootRelative);
        assert_eq!(Target::classify("/"), Target::RootRelative);
        assert_eq!(Target::classify("notes.html"), Target::Other);
        assert_eq!(Target::classify("#top"), Target::Other);
        assert_eq!(Target::classify(""), Target::Other);
    }

    #[test]
    fn page_links_get_base_and_anchor() {
        let doc = rewrite_paths(single(element("a", &[("href", "/notes.html")])), "/docs");

        assert_eq!(first(&doc).attr("href"), Some("/docs/notes.html#_content"));
    }

    #[test]
    fn other_root_relative_links_get_base_only() {
        let rewriter = PathRewriter::new("/docs");

        assert_eq!(rewriter.link("/files/song.bosca"), Some("/docs/files/song.bosca".into()));
        assert_eq!(rewriter.link("/"), Some("/docs/".into()));
        assert_eq!(
            rewriter.link("/notes.html#tempo"),
            Some("/docs/notes.html#tempo".into())
        );
    }

    #[test]
    fn images_never_get_an_anchor() {
        let rewriter = PathRewriter::new("/docs");

        assert_eq!(rewriter.source("/logo.png"), Some("/docs/logo.png".into()));
        assert_eq!(rewriter.source("/embed.html"), Some("/docs/embed.html".into()));
    }

    #[test]
    fn leaves_non_root_relative_values() {
        let rewriter = PathRewriter::new("/docs");

        for value in [
            "https://example.com",
            "#anchor",
            "relative/path.html",
            "mailto:team@example.com",
            "",
        ] {
            assert_eq!(rewriter.link(value), None, "link {value}");
            assert_eq!(rewriter.source(value), None, "source {value}");
        }
    }

    #[test]
    fn empty_base_still_anchors_page_links() {
        let rewriter = PathRewriter::new("");

        assert_eq!(rewriter.link("/index.html"), Some("/index.html#_content".into()));
        assert_eq!(rewriter.link("/song.mid"), Some("/song.mid".into()));
        assert_eq!(rewriter.source("/logo.png"), Some("/logo.png".into()));
    }

    #[test]
    fn skips_elements_without_the_attribute() {
        let doc = single(element("a", &[("name", "top")]));

        let rewritten = rewrite_paths(doc.clone(), "/docs");

        assert_eq!(rewritten, doc);
    }

    #[test]
    fn only_rewrites_href_on_anchors_and_src_on_images() {
        let doc = Document::new(vec![
            Node::Element(element("link", &[("href", "/style.css")])),
            Node::Element(element("script", &[("src", "/app.js")])),
            Node::Element(element("a", &[("src", "/x.png")])),
            Node::Element(element("img", &[("href", "/x.html")])),
        ]);

        let rewritten = rewrite_paths(doc.clone(), "/docs");

        assert_eq!(rewritten, doc);
    }

    #[test]
    fn preserves_unrelated_attributes_and_order() {
        let doc = single(element(
            "a",
            &[("class", "btn"), ("href", "/a.html"), ("title", "/b.html")],
        ));

        let html = rewrite_paths(doc, "/base").to_html();

        assert_eq!(
            html,
            "<a class=\"btn\" href=\"/base/a.html#_content\" title=\"/b.html\"></a>"
        );
    }

    #[test]
    fn rewrites_deeply_nested_elements() {
        let mut cell = element("td", &[]);
        cell.children.push(Node::Element(element("a", &[("href", "/deep.html")])));
        cell.children.push(Node::Element(element("img", &[("src", "/deep.png")])));
        let mut row = element("tr", &[]);
        row.children.push(Node::Element(cell));
        let mut item = element("li", &[]);
        item.children.push(Node::Element(row));

        let html = rewrite_paths(single(item), "/b").to_html();

        assert_eq!(
            html,
            "<li><tr>\n<td><a href=\"/b/deep.html#_content\"></a><img src=\"/b/deep.png\" /></td>\n</tr>\n</li>\n"
        );
    }

    #[test]
    fn raw_html_is_not_rewritten() {
        let doc = Document::new(vec![Node::Raw("<a href=\"/raw.html\">raw</a>".into())]);

        assert_eq!(rewrite_paths(doc, "/docs").to_html(), "<a href=\"/raw.html\">raw</a>");
    }
}
