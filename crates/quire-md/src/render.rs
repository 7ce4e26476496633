//! Lowering of Markdown events into a [`Document`].

use std::collections::HashSet;

use pulldown_cmark::{Alignment, CodeBlockKind, Event, HeadingLevel, LinkType, Tag, TagEnd};

use crate::tree::{Document, Element, Node};

/// Builds a document tree from a stream of Markdown events.
///
/// Every `Start` event opens zero or more elements and the matching `End`
/// closes the same number, so tags that map to nested elements (code blocks,
/// table heads) or to nothing at all (HTML blocks) share one code path.
struct TreeBuilder {
    root: Vec<Node>,
    stack: Vec<Element>,
    opened: Vec<usize>,
    table: Option<TableState>,
    heading_ids: HashSet<String>,
}

struct TableState {
    alignments: Vec<Alignment>,
    /// Index into `opened` for the table itself, so tbody can be closed with it
    frame: usize,
    in_head: bool,
    has_body: bool,
    cell: usize,
}

/// Render Markdown events to a document tree.
///
/// Explicit heading ids are reserved up front, so a generated id never
/// repeats one that appears later in the document.
pub fn render_events<'a>(events: impl IntoIterator<Item = Event<'a>>) -> Document {
    let events: Vec<Event<'a>> = events.into_iter().collect();
    let heading_ids = events
        .iter()
        .filter_map(|event| match event {
            Event::Start(Tag::Heading { id: Some(id), .. }) => Some(id.to_string()),
            _ => None,
        })
        .collect();

    let mut builder = TreeBuilder {
        root: Vec::new(),
        stack: Vec::new(),
        opened: Vec::new(),
        table: None,
        heading_ids,
    };

    for event in events {
        builder.event(event);
    }

    builder.finish()
}

impl TreeBuilder {
    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.append(Node::Text(text.into_string())),
            Event::Code(code) => {
                let mut element = Element::new("code");
                element.children.push(Node::Text(code.into_string()));
                self.append(Node::Element(element));
            }
            Event::Html(html) | Event::InlineHtml(html) => {
                self.append(Node::Raw(html.into_string()));
            }
            Event::SoftBreak => self.append(Node::Text("\n".to_string())),
            Event::HardBreak => self.append(Node::Element(Element::new("br"))),
            Event::Rule => self.append(Node::Element(Element::new("hr"))),
            Event::TaskListMarker(checked) => {
                let mut input = Element::new("input")
                    .with_attr("disabled", "")
                    .with_attr("type", "checkbox");
                if checked {
                    input.set_attr("checked", "");
                }
                self.append(Node::Element(input));
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let count = match tag {
            Tag::Paragraph => self.open(Element::new("p")),
            Tag::Heading { level, id, .. } => {
                let mut heading = Element::new(heading_name(level));
                if let Some(id) = id {
                    heading.set_attr("id", id.into_string());
                }
                self.open(heading)
            }
            Tag::BlockQuote(_) => self.open(Element::new("blockquote")),
            Tag::CodeBlock(kind) => {
                let mut code = Element::new("code");
                if let CodeBlockKind::Fenced(info) = kind {
                    if let Some(lang) = info.split_whitespace().next() {
                        code.set_attr("class", format!("language-{}", lang));
                    }
                }
                self.open(Element::new("pre")) + self.open(code)
            }
            Tag::List(Some(1)) => self.open(Element::new("ol")),
            Tag::List(Some(start)) => {
                self.open(Element::new("ol").with_attr("start", start.to_string()))
            }
            Tag::List(None) => self.open(Element::new("ul")),
            Tag::Item => self.open(Element::new("li")),
            Tag::Table(alignments) => {
                let frame = self.opened.len();
                self.table = Some(TableState {
                    alignments,
                    frame,
                    in_head: false,
                    has_body: false,
                    cell: 0,
                });
                self.open(Element::new("table"))
            }
            Tag::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.in_head = true;
                    table.cell = 0;
                }
                self.open(Element::new("thead")) + self.open(Element::new("tr"))
            }
            Tag::TableRow => {
                self.open_table_body();
                if let Some(table) = self.table.as_mut() {
                    table.cell = 0;
                }
                self.open(Element::new("tr"))
            }
            Tag::TableCell => {
                let cell = self.table_cell();
                self.open(cell)
            }
            Tag::Emphasis => self.open(Element::new("em")),
            Tag::Strong => self.open(Element::new("strong")),
            Tag::Strikethrough => self.open(Element::new("del")),
            Tag::Link {
                link_type,
                dest_url,
                title,
                ..
            } => {
                let href = match link_type {
                    LinkType::Email => format!("mailto:{}", dest_url),
                    _ => dest_url.into_string(),
                };
                let mut link = Element::new("a").with_attr("href", href);
                if !title.is_empty() {
                    link.set_attr("title", title.into_string());
                }
                self.open(link)
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                let mut image = Element::new("img").with_attr("src", dest_url.into_string());
                image.set_attr("alt", "");
                if !title.is_empty() {
                    image.set_attr("title", title.into_string());
                }
                self.open(image)
            }
            // HTML blocks only wrap Html events; other tags are not enabled
            _ => 0,
        };
        self.opened.push(count);
    }

    fn end(&mut self, tag: TagEnd) {
        if matches!(tag, TagEnd::TableHead) {
            if let Some(table) = self.table.as_mut() {
                table.in_head = false;
            }
        }

        let count = self.opened.pop().unwrap_or(0);
        for _ in 0..count {
            self.close();
        }

        if matches!(tag, TagEnd::Table) {
            self.table = None;
        }
    }

    fn open(&mut self, element: Element) -> usize {
        self.stack.push(element);
        1
    }

    fn close(&mut self) {
        if let Some(mut element) = self.stack.pop() {
            self.finish_element(&mut element);
            self.append(Node::Element(element));
        }
    }

    fn append(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.root.push(node),
        }
    }

    fn open_table_body(&mut self) {
        let Some(table) = self.table.as_mut() else {
            return;
        };
        if table.has_body {
            return;
        }
        table.has_body = true;
        let frame = table.frame;
        if let Some(count) = self.opened.get_mut(frame) {
            *count += 1;
        }
        self.stack.push(Element::new("tbody"));
    }

    fn table_cell(&mut self) -> Element {
        let Some(table) = self.table.as_mut() else {
            return Element::new("td");
        };
        let mut cell = Element::new(if table.in_head { "th" } else { "td" });
        let align = match table.alignments.get(table.cell) {
            Some(Alignment::Left) => Some("left"),
            Some(Alignment::Center) => Some("center"),
            Some(Alignment::Right) => Some("right"),
            _ => None,
        };
        if let Some(align) = align {
            cell.set_attr("style", format!("text-align: {}", align));
        }
        table.cell += 1;
        cell
    }

    /// Fix up an element once all of its children are known.
    fn finish_element(&mut self, element: &mut Element) {
        match element.name.as_str() {
            "img" => {
                let alt = element.text_content();
                element.children.clear();
                element.set_attr("alt", alt);
            }
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" if element.attr("id").is_none() => {
                let id = self.unique_id(&slugify(&element.text_content()));
                element.set_attr("id", id);
            }
            _ => {}
        }
    }

    fn unique_id(&mut self, base: &str) -> String {
        let base = if base.is_empty() { "section" } else { base };
        let mut id = base.to_string();
        let mut n = 1;
        while self.heading_ids.contains(&id) {
            id = format!("{}_{}", base, n);
            n += 1;
        }
        self.heading_ids.insert(id.clone());
        id
    }

    fn finish(mut self) -> Document {
        while !self.stack.is_empty() {
            self.close();
        }
        Document::new(self.root)
    }
}

fn heading_name(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "h1",
        HeadingLevel::H2 => "h2",
        HeadingLevel::H3 => "h3",
        HeadingLevel::H4 => "h4",
        HeadingLevel::H5 => "h5",
        HeadingLevel::H6 => "h6",
    }
}

/// Convert a heading to an anchor id.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter_map(|c| {
            if c.is_alphanumeric() || c == '_' {
                Some(c)
            } else if c.is_whitespace() || c == '-' {
                Some('-')
            } else {
                None
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
