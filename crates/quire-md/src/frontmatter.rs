//! Front matter extraction and parsing.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Deserializer};

/// Parsed front matter from a Markdown file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Frontmatter {
    /// Page title
    #[serde(default)]
    pub title: Option<String>,

    /// Page description for SEO
    #[serde(default)]
    pub description: Option<String>,

    /// Page keywords, a list is joined with ", "
    #[serde(default, deserialize_with = "deserialize_keywords")]
    pub keywords: Option<String>,

    /// Name of the page template to use
    #[serde(default)]
    pub template: Option<String>,
}

impl Frontmatter {
    pub fn title(&self) -> Option<&str> {
        non_empty(&self.title)
    }

    pub fn description(&self) -> Option<&str> {
        non_empty(&self.description)
    }

    pub fn keywords(&self) -> Option<&str> {
        non_empty(&self.keywords)
    }

    pub fn template(&self) -> Option<&str> {
        non_empty(&self.template)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn deserialize_keywords<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Keywords {
        One(String),
        Many(Vec<String>),
    }

    Ok(
        Option::<Keywords>::deserialize(deserializer)?.map(|keywords| match keywords {
            Keywords::One(value) => value,
            Keywords::Many(values) => values.join(", "),
        }),
    )
}

/// Extract front matter from Markdown content.
///
/// Two forms are accepted: a YAML block fenced by `---` lines, and a bare
/// `key: value` header that ends at the first blank line. A bare header that
/// does not look like metadata is left in the content.
///
/// Returns the parsed front matter and the remaining content after it.
pub fn extract_frontmatter(source: &str) -> Result<(Option<Frontmatter>, &str), FrontmatterError> {
    let trimmed = source.trim_start();

    if trimmed.starts_with("---") {
        return extract_fenced(trimmed);
    }

    Ok(match extract_header(trimmed) {
        Some((frontmatter, remaining)) => (Some(frontmatter), remaining),
        None => (None, source),
    })
}

fn extract_fenced(trimmed: &str) -> Result<(Option<Frontmatter>, &str), FrontmatterError> {
    // Find the closing ---
    let after_open = &trimmed[3..];
    let Some(close_pos) = after_open.find("\n---") else {
        return Err(FrontmatterError::Unclosed);
    };

    let yaml_content = after_open[..close_pos].trim();
    let remaining = &after_open[close_pos + 4..];

    let frontmatter = if yaml_content.is_empty() {
        Frontmatter::default()
    } else {
        serde_yaml::from_str(yaml_content)
            .map_err(|e| FrontmatterError::InvalidYaml(e.to_string()))?
    };

    Ok((Some(frontmatter), remaining.trim_start()))
}

fn extract_header(trimmed: &str) -> Option<(Frontmatter, &str)> {
    static HEADER_LINE: OnceLock<Regex> = OnceLock::new();
    let header_line = HEADER_LINE
        .get_or_init(|| Regex::new(r"^([A-Za-z][A-Za-z0-9_-]*):(?:\s+(.*))?$").unwrap());

    let end = blank_line(trimmed).unwrap_or(trimmed.len());
    let header = &trimmed[..end];

    // Values are taken verbatim; indented lines continue the previous value
    let mut fields: Vec<(String, String)> = Vec::new();
    for line in header.lines() {
        if let Some(caps) = header_line.captures(line) {
            let value = caps.get(2).map_or("", |m| m.as_str().trim());
            fields.push((caps[1].to_lowercase(), value.to_string()));
        } else if line.starts_with(|c: char| c == ' ' || c == '\t') {
            let (_, value) = fields.last_mut()?;
            if !value.is_empty() {
                value.push(' ');
            }
            value.push_str(line.trim());
        } else {
            return None;
        }
    }

    let mut frontmatter = Frontmatter::default();
    let mut known = false;
    for (key, value) in fields {
        let slot = match key.as_str() {
            "title" => &mut frontmatter.title,
            "description" => &mut frontmatter.description,
            "keywords" => &mut frontmatter.keywords,
            "template" => &mut frontmatter.template,
            _ => continue,
        };
        *slot = Some(value);
        known = true;
    }
    if !known {
        return None;
    }

    Some((frontmatter, trimmed[end..].trim_start()))
}

/// Byte offset of the first blank line, if any.
fn blank_line(text: &str) -> Option<usize> {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if line.trim().is_empty() {
            return Some(offset);
        }
        offset += line.len();
    }
    None
}

/// Errors that can occur when parsing front matter.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("Unclosed frontmatter block - missing closing ---")]
    Unclosed,

    #[error("Invalid YAML in frontmatter: {0}")]
    InvalidYaml(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_fenced_frontmatter() {
        let source = r#"---
title: "Home"
description: Start here
template: landing
---

# Hello
"#;

        let (fm, content) = extract_frontmatter(source).unwrap();
        let fm = fm.unwrap();

        assert_eq!(fm.title(), Some("Home"));
        assert_eq!(fm.description(), Some("Start here"));
        assert_eq!(fm.template(), Some("landing"));
        assert_eq!(fm.keywords(), None);
        assert!(content.starts_with("# Hello"));
    }

    #[test]
    fn extracts_bare_header() {
        let source = "title: Notes\nkeywords: notes, patterns\n\nSome text.\n";

        let (fm, content) = extract_frontmatter(source).unwrap();
        let fm = fm.unwrap();

        assert_eq!(fm.title(), Some("Notes"));
        assert_eq!(fm.keywords(), Some("notes, patterns"));
        assert_eq!(content, "Some text.\n");
    }

    #[test]
    fn bare_header_keys_ignore_case() {
        let source = "Title: Shortcuts\nTemplate: wide\n\n# Keys";

        let (fm, content) = extract_frontmatter(source).unwrap();
        let fm = fm.unwrap();

        assert_eq!(fm.title(), Some("Shortcuts"));
        assert_eq!(fm.template(), Some("wide"));
        assert_eq!(content, "# Keys");
    }

    #[test]
    fn bare_header_values_are_verbatim() {
        let source = "title: Notes: the basics\ntemplate: wide\n\nBody\n";

        let (fm, content) = extract_frontmatter(source).unwrap();
        let fm = fm.unwrap();

        assert_eq!(fm.title(), Some("Notes: the basics"));
        assert_eq!(fm.template(), Some("wide"));
        assert_eq!(content, "Body\n");
    }

    #[test]
    fn bare_header_keeps_scalar_looking_values_as_text() {
        let source = "title: 2024\ndescription: yes\n\nBody\n";

        let (fm, content) = extract_frontmatter(source).unwrap();
        let fm = fm.unwrap();

        assert_eq!(fm.title(), Some("2024"));
        assert_eq!(fm.description(), Some("yes"));
        assert_eq!(content, "Body\n");
    }

    #[test]
    fn bare_header_continues_indented_lines() {
        let source = "Title: Patterns\nDescription: How patterns\n    are chained\n\n# Body";

        let (fm, content) = extract_frontmatter(source).unwrap();
        let fm = fm.unwrap();

        assert_eq!(fm.title(), Some("Patterns"));
        assert_eq!(fm.description(), Some("How patterns are chained"));
        assert_eq!(content, "# Body");
    }

    #[test]
    fn leaves_prose_that_looks_like_a_header() {
        let source = "Note: this is just a paragraph.\n\nMore text.";

        let (fm, content) = extract_frontmatter(source).unwrap();

        assert!(fm.is_none());
        assert_eq!(content, source);
    }

    #[test]
    fn joins_keyword_lists() {
        let source = "---\nkeywords: [music, sequencer]\n---\nBody";

        let (fm, _) = extract_frontmatter(source).unwrap();

        assert_eq!(fm.unwrap().keywords(), Some("music, sequencer"));
    }

    #[test]
    fn blank_values_count_as_missing() {
        let source = "---\ntitle: \"  \"\ntemplate: \"\"\n---\nBody";

        let (fm, _) = extract_frontmatter(source).unwrap();
        let fm = fm.unwrap();

        assert_eq!(fm.title(), None);
        assert_eq!(fm.template(), None);
    }

    #[test]
    fn accepts_empty_fenced_block() {
        let (fm, content) = extract_frontmatter("---\n---\n# Title").unwrap();

        assert_eq!(fm, Some(Frontmatter::default()));
        assert_eq!(content, "# Title");
    }

    #[test]
    fn handles_no_frontmatter() {
        let source = "# Just Markdown\n\nNo frontmatter here.";

        let (fm, content) = extract_frontmatter(source).unwrap();

        assert!(fm.is_none());
        assert_eq!(content, source);
    }

    #[test]
    fn errors_on_unclosed_frontmatter() {
        let source = "---\ntitle: Test\n# No closing";

        let result = extract_frontmatter(source);

        assert!(matches!(result, Err(FrontmatterError::Unclosed)));
    }

    #[test]
    fn errors_on_invalid_yaml() {
        let source = "---\ntitle: [invalid yaml\n---\n";

        let result = extract_frontmatter(source);

        assert!(matches!(result, Err(FrontmatterError::InvalidYaml(_))));
    }
}
