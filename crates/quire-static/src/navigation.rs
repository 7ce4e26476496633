//! Top-level page navigation.

use std::path::{Path, PathBuf};

use quire_md::tree::{escape_attr, escape_html};

/// A rendered top-level page shown in the navigation.
#[derive(Debug, Clone, PartialEq)]
pub struct NavEntry {
    /// Path of the generated HTML file
    pub output_path: PathBuf,
    /// Display title
    pub title: String,
}

/// Ordered list of top-level pages.
///
/// Curated keys keep their configured position even before the page is
/// rendered. Pages that were not curated are appended in the order they are
/// registered. Keys without a rendered page are skipped when rendering.
#[derive(Debug, Clone, Default)]
pub struct Navigation {
    output_dir: PathBuf,
    base_path: String,
    entries: Vec<(String, Option<NavEntry>)>,
}

impl Navigation {
    /// Create a navigation list for pages under `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>, base_path: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            base_path: base_path.into(),
            entries: Vec::new(),
        }
    }

    /// Reserve positions for curated keys, in order.
    pub fn with_order<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for key in keys {
            let key = key.into();
            if !self.entries.iter().any(|(k, _)| *k == key) {
                self.entries.push((key, None));
            }
        }
        self
    }

    /// Record a rendered page under `key`.
    pub fn register(&mut self, key: impl Into<String>, entry: NavEntry) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = Some(entry),
            None => self.entries.push((key, Some(entry))),
        }
    }

    /// Rendered entries in display order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &NavEntry)> {
        self.entries
            .iter()
            .filter_map(|(key, entry)| entry.as_ref().map(|e| (key.as_str(), e)))
    }

    /// Site URL of a generated page.
    pub fn url(&self, output_path: &Path) -> String {
        let relative = output_path
            .strip_prefix(&self.output_dir)
            .unwrap_or(output_path);

        let url = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        format!("{}/{}", self.base_path, url.replace('\\', "/"))
    }

    /// Render the navigation fragment for the page at `current`.
    pub fn render(&self, current: &Path) -> String {
        let mut html = String::new();
        for (_, entry) in self.entries() {
            let class = if entry.output_path.as_path() == current {
                "navigation-item active"
            } else {
                "navigation-item"
            };
            html.push_str(&format!(
                "<a href=\"{}\" class=\"{}\">{}</a>\n",
                escape_attr(&self.url(&entry.output_path)),
                class,
                escape_html(&entry.title)
            ));
        }
        html
    }
}
