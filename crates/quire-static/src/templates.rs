//! Page templates and placeholder substitution.
//!
//! Templates are plain HTML files in the templates directory, named
//! `<key>.html`. They contain literal `%NAME%` placeholders that are replaced
//! with page values. The navigation placeholder is filled in a second pass,
//! once every page is known.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

/// Placeholders recognized in page templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Version,
    Title,
    Description,
    Keywords,
    Content,
    Navigation,
}

impl Placeholder {
    /// Placeholders filled when a page is rendered, in substitution order.
    pub const PAGE: [Placeholder; 5] = [
        Self::Version,
        Self::Title,
        Self::Description,
        Self::Keywords,
        Self::Content,
    ];

    /// The literal token as written in templates.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Version => "%SITE_VERSION%",
            Self::Title => "%PAGE_TITLE%",
            Self::Description => "%PAGE_DESCRIPTION%",
            Self::Keywords => "%PAGE_KEYWORDS%",
            Self::Content => "%PAGE_CONTENT%",
            Self::Navigation => "%PAGE_NAVIGATION%",
        }
    }
}

/// Values substituted into a page template.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageValues {
    pub version: String,
    pub title: String,
    pub description: String,
    pub keywords: String,
    /// Rendered page body
    pub content: String,
}

impl PageValues {
    fn get(&self, placeholder: Placeholder) -> Option<&str> {
        match placeholder {
            Placeholder::Version => Some(&self.version),
            Placeholder::Title => Some(&self.title),
            Placeholder::Description => Some(&self.description),
            Placeholder::Keywords => Some(&self.keywords),
            Placeholder::Content => Some(&self.content),
            Placeholder::Navigation => None,
        }
    }
}

/// Replace page placeholders in a template.
///
/// Unknown `%NAME%` tokens are left in place, as is the navigation
/// placeholder.
pub fn render(template: &str, values: &PageValues) -> String {
    let mut html = template.to_string();
    for placeholder in Placeholder::PAGE {
        if let Some(value) = values.get(placeholder) {
            html = html.replace(placeholder.token(), value);
        }
    }
    html
}

/// Fill the navigation placeholder of a rendered page.
pub fn render_navigation(page: &str, navigation: &str) -> String {
    page.replace(Placeholder::Navigation.token(), navigation)
}

/// Placeholder-like tokens in a template that are not recognized.
pub fn unknown_placeholders(template: &str) -> Vec<&str> {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    let token = TOKEN.get_or_init(|| Regex::new(r"%[A-Z][A-Z0-9_]*%").unwrap());

    let mut seen = HashSet::new();
    token
        .find_iter(template)
        .map(|m| m.as_str())
        .filter(|t| {
            !Placeholder::PAGE.iter().any(|p| p.token() == *t)
                && *t != Placeholder::Navigation.token()
        })
        .filter(|t| seen.insert(*t))
        .collect()
}

/// Errors that can occur when loading templates.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Invalid template key '{key}': {} does not exist", .path.display())]
    Missing { key: String, path: PathBuf },

    #[error("Failed to read template {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Loads templates from a directory and caches them for the build.
#[derive(Debug)]
pub struct TemplateStore {
    dir: PathBuf,
    default_key: String,
    cache: HashMap<String, String>,
}

impl TemplateStore {
    /// Create a store reading `<dir>/<key>.html`, falling back to `default_key`.
    pub fn new(dir: impl Into<PathBuf>, default_key: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            default_key: default_key.into(),
            cache: HashMap::new(),
        }
    }

    pub fn default_key(&self) -> &str {
        &self.default_key
    }

    /// Get a template by key.
    ///
    /// A missing template falls back to the default one. Only a missing
    /// default template is an error.
    pub fn get(&mut self, key: &str) -> Result<&str, TemplateError> {
        let key = if self.is_available(key) {
            key.to_string()
        } else {
            tracing::debug!(
                "Template '{}' not found, using '{}'",
                key,
                self.default_key
            );
            self.default_key.clone()
        };

        if !self.cache.contains_key(&key) {
            let path = self.path_for(&key);
            if !path.is_file() {
                return Err(TemplateError::Missing { key, path });
            }

            let template = fs::read_to_string(&path)
                .map_err(|source| TemplateError::Read { path, source })?;

            for token in unknown_placeholders(&template) {
                tracing::debug!("Template '{}' has unknown placeholder {}", key, token);
            }

            self.cache.insert(key.clone(), template);
        }

        Ok(self.cache[&key].as_str())
    }

    fn is_available(&self, key: &str) -> bool {
        self.cache.contains_key(key) || self.path_for(key).is_file()
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.html", key))
    }

    /// Directory templates are read from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn values() -> PageValues {
        PageValues {
            version: "3.1".to_string(),
            title: "Home — Docs".to_string(),
            description: "Start here".to_string(),
            keywords: "music, docs".to_string(),
            content: "<h1 id=\"hello\">Hello</h1>\n".to_string(),
        }
    }

    #[test]
    fn renders_known_placeholders() {
        let template = "<title>%PAGE_TITLE%</title><meta name=\"description\" content=\"%PAGE_DESCRIPTION%\"><meta name=\"keywords\" content=\"%PAGE_KEYWORDS%\"><span>v%SITE_VERSION%</span><main>%PAGE_CONTENT%</main>";

        assert_eq!(
            render(template, &values()),
            "<title>Home — Docs</title><meta name=\"description\" content=\"Start here\"><meta name=\"keywords\" content=\"music, docs\"><span>v3.1</span><main><h1 id=\"hello\">Hello</h1>\n</main>"
        );
    }

    #[test]
    fn leaves_navigation_and_unknown_placeholders() {
        let html = render("<nav>%PAGE_NAVIGATION%</nav>%PAGE_AUTHOR%", &values());

        assert_eq!(html, "<nav>%PAGE_NAVIGATION%</nav>%PAGE_AUTHOR%");
        assert_eq!(
            render_navigation(&html, "<a href=\"/index.html\">Home</a>"),
            "<nav><a href=\"/index.html\">Home</a></nav>%PAGE_AUTHOR%"
        );
    }

    #[test]
    fn replaces_every_occurrence() {
        let html = render("%PAGE_TITLE% | %PAGE_TITLE%", &values());

        assert_eq!(html, "Home — Docs | Home — Docs");
    }

    #[test]
    fn finds_unknown_placeholders() {
        let found =
            unknown_placeholders("%PAGE_TITLE% %PAGE_AUTHOR% %PAGE_NAVIGATION% 100% %LICENSE%");

        assert_eq!(found, ["%PAGE_AUTHOR%", "%LICENSE%"]);
    }

    #[test]
    fn reports_each_unknown_placeholder_once() {
        let found = unknown_placeholders("%AUTHOR% %PAGE_TITLE% %LICENSE% %AUTHOR% %LICENSE%");

        assert_eq!(found, ["%AUTHOR%", "%LICENSE%"]);
    }

    #[test]
    fn loads_and_caches_templates() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("article.html"), "article %PAGE_CONTENT%").unwrap();

        let mut store = TemplateStore::new(temp.path(), "article");
        assert_eq!(store.get("article").unwrap(), "article %PAGE_CONTENT%");

        // Cached: later changes on disk are not seen during the build
        fs::write(temp.path().join("article.html"), "changed").unwrap();
        assert_eq!(store.get("article").unwrap(), "article %PAGE_CONTENT%");
    }

    #[test]
    fn loads_named_templates() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("article.html"), "article").unwrap();
        fs::write(temp.path().join("landing.html"), "landing").unwrap();

        let mut store = TemplateStore::new(temp.path(), "article");

        assert_eq!(store.get("landing").unwrap(), "landing");
        assert_eq!(store.get("article").unwrap(), "article");
    }

    #[test]
    fn falls_back_to_default_template() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("article.html"), "default").unwrap();

        let mut store = TemplateStore::new(temp.path(), "article");

        assert_eq!(store.get("nonexistent").unwrap(), "default");
    }

    #[test]
    fn missing_default_is_an_error() {
        let temp = tempdir().unwrap();

        let mut store = TemplateStore::new(temp.path(), "article");

        assert!(matches!(
            store.get("nonexistent"),
            Err(TemplateError::Missing { key, .. }) if key == "article"
        ));
    }
}
