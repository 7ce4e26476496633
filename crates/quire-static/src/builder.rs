//! Static site builder.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use walkdir::WalkDir;

use quire_md::{parse_doc, Frontmatter, PathRewriter};

use crate::assets::copy_assets;
use crate::navigation::{NavEntry, Navigation};
use crate::templates::{self, PageValues, TemplateError, TemplateStore};

/// Configuration for building a static site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Markdown source directory
    pub source_dir: PathBuf,

    /// Output directory, deleted at the start of every build
    pub output_dir: PathBuf,

    /// Page templates directory
    pub templates_dir: PathBuf,

    /// Static assets copied verbatim into the output
    pub assets_dir: PathBuf,

    /// Prefix for root-relative links, e.g. `/docs`
    pub base_path: String,

    /// Site-wide page defaults
    pub site: SiteConfig,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("src"),
            output_dir: PathBuf::from("out"),
            templates_dir: PathBuf::from("templates"),
            assets_dir: PathBuf::from("assets"),
            base_path: String::new(),
            site: SiteConfig::default(),
        }
    }
}

/// Site-wide values used when a page does not set its own.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub version: String,

    /// Site title, also appended to every page title
    pub title: String,

    pub description: String,

    pub keywords: String,

    /// Template used when a page names none or names a missing one
    pub default_template: String,

    /// Curated order of top-level pages, by file stem
    pub navigation: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            title: "Documentation".to_string(),
            description: "Project documentation.".to_string(),
            keywords: "documentation".to_string(),
            default_template: "article".to_string(),
            navigation: vec!["index".to_string()],
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of pages generated
    pub pages: usize,

    /// Number of asset files copied
    pub assets: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Docs directory not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Output directory {} contains {}", .output.display(), .input.display())]
    OutputContainsSource { output: PathBuf, input: PathBuf },

    #[error("Failed to read {}: {source}", .path.display())]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to walk {}: {source}", .path.display())]
    WalkError {
        path: PathBuf,
        source: walkdir::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    ParseError {
        path: PathBuf,
        source: quire_md::ParseError,
    },

    #[error("Failed to load template: {0}")]
    TemplateError(#[from] TemplateError),

    #[error("Failed to write {}: {source}", .path.display())]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// State shared between the phases of one build.
///
/// Pages are only appended while rendering and only read while writing
/// navigation.
#[derive(Debug)]
pub struct BuildContext {
    pub templates: TemplateStore,
    pub navigation: Navigation,
    /// Output paths of rendered pages, in render order
    pub pages: Vec<PathBuf>,
}

/// Static site builder.
pub struct StaticBuilder {
    config: BuildConfig,
    rewriter: PathRewriter,
}

impl StaticBuilder {
    /// Create a new static builder.
    pub fn new(mut config: BuildConfig) -> Self {
        config.base_path = config.base_path.trim_end_matches('/').to_string();
        let rewriter = PathRewriter::new(config.base_path.clone());

        Self { config, rewriter }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Create the state for a fresh build.
    pub fn context(&self) -> BuildContext {
        BuildContext {
            templates: TemplateStore::new(
                &self.config.templates_dir,
                &self.config.site.default_template,
            ),
            navigation: Navigation::new(&self.config.output_dir, &self.config.base_path)
                .with_order(&self.config.site.navigation),
            pages: Vec::new(),
        }
    }

    /// Build the static site.
    pub fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        tracing::info!("Starting documentation build");

        if !self.config.source_dir.is_dir() {
            return Err(BuildError::SourceNotFound(self.config.source_dir.clone()));
        }
        self.check_output()?;

        self.clear_output();

        let mut ctx = self.context();

        tracing::info!("Rendering pages...");
        self.render_pages(&mut ctx)?;

        tracing::info!("Creating navigation...");
        self.write_navigation(&ctx)?;

        tracing::info!("Copying assets...");
        let assets = copy_assets(&self.config.assets_dir, &self.config.output_dir)?;

        let duration = start.elapsed();

        Ok(BuildResult {
            pages: ctx.pages.len(),
            assets,
            duration_ms: duration.as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Refuse an output directory that would delete the build inputs when cleared.
    fn check_output(&self) -> Result<(), BuildError> {
        let output = resolve_path(&self.config.output_dir);

        for input in [&self.config.source_dir, &self.config.templates_dir] {
            if resolve_path(input).starts_with(&output) {
                return Err(BuildError::OutputContainsSource {
                    output: self.config.output_dir.clone(),
                    input: input.clone(),
                });
            }
        }

        Ok(())
    }

    /// Remove the previous output.
    fn clear_output(&self) {
        tracing::info!("Clearing previous output");

        match fs::remove_dir_all(&self.config.output_dir) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                "Failed to clear {}: {}",
                self.config.output_dir.display(),
                e
            ),
        }
    }

    /// Render every Markdown file, mirroring the source layout.
    fn render_pages(&self, ctx: &mut BuildContext) -> Result<(), BuildError> {
        let source_dir = &self.config.source_dir;

        for entry in WalkDir::new(source_dir)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|source| BuildError::WalkError {
                path: source_dir.clone(),
                source,
            })?;

            let relative = entry
                .path()
                .strip_prefix(source_dir)
                .unwrap_or(entry.path());

            if entry.file_type().is_dir() {
                let out_dir = self.config.output_dir.join(relative);
                fs::create_dir_all(&out_dir).map_err(|source| BuildError::WriteError {
                    path: out_dir.clone(),
                    source,
                })?;
                continue;
            }

            let ext = entry.path().extension().and_then(|e| e.to_str());
            if ext != Some("md") {
                continue;
            }

            let output_path = self.config.output_dir.join(relative).with_extension("html");
            let top_level = entry.depth() == 1;

            self.render_page(ctx, entry.path(), &output_path, top_level)?;
        }

        Ok(())
    }

    /// Render a single page and record it for navigation.
    pub fn render_page(
        &self,
        ctx: &mut BuildContext,
        source: &Path,
        output: &Path,
        top_level: bool,
    ) -> Result<(), BuildError> {
        tracing::info!("Rendering page {} to {}", source.display(), output.display());

        let text = fs::read_to_string(source).map_err(|e| BuildError::ReadError {
            path: source.to_path_buf(),
            source: e,
        })?;

        let doc = parse_doc(&text).map_err(|e| BuildError::ParseError {
            path: source.to_path_buf(),
            source: e,
        })?;

        let meta = doc.meta();
        let content = self.rewriter.rewrite(doc.document).to_html();

        let template_key = meta
            .template()
            .unwrap_or(&self.config.site.default_template);
        let template = ctx.templates.get(template_key)?;

        let html = templates::render(template, &self.page_values(&meta, content));

        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent).map_err(|e| BuildError::WriteError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        fs::write(output, html).map_err(|e| BuildError::WriteError {
            path: output.to_path_buf(),
            source: e,
        })?;

        ctx.pages.push(output.to_path_buf());

        // Only top-level pages with a title show up in the navigation
        if top_level {
            if let (Some(title), Some(key)) = (
                meta.title(),
                output.file_stem().and_then(|s| s.to_str()),
            ) {
                ctx.navigation.register(
                    key,
                    NavEntry {
                        output_path: output.to_path_buf(),
                        title: title.to_string(),
                    },
                );
            }
        }

        Ok(())
    }

    /// Template values for a page, falling back to the site defaults.
    fn page_values(&self, meta: &Frontmatter, content: String) -> PageValues {
        let site = &self.config.site;

        PageValues {
            version: site.version.clone(),
            title: meta
                .title()
                .map(|title| format!("{} — {}", title, site.title))
                .unwrap_or_else(|| site.title.clone()),
            description: meta
                .description()
                .unwrap_or(&site.description)
                .to_string(),
            keywords: meta.keywords().unwrap_or(&site.keywords).to_string(),
            content,
        }
    }

    /// Fill the navigation placeholder on every rendered page.
    fn write_navigation(&self, ctx: &BuildContext) -> Result<(), BuildError> {
        for page in &ctx.pages {
            tracing::info!("Creating navigation on page {}", page.display());

            let text = fs::read_to_string(page).map_err(|e| BuildError::ReadError {
                path: page.clone(),
                source: e,
            })?;

            let navigation = ctx.navigation.render(page);
            let html = templates::render_navigation(&text, &navigation);

            fs::write(page, html).map_err(|e| BuildError::WriteError {
                path: page.clone(),
                source: e,
            })?;
        }

        Ok(())
    }
}

/// Absolute form of `path` with `.`, `..` and symlinks resolved.
///
/// Trailing components that do not exist yet are appended to the nearest
/// existing ancestor.
fn resolve_path(path: &Path) -> PathBuf {
    let mut existing = path;
    let mut missing = Vec::new();

    loop {
        let candidate = if existing.as_os_str().is_empty() {
            Path::new(".")
        } else {
            existing
        };
        if let Ok(canonical) = candidate.canonicalize() {
            return missing
                .iter()
                .rev()
                .fold(canonical, |resolved, name| resolved.join(name));
        }

        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name);
                existing = parent;
            }
            _ => return path.to_path_buf(),
        }
    }
}
