//! Static site build command.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use quire_static::{BuildConfig, SiteConfig, StaticBuilder};
use serde::Deserialize;

/// Configuration file structure (docs.toml).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub docs: DocsConfig,
    #[serde(default)]
    pub site: SiteSettings,
}

#[derive(Debug, Deserialize)]
pub struct DocsConfig {
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_templates")]
    pub templates: String,
    #[serde(default = "default_assets")]
    pub assets: String,
    /// Prefix for root-relative links
    #[serde(default)]
    pub base_path: String,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            output: default_output(),
            templates: default_templates(),
            assets: default_assets(),
            base_path: String::new(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct SiteSettings {
    version: Option<String>,
    title: Option<String>,
    description: Option<String>,
    keywords: Option<String>,
    default_template: Option<String>,
    /// Curated order of top-level pages
    navigation: Option<Vec<String>>,
}

fn default_source() -> String {
    "src".to_string()
}
fn default_output() -> String {
    "out".to_string()
}
fn default_templates() -> String {
    "templates".to_string()
}
fn default_assets() -> String {
    "assets".to_string()
}

impl ConfigFile {
    /// Merge file settings over the builder defaults.
    ///
    /// Relative directories are resolved against `root`, the directory that
    /// holds the config file.
    pub fn into_build_config(self, root: &Path) -> BuildConfig {
        let defaults = SiteConfig::default();
        let site = self.site;

        BuildConfig {
            source_dir: root.join(self.docs.source),
            output_dir: root.join(self.docs.output),
            templates_dir: root.join(self.docs.templates),
            assets_dir: root.join(self.docs.assets),
            base_path: self.docs.base_path,
            site: SiteConfig {
                version: site.version.unwrap_or(defaults.version),
                title: site.title.unwrap_or(defaults.title),
                description: site.description.unwrap_or(defaults.description),
                keywords: site.keywords.unwrap_or(defaults.keywords),
                default_template: site.default_template.unwrap_or(defaults.default_template),
                navigation: site.navigation.unwrap_or(defaults.navigation),
            },
        }
    }
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        return Ok(config);
    }
    tracing::debug!("No config at {}, using defaults", path.display());
    Ok(ConfigFile::default())
}

/// Run the build command.
pub fn run(config_path: &Path, output: Option<PathBuf>, base_path: Option<String>) -> Result<()> {
    let root = config_path.parent().unwrap_or(Path::new(""));
    let mut config = load_config(config_path)?.into_build_config(root);

    if let Some(output) = output {
        config.output_dir = output;
    }
    if let Some(base_path) = base_path {
        config.base_path = base_path;
    }

    let result = StaticBuilder::new(config).build()?;

    tracing::info!(
        "Built {} pages and copied {} assets in {}ms",
        result.pages,
        result.assets,
        result.duration_ms
    );

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
