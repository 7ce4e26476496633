//! Static site generator for quire documentation.
//!
//! Builds a documentation site from Markdown files, HTML page templates, and a
//! directory of static assets.

pub mod assets;
pub mod builder;
pub mod navigation;
pub mod templates;

pub use builder::{BuildConfig, BuildContext, BuildError, BuildResult, SiteConfig, StaticBuilder};
pub use navigation::{NavEntry, Navigation};
pub use templates::{PageValues, Placeholder, TemplateError, TemplateStore};
