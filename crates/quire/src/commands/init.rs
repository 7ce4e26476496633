//! Create a starter documentation project.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing quire...");

    let root = config_path.parent().unwrap_or(Path::new(""));

    write_file(config_path, DEFAULT_CONFIG, yes)?;
    write_file(&root.join("src/index.md"), DEFAULT_INDEX, yes)?;
    write_file(&root.join("src/overview.md"), DEFAULT_OVERVIEW, yes)?;
    write_file(&root.join("templates/article.html"), DEFAULT_TEMPLATE, yes)?;
    write_file(&root.join("assets/styles/main.css"), DEFAULT_CSS, yes)?;

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'quire build' to generate the site.");

    Ok(())
}

/// Write a scaffold file unless it already exists.
fn write_file(path: &Path, content: &str, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        tracing::warn!(
            "{} already exists. Use --yes to overwrite.",
            path.display()
        );
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Created {}", path.display());

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# Quire Configuration

[docs]
# Markdown sources
source = "src"

# Output directory for the built site (deleted on every build)
output = "out"

# Page templates, one <name>.html per template
templates = "templates"

# Static files copied as-is into the output
assets = "assets"

# Prefix for root-relative links, e.g. "/docs" when deployed under /docs/
base_path = ""

[site]
version = "1.0"
title = "My Documentation"
description = "Documentation for my project."
keywords = "documentation"
default_template = "article"

# Order of top-level pages; other top-level pages follow in file name order
navigation = ["index", "overview"]
"#;

const DEFAULT_INDEX: &str = r#"---
title: Welcome
description: Start here.
---

# Welcome

This site is built by **quire** from the Markdown files in `src/`.

Read the [overview](/overview.html) next.
"#;

const DEFAULT_OVERVIEW: &str = r#"---
title: Overview
---

# Overview

Every `.md` file under `src/` becomes an `.html` page with the same path.
Pages directly in `src/` that have a title are listed in the navigation.

| Front matter  | Used for                         |
|---------------|----------------------------------|
| `title`       | Page title and navigation label  |
| `description` | Meta description                 |
| `keywords`    | Meta keywords                    |
| `template`    | Template name in `templates/`    |
"#;

const DEFAULT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>%PAGE_TITLE%</title>
  <meta name="description" content="%PAGE_DESCRIPTION%">
  <meta name="keywords" content="%PAGE_KEYWORDS%">
  <link rel="stylesheet" href="/styles/main.css">
</head>
<body>
  <header class="header">
    <nav class="navigation">
%PAGE_NAVIGATION%
    </nav>
  </header>
  <main id="_content" class="content">
%PAGE_CONTENT%
  </main>
  <footer class="footer">Version %SITE_VERSION%</footer>
</body>
</html>
"#;

const DEFAULT_CSS: &str = r#"body {
  margin: 0;
  font-family: system-ui, sans-serif;
  line-height: 1.6;
}

.header {
  position: sticky;
  top: 0;
  background: #1d3557;
}

.navigation-item {
  display: inline-block;
  padding: 0.75rem 1rem;
  color: #f1faee;
  text-decoration: none;
}

.navigation-item.active {
  background: #457b9d;
}

.content {
  max-width: 800px;
  margin: 0 auto;
  padding: 1rem;
}
"#;
