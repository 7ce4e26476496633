//! Static asset copying.

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::builder::BuildError;

/// Copy every file under `assets_dir` into `output_dir`, keeping the layout.
///
/// Returns the number of files copied. A missing assets directory copies
/// nothing.
pub fn copy_assets(assets_dir: &Path, output_dir: &Path) -> Result<usize, BuildError> {
    if !assets_dir.exists() {
        tracing::debug!("No assets directory at {}", assets_dir.display());
        return Ok(0);
    }

    let mut copied = 0;

    for entry in WalkDir::new(assets_dir).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|source| BuildError::WalkError {
            path: assets_dir.to_path_buf(),
            source,
        })?;

        let relative = entry
            .path()
            .strip_prefix(assets_dir)
            .unwrap_or(entry.path());
        let target = output_dir.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|source| BuildError::WriteError {
                path: target.clone(),
                source,
            })?;
            continue;
        }

        tracing::info!(
            "Copying asset {} to {}",
            entry.path().display(),
            target.display()
        );

        fs::copy(entry.path(), &target).map_err(|source| BuildError::WriteError {
            path: target.clone(),
            source,
        })?;
        copied += 1;
    }

    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn copies_nested_assets_verbatim() {
        let temp = tempdir().unwrap();
        let assets = temp.path().join("assets");
        let out = temp.path().join("out");
        fs::create_dir_all(assets.join("images/icons")).unwrap();
        fs::create_dir_all(&out).unwrap();
        fs::write(assets.join("style.css"), "body { margin: 0; }").unwrap();
        fs::write(assets.join("images/icons/play.svg"), [0u8, 159, 146, 150]).unwrap();

        let copied = copy_assets(&assets, &out).unwrap();

        assert_eq!(copied, 2);
        assert_eq!(
            fs::read_to_string(out.join("style.css")).unwrap(),
            "body { margin: 0; }"
        );
        assert_eq!(
            fs::read(out.join("images/icons/play.svg")).unwrap(),
            [0u8, 159, 146, 150]
        );
    }

    #[test]
    fn missing_assets_directory_copies_nothing() {
        let temp = tempdir().unwrap();

        let copied = copy_assets(&temp.path().join("assets"), temp.path()).unwrap();

        assert_eq!(copied, 0);
    }
}
