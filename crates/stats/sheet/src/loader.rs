//! Sheet loader for RON files.

use std::path::Path;

use anyhow::Context;

use crate::format::SheetSpec;
use crate::sheet::Sheet;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Loader for character sheets stored as RON.
pub struct SheetLoader;

impl SheetLoader {
    /// Load and build a sheet from a RON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the RON file containing a `SheetSpec`
    pub fn load(path: &Path) -> LoadResult<Sheet> {
        let content = read_file(path)?;
        let sheet = Self::parse(&content)
            .with_context(|| format!("Failed to load sheet {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            stats = sheet.stats().len(),
            totals = sheet.totals().len(),
            "sheet loaded"
        );
        Ok(sheet)
    }

    /// Build a sheet from RON source.
    pub fn parse(content: &str) -> LoadResult<Sheet> {
        let spec: SheetSpec = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse sheet RON: {}", e))?;
        Sheet::build(&spec)
    }

    /// Write the current state of `sheet` to `path`.
    pub fn save(path: &Path, sheet: &Sheet) -> LoadResult<()> {
        let content = Self::render(sheet)?;
        std::fs::write(path, content)
            .map_err(|e| anyhow::anyhow!("Failed to write file {}: {}", path.display(), e))?;

        tracing::info!(path = %path.display(), "sheet saved");
        Ok(())
    }

    /// Render `sheet` as pretty RON.
    pub fn render(sheet: &Sheet) -> LoadResult<String> {
        ron::ser::to_string_pretty(&sheet.to_spec(), ron::ser::PrettyConfig::default())
            .map_err(|e| anyhow::anyhow!("Failed to serialize sheet RON: {}", e))
    }
}

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
