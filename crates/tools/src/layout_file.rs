//! TOML tree layout overrides. Missing keys fall back to the default layout.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use grove::TreeLayout;

pub fn parse_layout(source: &str) -> Result<TreeLayout> {
    let layout: TreeLayout = toml::from_str(source).context("Failed to parse tree layout TOML")?;
    layout.validate().context("Tree layout is invalid")?;
    Ok(layout)
}

pub fn load_layout(path: &Path) -> Result<TreeLayout> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read layout file: {}", path.display()))?;
    parse_layout(&source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_remaining_defaults() {
        let layout = parse_layout("rows = 6\nelite_chance = 0.5\n").unwrap();
        assert_eq!(layout.rows, 6);
        assert_eq!(layout.elite_chance, 0.5);
        assert_eq!(layout.columns, TreeLayout::default().columns);
        assert_eq!(layout.main_columns, TreeLayout::default().main_columns);
    }

    #[test]
    fn empty_file_is_the_default_layout() {
        assert_eq!(parse_layout("").unwrap(), TreeLayout::default());
    }

    #[test]
    fn invalid_layouts_are_rejected() {
        assert!(parse_layout("rows = 2\n").is_err());
        assert!(parse_layout("main_columns = []\n").is_err());
        assert!(parse_layout("rows = \"ten\"\n").is_err());
    }
}
