use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "filepane.toml";

const MIN_SCREEN_WIDTH: u16 = 40;

#[derive(Debug, Default, Deserialize)]
pub struct FilepaneConfig {
    #[serde(default)]
    pub screen: ScreenConfig,
    #[serde(default)]
    pub tree: TreeConfig,
    #[serde(default)]
    pub commands: CommandConfig,
}

#[derive(Debug, Deserialize)]
pub struct ScreenConfig {
    #[serde(default = "default_width")]
    pub width: u16,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
        }
    }
}

fn default_width() -> u16 {
    120
}

#[derive(Debug, Deserialize)]
pub struct TreeConfig {
    #[serde(default = "default_page_lines")]
    pub page_lines: u16,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            page_lines: default_page_lines(),
        }
    }
}

fn default_page_lines() -> u16 {
    16
}

#[derive(Debug, Default, Deserialize)]
pub struct CommandConfig {
    /// Lowercase the whole input line, arguments included.
    #[serde(default)]
    pub fold_case: bool,
}

impl FilepaneConfig {
    pub fn parse(content: &str) -> Result<Self> {
        let config: FilepaneConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            self.screen.width >= MIN_SCREEN_WIDTH,
            "screen.width must be at least {} (got {})",
            MIN_SCREEN_WIDTH,
            self.screen.width
        );
        ensure!(
            self.tree.page_lines >= 1,
            "tree.page_lines must be at least 1"
        );
        Ok(())
    }
}

/// Loads the explicit config file, or the nearest `filepane.toml` above
/// `start_dir`. Returns the defaults when neither exists.
pub fn load(
    explicit: Option<&Path>,
    start_dir: &Path,
) -> Result<(FilepaneConfig, Option<PathBuf>)> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match find_config_path(start_dir) {
            Some(path) => path,
            None => return Ok((FilepaneConfig::default(), None)),
        },
    };

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let config = FilepaneConfig::parse(&content)
        .with_context(|| format!("Failed to parse config: {}", path.display()))?;
    Ok((config, Some(path)))
}

fn find_config_path(start_dir: &Path) -> Option<PathBuf> {
    let mut current = Some(start_dir);
    while let Some(dir) = current {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        current = dir.parent();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = FilepaneConfig::parse("").unwrap();
        assert_eq!(config.screen.width, 120);
        assert_eq!(config.tree.page_lines, 16);
        assert!(!config.commands.fold_case);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = FilepaneConfig::parse("[tree]\npage_lines = 4\n").unwrap();
        assert_eq!(config.tree.page_lines, 4);
        assert_eq!(config.screen.width, 120);
    }

    #[test]
    fn fold_case_flag_is_read() {
        let config = FilepaneConfig::parse("[commands]\nfold_case = true\n").unwrap();
        assert!(config.commands.fold_case);
    }

    #[test]
    fn rejects_zero_page_lines() {
        assert!(FilepaneConfig::parse("[tree]\npage_lines = 0\n").is_err());
    }

    #[test]
    fn rejects_narrow_screen() {
        let err = FilepaneConfig::parse("[screen]\nwidth = 10\n").unwrap_err();
        assert!(err.to_string().contains("screen.width"));
    }
}
