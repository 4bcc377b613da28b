use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::target::TargetPolicy;

const FILE_NAME: &str = "deep-click.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub target: TargetPolicy,
    pub apps_file: Option<PathBuf>,
    /// Applications always selected in addition to the selection file.
    #[serde(default)]
    pub apps: Vec<String>,
}

pub fn parse(content: &str) -> Result<FileConfig, String> {
    toml::from_str(content).map_err(|e| e.to_string())
}

pub fn load_from_path(path: &Path) -> Result<FileConfig, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let config = parse(&content).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

pub fn load_from_default_paths() -> Option<FileConfig> {
    for path in default_config_paths() {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return Some(config),
                Err(e) => log::warn!("{}", e),
            }
        }
    }
    None
}

fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from(FILE_NAME));

    if let Ok(home) = std::env::var("HOME") {
        paths.push(PathBuf::from(home).join(".config").join(FILE_NAME));
    }

    if let Some(dir) = dirs::config_dir() {
        let path = dir.join(FILE_NAME);
        if !paths.contains(&path) {
            paths.push(path);
        }
    }

    paths
}
