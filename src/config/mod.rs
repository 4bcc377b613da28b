mod cli;
mod file;

pub use cli::{AppsCommand, Cli, Command};

use std::io;
use std::path::PathBuf;

use crate::selection::{self, AppSelection};
use crate::target::TargetPolicy;

use file::FileConfig;

/// Merged configuration from CLI args and TOML file.
#[derive(Debug, Clone)]
pub struct Config {
    pub target: TargetPolicy,
    pub apps_file: PathBuf,
    /// Selected for this run on top of `apps_file`; never written back.
    pub extra_apps: Vec<String>,
}

impl Config {
    /// Load configuration by merging TOML file with CLI overrides.
    ///
    /// A config file named with `--config` must load; files found in the
    /// default locations are skipped with a warning when broken.
    pub fn load(cli: &Cli) -> Result<Self, String> {
        let file_config = match cli.config.as_ref() {
            Some(path) => file::load_from_path(path)?,
            None => file::load_from_default_paths().unwrap_or_default(),
        };
        Self::merge(cli, file_config)
    }

    fn merge(cli: &Cli, file_config: FileConfig) -> Result<Self, String> {
        let apps_file = cli
            .apps_file
            .clone()
            .or(file_config.apps_file)
            .or_else(selection::default_apps_path)
            .ok_or("Cannot determine a configuration directory, pass --apps-file")?;

        let mut extra_apps = file_config.apps;
        extra_apps.extend(cli.apps.iter().cloned());

        Ok(Self {
            target: cli.target.unwrap_or(file_config.target),
            apps_file,
            extra_apps,
        })
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if self.extra_apps.iter().any(|name| name.trim().is_empty()) {
            return Err("Application names must not be empty");
        }
        Ok(())
    }

    /// The selection the translator runs with: the saved file plus extras.
    pub fn load_selection(&self) -> io::Result<AppSelection> {
        let mut selection = AppSelection::load(&self.apps_file)?;
        selection.extend(&self.extra_apps);
        Ok(selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("deep-click").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_overrides_file() {
        let file_config = file::parse(
            r#"
            target = "event-owner"
            apps_file = "/from/file.txt"
            apps = ["Safari"]
            "#,
        )
        .unwrap();
        let cli = cli(&["--target", "frontmost", "--apps-file", "/from/cli.txt", "--app", "Xcode"]);

        let config = Config::merge(&cli, file_config).unwrap();
        assert_eq!(config.target, TargetPolicy::Frontmost);
        assert_eq!(config.apps_file, PathBuf::from("/from/cli.txt"));
        assert_eq!(config.extra_apps, vec!["Safari".to_string(), "Xcode".to_string()]);
    }

    #[test]
    fn test_file_values_apply_without_flags() {
        let file_config = file::parse("target = \"event-owner\"\napps_file = \"/from/file.txt\"").unwrap();
        let config = Config::merge(&cli(&[]), file_config).unwrap();
        assert_eq!(config.target, TargetPolicy::EventOwner);
        assert_eq!(config.apps_file, PathBuf::from("/from/file.txt"));
    }

    #[test]
    fn test_repeated_app_flags() {
        let cli = cli(&["--app", "Safari", "--app", "Google Chrome", "--apps-file", "a.txt"]);
        let config = Config::merge(&cli, FileConfig::default()).unwrap();
        assert_eq!(config.extra_apps.len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_app() {
        let cli = cli(&["--app", "  ", "--apps-file", "a.txt"]);
        let config = Config::merge(&cli, FileConfig::default()).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_target_flag() {
        assert!(Cli::try_parse_from(["deep-click", "--target", "window"]).is_err());
    }

    #[test]
    fn test_load_selection_adds_extras() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("apps.txt");
        std::fs::write(&path, "Safari\n").unwrap();

        let config = Config {
            target: TargetPolicy::Frontmost,
            apps_file: path.clone(),
            extra_apps: vec!["Xcode".into()],
        };
        let selection = config.load_selection().unwrap();
        assert!(selection.contains("Safari"));
        assert!(selection.contains("Xcode"));

        // Extras are not persisted.
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Safari\n");
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let cli = cli(&["--config", missing.to_str().unwrap()]);
        assert!(Config::load(&cli).is_err());
    }
}
