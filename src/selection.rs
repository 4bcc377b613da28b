//! The set of applications force clicks are translated in.
//!
//! Stored as a plain text file, one application name per line. The
//! translator only ever sees the read-only [`TargetSelection`] view.

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

/// Applications selected when no selection file exists yet.
pub const DEFAULT_APPS: &[&str] = &["Google Chrome"];

/// Membership test consulted by the translator for every pressure event.
pub trait TargetSelection {
    fn is_selected(&self, app: &str) -> bool;
}

/// Selected application names. Sorted, no duplicates, no blank entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppSelection {
    apps: BTreeSet<String>,
}

impl AppSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        Self::from_names(DEFAULT_APPS.iter().copied())
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selection = Self::new();
        selection.extend(names);
        selection
    }

    /// Parse newline-delimited names. Blank lines are skipped.
    pub fn parse(content: &str) -> Self {
        Self::from_names(content.lines())
    }

    pub fn to_file_contents(&self) -> String {
        let mut out = String::new();
        for app in &self.apps {
            out.push_str(app);
            out.push('\n');
        }
        out
    }

    /// Load from `path`. A missing file yields [`AppSelection::with_defaults`].
    pub fn load(path: &Path) -> io::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let selection = Self::parse(&content);
                log::debug!("Loaded {} application(s) from {}", selection.len(), path.display());
                Ok(selection)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("{} not found, using default applications", path.display());
                Ok(Self::with_defaults())
            }
            Err(e) => Err(e),
        }
    }

    /// Write the selection to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, self.to_file_contents())
    }

    /// Returns false when the name was blank or already selected.
    pub fn insert(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.apps.insert(name.to_string())
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.apps.remove(name.trim())
    }

    /// Flip membership of `name`. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, name: &str) -> bool {
        if self.remove(name) {
            false
        } else {
            self.insert(name)
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.apps.contains(name.trim())
    }

    pub fn extend<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.insert(name.as_ref());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.apps.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }
}

impl TargetSelection for AppSelection {
    fn is_selected(&self, app: &str) -> bool {
        self.contains(app)
    }
}

/// Default selection file: `<config dir>/deep-click/apps.txt`.
pub fn default_apps_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("deep-click").join("apps.txt"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_blank_lines_and_duplicates() {
        let selection = AppSelection::parse("Safari\n\n  Google Chrome  \nSafari\n\r\n");
        assert_eq!(selection.len(), 2);
        assert!(selection.is_selected("Safari"));
        assert!(selection.is_selected("Google Chrome"));
        assert!(!selection.is_selected(""));
    }

    #[test]
    fn test_file_contents_are_sorted() {
        let selection = AppSelection::from_names(["Zed", "Arc", "Mail"]);
        assert_eq!(selection.to_file_contents(), "Arc\nMail\nZed\n");
    }

    #[test]
    fn test_toggle() {
        let mut selection = AppSelection::new();
        assert!(selection.toggle("Safari"));
        assert!(selection.contains("Safari"));
        assert!(!selection.toggle("Safari"));
        assert!(selection.is_empty());
        assert!(!selection.toggle("   "));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let selection = AppSelection::load(&dir.path().join("apps.txt")).unwrap();
        assert_eq!(selection, AppSelection::with_defaults());
        assert!(selection.is_selected("Google Chrome"));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("apps.txt");

        let mut selection = AppSelection::new();
        selection.insert("Safari");
        selection.insert("Xcode");
        selection.save(&path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Safari\nXcode\n");
        assert_eq!(AppSelection::load(&path).unwrap(), selection);
    }

    #[test]
    fn test_empty_file_means_nothing_selected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("apps.txt");
        std::fs::write(&path, "").unwrap();
        assert!(AppSelection::load(&path).unwrap().is_empty());
    }
}
