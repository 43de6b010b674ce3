// Config module for shared configuration utilities
//
// Settings come from three layers, later ones winning:
// built-in defaults, an optional mcman.toml in the working directory, and
// command-line flags.

use crate::constants;
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub fn config_dir() -> PathBuf {
    PathBuf::from(std::env::var("MCMAN_DIR").unwrap_or_else(|_| ".".to_string()))
}

pub fn plugins_dir() -> PathBuf {
    config_dir().join(constants::PLUGINS_DIR)
}

pub fn config_path() -> PathBuf {
    config_dir().join(constants::CONFIG_FILE)
}

/// Optional mcman.toml contents
#[derive(Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub user_agent: Option<String>,
    pub server_base_url: Option<String>,
    pub plugin_base_url: Option<String>,
    pub minecraft_version: Option<String>,
}

impl FileConfig {
    /// Load the config file at `path`, or defaults when it does not exist
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            debug!("No config file at {}", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text)
            .map_err(|e| anyhow::anyhow!("Invalid config file {}: {}", path.display(), e))
    }
}

/// How many entries a listing shows, and from which end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    Head(usize),
    Tail(usize),
}

impl Default for Listing {
    fn default() -> Self {
        Listing::Head(constants::DEFAULT_LISTING_SIZE)
    }
}

impl Listing {
    pub fn from_flags(head: Option<usize>, tail: Option<usize>) -> Self {
        match (head, tail) {
            (_, Some(n)) => Listing::Tail(n),
            (Some(n), None) => Listing::Head(n),
            (None, None) => Listing::default(),
        }
    }

    /// The window of `items` this listing shows
    pub fn apply<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        match *self {
            Listing::Head(n) => &items[..n.min(items.len())],
            Listing::Tail(n) => &items[items.len().saturating_sub(n)..],
        }
    }
}

/// Effective settings for one invocation
#[derive(Debug, Clone)]
pub struct Settings {
    pub user_agent: String,
    pub listing: Listing,
    pub server_base_url: String,
    pub plugin_base_url: String,
    pub minecraft_version: Option<String>,
}

/// Values given on the command line; None means "not given"
#[derive(Debug, Default)]
pub struct Overrides {
    pub user_agent: Option<String>,
    pub head: Option<usize>,
    pub tail: Option<usize>,
    pub plugin_base_url: Option<String>,
    pub minecraft_version: Option<String>,
}

impl Settings {
    pub fn resolve(file: FileConfig, overrides: Overrides) -> Self {
        Self {
            user_agent: overrides
                .user_agent
                .or(file.user_agent)
                .unwrap_or_else(|| constants::DEFAULT_USER_AGENT.to_string()),
            listing: Listing::from_flags(overrides.head, overrides.tail),
            server_base_url: with_trailing_slash(
                file.server_base_url
                    .unwrap_or_else(|| constants::DEFAULT_SERVER_BASE_URL.to_string()),
            ),
            plugin_base_url: with_trailing_slash(
                overrides
                    .plugin_base_url
                    .or(file.plugin_base_url)
                    .unwrap_or_else(|| constants::DEFAULT_PLUGIN_BASE_URL.to_string()),
            ),
            minecraft_version: overrides.minecraft_version.or(file.minecraft_version),
        }
    }
}

fn with_trailing_slash(url: String) -> String {
    if url.ends_with('/') {
        url
    } else {
        format!("{}/", url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_listing_window() {
        let items = [1, 2, 3, 4, 5];
        assert_eq!(Listing::Head(2).apply(&items), &[1, 2]);
        assert_eq!(Listing::Tail(2).apply(&items), &[4, 5]);
        assert_eq!(Listing::Head(10).apply(&items), &items);
        assert_eq!(Listing::Tail(10).apply(&items), &items);
        assert!(Listing::Head(0).apply(&items).is_empty());
    }

    #[test]
    fn test_listing_from_flags() {
        assert_eq!(Listing::from_flags(None, None), Listing::Head(80));
        assert_eq!(Listing::from_flags(Some(10), None), Listing::Head(10));
        assert_eq!(Listing::from_flags(None, Some(3)), Listing::Tail(3));
    }

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::resolve(FileConfig::default(), Overrides::default());
        assert_eq!(settings.user_agent, constants::DEFAULT_USER_AGENT);
        assert_eq!(settings.plugin_base_url, "https://api.modrinth.com/v2/");
        assert_eq!(settings.server_base_url, "https://api.papermc.io/v2/");
        assert_eq!(settings.minecraft_version, None);
    }

    #[test]
    fn test_flags_override_file() {
        let file = FileConfig {
            user_agent: Some("from-file".to_string()),
            server_base_url: Some("http://localhost:8080/v2".to_string()),
            plugin_base_url: Some("http://localhost:9000".to_string()),
            minecraft_version: Some("1.20.4".to_string()),
        };
        let overrides = Overrides {
            user_agent: Some("from-flag".to_string()),
            plugin_base_url: Some("http://example.com/api".to_string()),
            ..Default::default()
        };

        let settings = Settings::resolve(file, overrides);
        assert_eq!(settings.user_agent, "from-flag");
        assert_eq!(settings.server_base_url, "http://localhost:8080/v2/");
        assert_eq!(settings.plugin_base_url, "http://example.com/api/");
        assert_eq!(settings.minecraft_version.as_deref(), Some("1.20.4"));
    }

    #[test]
    fn test_file_config_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mcman.toml");

        assert_eq!(FileConfig::load(&path).unwrap(), FileConfig::default());

        std::fs::write(&path, "user_agent = \"test-agent\"\nminecraft_version = \"1.21\"\n")
            .unwrap();
        let config = FileConfig::load(&path).unwrap();
        assert_eq!(config.user_agent.as_deref(), Some("test-agent"));
        assert_eq!(config.minecraft_version.as_deref(), Some("1.21"));

        std::fs::write(&path, "colour = \"blue\"\n").unwrap();
        assert!(FileConfig::load(&path).is_err());
    }
}
