// Installed plugins, discovered from the jars in the plugins directory

use crate::jar;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPlugin {
    pub name: String,
    pub version: Option<String>,
    pub file: String,
    pub path: PathBuf,
}

impl InstalledPlugin {
    /// Check whether `query` names this plugin, by plugin.yml name or jar file name
    pub fn matches(&self, query: &str) -> bool {
        let stem = self.file.strip_suffix(".jar").unwrap_or(&self.file);
        self.name.eq_ignore_ascii_case(query)
            || stem.eq_ignore_ascii_case(query)
            || self.file.eq_ignore_ascii_case(query)
    }
}

/// Scan `plugins_dir` for plugin jars, sorted by name.
///
/// Jars without a readable plugin.yml are listed under their file name with an
/// unknown version. A missing directory means nothing is installed.
pub fn scan(plugins_dir: &Path) -> anyhow::Result<Vec<InstalledPlugin>> {
    if !plugins_dir.exists() {
        return Ok(Vec::new());
    }

    let mut plugins = Vec::new();
    for entry in fs::read_dir(plugins_dir)? {
        let path = entry?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("jar") {
            continue;
        }
        let Some(file) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
            continue;
        };

        let plugin = match jar::read_plugin_descriptor(&path) {
            Ok(descriptor) => InstalledPlugin {
                name: descriptor.name,
                version: descriptor.version,
                file,
                path,
            },
            Err(e) => {
                debug!("Could not read plugin descriptor from {}: {}", file, e);
                InstalledPlugin {
                    name: file.strip_suffix(".jar").unwrap_or(&file).to_string(),
                    version: None,
                    file,
                    path,
                }
            }
        };
        plugins.push(plugin);
    }

    plugins.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    Ok(plugins)
}
