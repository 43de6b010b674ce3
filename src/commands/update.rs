// Update command for replacing installed plugins with their newest versions

use crate::commands::download::install;
use crate::commands::{Context, check_failures};
use crate::config;
use crate::installed::{self, InstalledPlugin};
use crate::sources::version_matcher::{compare_versions, is_same_version};
use crate::ui;
use log::{debug, info};
use std::cmp::Ordering;
use std::fs;

/// Whether `latest` should replace what is installed. An unknown installed
/// version is always replaced.
pub fn needs_update(installed: Option<&str>, latest: &str) -> bool {
    match installed {
        Some(installed) => {
            !is_same_version(installed, latest)
                && compare_versions(installed, latest) == Ordering::Less
        }
        None => true,
    }
}

/// Pick the installed plugins named by `names`, or all of them when none are named.
/// Names matching nothing are returned separately.
pub fn select_plugins<'a>(
    installed: &'a [InstalledPlugin],
    names: &[String],
) -> (Vec<&'a InstalledPlugin>, Vec<String>) {
    if names.is_empty() {
        return (installed.iter().collect(), Vec::new());
    }

    let mut selected = Vec::new();
    let mut missing = Vec::new();
    for name in names {
        match installed.iter().find(|p| p.matches(name)) {
            Some(plugin) => selected.push(plugin),
            None => missing.push(name.clone()),
        }
    }
    (selected, missing)
}

pub async fn update(ctx: &Context, names: &[String]) -> anyhow::Result<()> {
    let plugins_dir = config::plugins_dir();
    let installed = installed::scan(&plugins_dir)?;
    if installed.is_empty() {
        ui::warning(&format!("No plugins installed in {}", plugins_dir.display()));
        return Ok(());
    }

    let (selected, mut failed) = select_plugins(&installed, names);
    for name in &failed {
        ui::error(&format!("`{}` is not installed", name));
    }

    for plugin in selected {
        if let Err(e) = update_one(ctx, plugin).await {
            ui::error(&format!("{}: {}", plugin.name, e));
            failed.push(plugin.name.clone());
        }
    }

    check_failures("update", &failed)
}

async fn update_one(ctx: &Context, plugin: &InstalledPlugin) -> anyhow::Result<()> {
    let catalog = ctx.plugins();

    let spinner = ui::spinner(&format!("Checking {}...", plugin.name));
    let resolved = async {
        let project = catalog
            .find_by_name(&plugin.name)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Could not find `{}` in the catalog", plugin.name))?;
        let latest = catalog
            .resolve_version(&project, None, ctx.minecraft_version())
            .await?;
        anyhow::Ok((project, latest))
    }
    .await;
    ui::clear_bar(&spinner);
    let (project, latest) = resolved?;

    if !needs_update(plugin.version.as_deref(), &latest.version_number) {
        ui::dim(&format!(
            "{} is up to date ({})",
            plugin.name,
            plugin.version.as_deref().unwrap_or("unknown")
        ));
        return Ok(());
    }

    info!(
        "Updating {} from {:?} to {}",
        plugin.name, plugin.version, latest.version_number
    );
    let files = install(ctx, &project, &latest).await?;

    if !files.contains(&plugin.path) && plugin.path.exists() {
        debug!("Removing old jar {}", plugin.path.display());
        fs::remove_file(&plugin.path)?;
    }

    ui::success(&format!(
        "Updated {} {} -> {}",
        plugin.name,
        plugin.version.as_deref().unwrap_or("unknown"),
        latest.version_number
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn plugin(name: &str, file: &str) -> InstalledPlugin {
        InstalledPlugin {
            name: name.to_string(),
            version: Some("1.0".to_string()),
            file: file.to_string(),
            path: PathBuf::from("plugins").join(file),
        }
    }

    #[test]
    fn test_needs_update() {
        assert!(needs_update(Some("7.2.15"), "7.3.1"));
        assert!(needs_update(None, "1.0"));
        assert!(!needs_update(Some("7.3.1"), "7.3.1"));
        assert!(!needs_update(Some("v7.3.1"), "7.3.1"));
        assert!(!needs_update(Some("2.0"), "1.9"));
        assert!(!needs_update(Some("1.7.3-b131"), "1.7.3"));
    }

    #[test]
    fn test_select_all_when_no_names() {
        let installed = vec![plugin("Vault", "Vault.jar"), plugin("WorldEdit", "we.jar")];
        let (selected, missing) = select_plugins(&installed, &[]);
        assert_eq!(selected.len(), 2);
        assert!(missing.is_empty());
    }

    #[test]
    fn test_select_named_plugins() {
        let installed = vec![plugin("Vault", "Vault.jar"), plugin("WorldEdit", "we.jar")];
        let names = vec!["worldedit".to_string(), "Essentials".to_string()];

        let (selected, missing) = select_plugins(&installed, &names);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name, "WorldEdit");
        assert_eq!(missing, vec!["Essentials".to_string()]);
    }
}
