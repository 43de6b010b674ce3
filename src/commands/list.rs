// List command for showing installed plugins next to their newest versions

use crate::commands::Context;
use crate::config;
use crate::installed::{self, InstalledPlugin};
use crate::sources::modrinth::ModrinthCatalog;
use crate::ui;
use futures::future::join_all;
use log::debug;

const COLUMN_WIDTH: usize = 24;

pub async fn list(ctx: &Context) -> anyhow::Result<()> {
    let plugins_dir = config::plugins_dir();
    let installed = installed::scan(&plugins_dir)?;
    if installed.is_empty() {
        ui::dim(&format!("No plugins installed in {}", plugins_dir.display()));
        return Ok(());
    }

    let catalog = ctx.plugins();
    let spinner = ui::spinner("Checking for newer versions...");
    let newest = join_all(
        installed
            .iter()
            .map(|plugin| newest_version(&catalog, plugin, ctx.minecraft_version())),
    )
    .await;
    ui::clear_bar(&spinner);

    let rows: Vec<Vec<String>> = installed
        .iter()
        .zip(newest)
        .map(|(plugin, newest)| {
            vec![
                plugin.name.clone(),
                plugin.version.clone().unwrap_or_else(|| "unknown".to_string()),
                newest.unwrap_or_else(|| "unknown".to_string()),
            ]
        })
        .collect();
    ui::table(&["Name", "Installed", "Newest"], &rows, COLUMN_WIDTH);
    Ok(())
}

async fn newest_version(
    catalog: &ModrinthCatalog,
    plugin: &InstalledPlugin,
    minecraft_version: Option<&str>,
) -> Option<String> {
    let lookup = async {
        let project = catalog
            .find_by_name(&plugin.name)
            .await?
            .ok_or_else(|| anyhow::anyhow!("not in catalog"))?;
        catalog
            .resolve_version(&project, None, minecraft_version)
            .await
    };
    match lookup.await {
        Ok(version) => Some(version.version_number),
        Err(e) => {
            debug!("No newest version for {}: {}", plugin.name, e);
            None
        }
    }
}
