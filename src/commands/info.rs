// Info command for describing one or more plugins

use crate::commands::{Context, check_failures};
use crate::sources::modrinth::{ModrinthCatalog, Project, Version};
use crate::ui;
use log::debug;

pub async fn info(ctx: &Context, plugins: &[String]) -> anyhow::Result<()> {
    let catalog = ctx.plugins();
    let mut failed = Vec::new();

    for name in plugins {
        ui::action(&format!("Looking up `{}`", name));
        match describe(&catalog, name).await {
            Ok(Some(project)) => {
                let latest = newest_version(&project, catalog.versions(&project.id).await);
                print_project(&project, latest);
            }
            Ok(None) => {
                ui::warning(&format!("Could not find `{}`", name));
                failed.push(name.clone());
            }
            Err(e) => {
                ui::error(&format!("{}: {}", name, e));
                failed.push(name.clone());
            }
        }
    }

    check_failures("look up", &failed)
}

async fn describe(catalog: &ModrinthCatalog, name: &str) -> anyhow::Result<Option<Project>> {
    let spinner = ui::spinner(&format!("Resolving {}...", name));
    let project = catalog.find_by_name(name).await;
    ui::clear_bar(&spinner);
    project
}

/// Newest version number from a newest-first lookup; a failed lookup is logged and shown as unknown
fn newest_version(project: &Project, versions: anyhow::Result<Vec<Version>>) -> Option<String> {
    match versions {
        Ok(versions) => versions.into_iter().next().map(|v| v.version_number),
        Err(e) => {
            debug!("No versions for {}: {}", project.slug, e);
            None
        }
    }
}

fn print_project(project: &Project, latest: Option<String>) {
    ui::header(&project.title);
    ui::field("Identifier", &project.slug);
    ui::field("Description", &project.description);
    ui::field("Downloads", &project.downloads.to_string());
    ui::field("Followers", &project.followers.to_string());
    ui::field("Loaders", &project.loaders.join(", "));
    // Catalogs list game versions oldest first; the tail is what people ask about
    let recent: Vec<&str> = project
        .game_versions
        .iter()
        .rev()
        .take(8)
        .map(String::as_str)
        .collect();
    ui::field("Minecraft versions", &recent.join(", "));
    ui::field("Latest version", latest.as_deref().unwrap_or("unknown"));
    ui::field("Page", &project.page_url());
    if let Some(source) = &project.source_url {
        ui::field("Source", source);
    }
}
