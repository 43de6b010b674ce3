// Download command for installing plugins into the plugins directory

use crate::archive;
use crate::commands::{Context, check_failures};
use crate::config;
use crate::download;
use crate::sources::modrinth::{Project, Version};
use crate::ui;
use log::{debug, info};
use std::fs;
use std::path::PathBuf;

/// Split `name#version` into its parts; an empty version means "newest"
pub fn parse_plugin_spec(spec: &str) -> (&str, Option<&str>) {
    match spec.split_once('#') {
        Some((name, version)) if !version.trim().is_empty() => (name.trim(), Some(version.trim())),
        Some((name, _)) => (name.trim(), None),
        None => (spec.trim(), None),
    }
}

pub async fn download(ctx: &Context, plugins: &[String]) -> anyhow::Result<()> {
    let mut failed = Vec::new();

    for spec in plugins {
        let (name, version) = parse_plugin_spec(spec);
        if let Err(e) = download_one(ctx, name, version).await {
            ui::error(&format!("{}: {}", name, e));
            failed.push(name.to_string());
        }
    }

    check_failures("download", &failed)
}

async fn download_one(ctx: &Context, name: &str, version: Option<&str>) -> anyhow::Result<()> {
    let catalog = ctx.plugins();

    let spinner = ui::spinner(&format!("Resolving {}...", name));
    let resolved = async {
        let project = catalog
            .find_by_name(name)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Could not find `{}`", name))?;
        let version = catalog
            .resolve_version(&project, version, ctx.minecraft_version())
            .await?;
        anyhow::Ok((project, version))
    }
    .await;
    ui::clear_bar(&spinner);
    let (project, version) = resolved?;

    let files = install(ctx, &project, &version).await?;
    for file in &files {
        debug!("Installed {}", file.display());
    }
    ui::success(&format!(
        "Installed {} {}",
        project.title, version.version_number
    ));
    Ok(())
}

/// Download `version` of `project` into the plugins directory, extracting
/// zipped releases. Returns the jar files that were written.
pub async fn install(
    ctx: &Context,
    project: &Project,
    version: &Version,
) -> anyhow::Result<Vec<PathBuf>> {
    let artifact = version.artifact().ok_or_else(|| {
        anyhow::anyhow!(
            "{} {} has no downloadable files",
            project.title,
            version.version_number
        )
    })?;

    let dest = config::plugins_dir();
    fs::create_dir_all(&dest)?;

    ui::action(&format!(
        "Downloading {} {}",
        project.title, version.version_number
    ));
    let reporter = ui::progress_reporter();
    let saved = download::download(&ctx.http, &artifact, &dest, &reporter.get_hook()).await?;
    info!("Saved {} ({})", saved.path.display(), saved.hash);

    if !archive::is_zip_archive(&saved.filename) {
        return Ok(vec![saved.path]);
    }

    info!("Extracting jars from {}", saved.filename);
    let extracted = archive::extract_jars(&saved.path, &dest);
    fs::remove_file(&saved.path)?;
    extracted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plugin_spec() {
        assert_eq!(parse_plugin_spec("worldedit"), ("worldedit", None));
        assert_eq!(
            parse_plugin_spec("worldedit#7.3.1"),
            ("worldedit", Some("7.3.1"))
        );
        assert_eq!(parse_plugin_spec("worldedit#"), ("worldedit", None));
        assert_eq!(
            parse_plugin_spec("Vault#1.7.3#b131"),
            ("Vault", Some("1.7.3#b131"))
        );
    }
}
