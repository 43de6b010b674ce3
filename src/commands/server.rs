// Server commands: list servers, channels and versions, download and identify jars

use crate::cli::ServerCommands;
use crate::commands::Context;
use crate::config;
use crate::download;
use crate::jar;
use crate::sources::hash::{HashAlgorithm, Hasher};
use crate::ui;
use log::info;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

pub async fn run(ctx: &Context, command: ServerCommands) -> anyhow::Result<()> {
    match command {
        ServerCommands::Servers => servers(ctx).await,
        ServerCommands::Channels { server } => channels(ctx, &server).await,
        ServerCommands::Versions { server, channel } => {
            versions(ctx, &server, channel.as_deref()).await
        }
        ServerCommands::Download {
            server,
            channel,
            version,
        } => download(ctx, &server, channel.as_deref(), version.as_deref()).await,
        ServerCommands::Identify { jar } => identify(&jar),
    }
}

fn print_listing(ctx: &Context, title: &str, entries: &[String]) {
    let shown = ctx.settings.listing.apply(entries);
    ui::header(title);
    for entry in shown {
        ui::line(&format!("  {}", entry));
    }
    if shown.len() < entries.len() {
        ui::dim(&format!("  ({} of {} shown)", shown.len(), entries.len()));
    }
}

async fn servers(ctx: &Context) -> anyhow::Result<()> {
    let servers = ctx.servers().servers().await?;
    print_listing(ctx, "Available servers", &servers);
    Ok(())
}

async fn channels(ctx: &Context, server: &str) -> anyhow::Result<()> {
    let catalog = ctx.servers();
    let name = catalog.display_name(server).await?;
    let channels = catalog.channels(server).await?;
    print_listing(ctx, &format!("Channels for {}", name), &channels);
    Ok(())
}

async fn versions(ctx: &Context, server: &str, channel: Option<&str>) -> anyhow::Result<()> {
    let catalog = ctx.servers();
    let name = catalog.display_name(server).await?;
    let versions = catalog.versions(server, channel).await?;
    let title = match channel {
        Some(channel) => format!("Versions for {} in channel {}", name, channel),
        None => format!("Versions for {}", name),
    };
    print_listing(ctx, &title, &versions);
    Ok(())
}

async fn download(
    ctx: &Context,
    server: &str,
    channel: Option<&str>,
    version: Option<&str>,
) -> anyhow::Result<()> {
    let spinner = ui::spinner(&format!("Resolving {}...", server));
    let build = ctx.servers().resolve_build(server, channel, version).await;
    ui::clear_bar(&spinner);
    let build = build?;

    ui::action(&format!(
        "Downloading {} {} build {} ({}, {})",
        build.server, build.version, build.build, build.channel, build.time
    ));

    let reporter = ui::progress_reporter();
    let dest = config::config_dir();
    let saved = download::download(&ctx.http, &build.artifact, &dest, &reporter.get_hook()).await?;

    info!("Verified {} against {}", saved.filename, saved.hash);
    ui::success(&format!("Saved {}", saved.path.display()));
    Ok(())
}

fn identify(jar_path: &Path) -> anyhow::Result<()> {
    let identity = jar::identify_server(jar_path)?;
    let digest = checksum(jar_path)?;
    let unknown = || "unknown".to_string();

    ui::header(&jar_path.display().to_string());
    ui::field("Server", &identity.server.unwrap_or_else(unknown));
    ui::field("Version", &identity.version.unwrap_or_else(unknown));
    ui::field("Build", &identity.build.unwrap_or_else(unknown));
    ui::field("Checksum", &digest);
    Ok(())
}

/// SHA-256 of a file, read in chunks so large jars are never held in memory
fn checksum(path: &Path) -> anyhow::Result<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = Hasher::new(HashAlgorithm::Sha256);
    let mut buffer = [0u8; 64 * 1024];
    loop {
        let read = reader.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(hasher.finish())
}
