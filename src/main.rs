mod archive;
mod cli;
mod commands;
mod config;
mod constants;
mod download;
mod installed;
mod jar;
mod sources;
mod status;
mod ui;

use clap::Parser;
use cli::{Cli, Commands, PluginCommands};
use commands::Context;
use config::{FileConfig, Overrides, Settings};
use env_logger::Env;
use log::debug;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();

    let config_path = config::config_path();
    let file = FileConfig::load(&config_path)?;
    debug!("Loaded configuration from {}", config_path.display());

    let mut overrides = Overrides {
        user_agent: cli.user_agent,
        head: cli.head,
        tail: cli.tail,
        ..Default::default()
    };

    match cli.command {
        Commands::Server(args) => {
            let ctx = Context::new(Settings::resolve(file, overrides))?;
            commands::server::run(&ctx, args.command).await
        }
        Commands::Plugin(args) => {
            overrides.plugin_base_url = args.base_url;
            overrides.minecraft_version = args.minecraft;
            let ctx = Context::new(Settings::resolve(file, overrides))?;

            match args.command {
                PluginCommands::Search { query } => commands::search::search(&ctx, &query).await,
                PluginCommands::Info { plugins } => commands::info::info(&ctx, &plugins).await,
                PluginCommands::Download { plugins } => {
                    commands::download::download(&ctx, &plugins).await
                }
                PluginCommands::Update { plugins } => {
                    commands::update::update(&ctx, &plugins).await
                }
                PluginCommands::List => commands::list::list(&ctx).await,
            }
        }
    }
}
