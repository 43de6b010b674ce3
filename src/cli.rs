// CLI module for handling command-line interface

use clap::{ArgGroup, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mcman", version)]
#[command(about = "Manage Minecraft server jars and plugins")]
#[command(after_help = "Powered by PaperMC and Modrinth")]
#[command(arg_required_else_help = true)]
#[command(group(ArgGroup::new("window").args(["head", "tail"])))]
pub struct Cli {
    /// Alternative user agent to report to the catalogs
    #[arg(long, value_name = "agent", global = true)]
    pub user_agent: Option<String>,

    /// How many entries should be displayed, from the top (10 when no size is given)
    #[arg(
        long,
        value_name = "size",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "10"
    )]
    pub head: Option<usize>,

    /// How many entries should be displayed, from the bottom (10 when no size is given)
    #[arg(
        long,
        value_name = "size",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "10"
    )]
    pub tail: Option<usize>,

    /// Show what is happening under the hood
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage server jars
    #[command(visible_alias = "s")]
    Server(ServerArgs),
    /// Manage plugins
    #[command(visible_alias = "p")]
    Plugin(PluginArgs),
}

/// Download, identify and list Minecraft server jars.
#[derive(Args)]
#[command(arg_required_else_help = true)]
pub struct ServerArgs {
    #[command(subcommand)]
    pub command: ServerCommands,
}

#[derive(Subcommand)]
pub enum ServerCommands {
    /// List available servers
    #[command(visible_alias = "s")]
    Servers,
    /// List channels for the specified server
    #[command(visible_alias = "c")]
    Channels {
        /// The server to get channels for
        server: String,
    },
    /// List versions for the specified server, or only those in the channel
    #[command(visible_alias = "v")]
    Versions {
        /// The server to get versions for
        server: String,
        /// The channel to get versions for
        channel: Option<String>,
    },
    /// Download the newest, the newest in the channel, or the specified version of the server
    #[command(visible_alias = "d")]
    Download {
        /// The server to download
        server: String,
        /// The channel to download from
        channel: Option<String>,
        /// The specific version to download
        version: Option<String>,
    },
    /// Identify the server, version and build of a jar file
    #[command(visible_alias = "i")]
    Identify {
        /// The jar file to identify
        jar: PathBuf,
    },
}

/// Find, download and update plugins.
#[derive(Args)]
#[command(arg_required_else_help = true)]
pub struct PluginArgs {
    /// The base URL of the plugin catalog API
    #[arg(long, value_name = "base-url")]
    pub base_url: Option<String>,

    /// Only pick plugin versions compatible with this Minecraft version
    #[arg(long, value_name = "version")]
    pub minecraft: Option<String>,

    #[command(subcommand)]
    pub command: PluginCommands,
}

#[derive(Subcommand)]
pub enum PluginCommands {
    /// Search for a plugin using partial matching of the name
    #[command(visible_alias = "s")]
    Search {
        /// Search query
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Get info about one or more plugins
    #[command(visible_alias = "i")]
    Info {
        /// Plugin(s) to get info for
        #[arg(value_name = "plugin", required = true, num_args = 1..)]
        plugins: Vec<String>,
    },
    /// Download plugin(s); append "#<version>" to pick a version
    #[command(visible_alias = "d")]
    Download {
        /// Plugin(s) to download, extracted if they are zipped
        #[arg(value_name = "plugin", required = true, num_args = 1..)]
        plugins: Vec<String>,
    },
    /// Update the specified plugins, or all
    #[command(visible_alias = "u")]
    Update {
        /// Plugin(s) to update
        #[arg(value_name = "plugin")]
        plugins: Vec<String>,
    },
    /// List installed plugins, their versions, and the newest version
    #[command(visible_alias = "l")]
    List,
}
