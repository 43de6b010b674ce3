// Constants module for shared string constants

pub const CONFIG_FILE: &str = "mcman.toml";
pub const PLUGINS_DIR: &str = "plugins";

pub const DEFAULT_USER_AGENT: &str = concat!("mcman/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_SERVER_BASE_URL: &str = "https://api.papermc.io/v2/";
pub const DEFAULT_PLUGIN_BASE_URL: &str = "https://api.modrinth.com/v2/";

/// Loader families a plugin must support to be offered
pub const PLUGIN_LOADERS: &[&str] = &["bukkit", "spigot", "paper"];

/// Entries shown by listings when neither --head nor --tail is given
pub const DEFAULT_LISTING_SIZE: usize = 80;
