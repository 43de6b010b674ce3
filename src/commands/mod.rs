// Commands module: one file per subcommand

pub mod download;
pub mod info;
pub mod list;
pub mod search;
pub mod server;
pub mod update;

use crate::config::Settings;
use crate::sources::http::Http;
use crate::sources::modrinth::ModrinthCatalog;
use crate::sources::paper::PaperCatalog;

/// Everything a command needs: the effective settings and a configured HTTP client
pub struct Context {
    pub settings: Settings,
    pub http: Http,
}

impl Context {
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        let http = Http::new(&settings.user_agent)?;
        Ok(Self { settings, http })
    }

    pub fn servers(&self) -> PaperCatalog {
        PaperCatalog::new(self.http.clone(), &self.settings.server_base_url)
    }

    pub fn plugins(&self) -> ModrinthCatalog {
        ModrinthCatalog::new(self.http.clone(), &self.settings.plugin_base_url)
    }

    pub fn minecraft_version(&self) -> Option<&str> {
        self.settings.minecraft_version.as_deref()
    }
}

/// Fail with a summary when some items of a multi-item command failed
fn check_failures(action: &str, failed: &[String]) -> anyhow::Result<()> {
    if failed.is_empty() {
        Ok(())
    } else {
        anyhow::bail!("Failed to {} {}", action, failed.join(", "))
    }
}
