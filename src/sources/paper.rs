// Server catalog backed by the PaperMC downloads API
//
// Servers are the API's projects (paper, folia, velocity, ...), channels are
// its version groups (e.g. "1.20") and every version has numbered builds.

use crate::sources::artifact::Artifact;
use crate::sources::hash::{HashAlgorithm, format_hash};
use crate::sources::http::Http;
use crate::sources::version_matcher::compare_versions;
use log::debug;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
struct ProjectList {
    projects: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Project {
    project_name: String,
    version_groups: Vec<String>,
    versions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct VersionGroup {
    versions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct BuildList {
    builds: Vec<Build>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Build {
    pub build: u32,
    #[serde(default)]
    pub channel: String,
    pub time: String,
    #[serde(default)]
    downloads: BTreeMap<String, BuildDownload>,
}

#[derive(Debug, Clone, Deserialize)]
struct BuildDownload {
    name: String,
    sha256: String,
}

/// The server build chosen for download
#[derive(Debug, Clone)]
pub struct ServerBuild {
    pub server: String,
    pub version: String,
    pub build: u32,
    pub channel: String,
    pub time: String,
    pub artifact: Artifact,
}

pub struct PaperCatalog {
    http: Http,
    base_url: String,
}

impl PaperCatalog {
    pub fn new(http: Http, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn project(&self, server: &str) -> anyhow::Result<Project> {
        let url = self.url(&format!("projects/{}", urlencoding::encode(server)));
        self.http
            .fetch_json_optional(&url)
            .await?
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown server '{}'. Run 'mcman server servers' to list them.",
                    server
                )
            })
    }

    /// List all servers available for download
    pub async fn servers(&self) -> anyhow::Result<Vec<String>> {
        let list: ProjectList = self.http.fetch_json(&self.url("projects")).await?;
        Ok(list.projects)
    }

    /// Display name of a server (e.g. "Paper" for "paper")
    pub async fn display_name(&self, server: &str) -> anyhow::Result<String> {
        Ok(self.project(server).await?.project_name)
    }

    /// List the channels of a server, oldest first
    pub async fn channels(&self, server: &str) -> anyhow::Result<Vec<String>> {
        let mut channels = self.project(server).await?.version_groups;
        channels.sort_by(|a, b| compare_versions(a, b));
        Ok(channels)
    }

    /// List the versions of a server, optionally only those in `channel`, oldest first
    pub async fn versions(
        &self,
        server: &str,
        channel: Option<&str>,
    ) -> anyhow::Result<Vec<String>> {
        let mut versions = match channel {
            None => self.project(server).await?.versions,
            Some(channel) => {
                let url = self.url(&format!(
                    "projects/{}/version_group/{}",
                    urlencoding::encode(server),
                    urlencoding::encode(channel)
                ));
                let group: Option<VersionGroup> = self.http.fetch_json_optional(&url).await?;
                group
                    .ok_or_else(|| {
                        anyhow::anyhow!("Channel '{}' not found for server '{}'", channel, server)
                    })?
                    .versions
            }
        };
        versions.sort_by(|a, b| compare_versions(a, b));
        Ok(versions)
    }

    /// Resolve the build to download: the newest build of `version`, or of the
    /// newest version in `channel`, or of the newest version overall
    pub async fn resolve_build(
        &self,
        server: &str,
        channel: Option<&str>,
        version: Option<&str>,
    ) -> anyhow::Result<ServerBuild> {
        let versions = self.versions(server, channel).await?;

        let version = match version {
            Some(requested) => versions
                .iter()
                .find(|v| v.as_str() == requested)
                .ok_or_else(|| match channel {
                    Some(channel) => anyhow::anyhow!(
                        "Version '{}' not found in channel '{}' of server '{}'",
                        requested,
                        channel,
                        server
                    ),
                    None => anyhow::anyhow!(
                        "Version '{}' not found for server '{}'",
                        requested,
                        server
                    ),
                })?,
            None => versions
                .last()
                .ok_or_else(|| anyhow::anyhow!("No versions found for server '{}'", server))?,
        };

        let url = self.url(&format!(
            "projects/{}/versions/{}/builds",
            urlencoding::encode(server),
            urlencoding::encode(version)
        ));
        let builds: BuildList = self.http.fetch_json(&url).await?;
        debug!("{} {} has {} build(s)", server, version, builds.builds.len());

        let build = select_build(&builds.builds).ok_or_else(|| {
            anyhow::anyhow!("No downloadable builds found for {} {}", server, version)
        })?;
        let download = build.downloads.get("application").ok_or_else(|| {
            anyhow::anyhow!("Build {} of {} {} has no server jar", build.build, server, version)
        })?;

        let artifact = Artifact::with_hash(
            self.url(&format!(
                "projects/{}/versions/{}/builds/{}/downloads/{}",
                urlencoding::encode(server),
                urlencoding::encode(version),
                build.build,
                urlencoding::encode(&download.name)
            )),
            download.name.clone(),
            format_hash(&download.sha256, HashAlgorithm::Sha256),
        );

        Ok(ServerBuild {
            server: server.to_string(),
            version: version.clone(),
            build: build.build,
            channel: build.channel.clone(),
            time: build.time.clone(),
            artifact,
        })
    }
}

/// Pick the newest stable ("default" channel) build carrying a server jar,
/// falling back to the newest build of any channel
pub fn select_build(builds: &[Build]) -> Option<&Build> {
    let downloadable = || {
        builds
            .iter()
            .filter(|b| b.downloads.contains_key("application"))
    };

    downloadable()
        .filter(|b| b.channel.eq_ignore_ascii_case("default"))
        .max_by_key(|b| b.build)
        .or_else(|| downloadable().max_by_key(|b| b.build))
}
