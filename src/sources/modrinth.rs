// Plugin catalog backed by the Modrinth API

use crate::constants::PLUGIN_LOADERS;
use crate::sources::artifact::Artifact;
use crate::sources::hash::{HashAlgorithm, format_hash};
use crate::sources::http::Http;
use crate::sources::search::{self, Searchable};
use crate::sources::version_matcher::matches_mc_version;
use log::debug;
use serde::Deserialize;

/// Modrinth caps search pages at 100 hits
const MAX_SEARCH_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: Vec<SearchHit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    pub project_id: String,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub downloads: u64,
}

impl Searchable for SearchHit {
    fn search_name(&self) -> &str {
        &self.title
    }

    fn search_slug(&self) -> &str {
        &self.slug
    }

    fn popularity(&self) -> u64 {
        self.downloads
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub id: String,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub downloads: u64,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub loaders: Vec<String>,
    #[serde(default)]
    pub game_versions: Vec<String>,
    pub source_url: Option<String>,
}

impl Project {
    pub fn page_url(&self) -> String {
        format!("https://modrinth.com/plugin/{}", self.slug)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Version {
    pub version_number: String,
    #[serde(default)]
    pub name: String,
    pub date_published: String,
    #[serde(default)]
    pub game_versions: Vec<String>,
    pub files: Vec<VersionFile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VersionFile {
    pub filename: String,
    pub url: String,
    #[serde(default)]
    pub primary: bool,
    pub hashes: FileHashes,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileHashes {
    pub sha512: Option<String>,
}

impl Version {
    /// The file to download: the one flagged primary, else the first
    pub fn primary_file(&self) -> Option<&VersionFile> {
        self.files
            .iter()
            .find(|f| f.primary)
            .or_else(|| self.files.first())
    }

    pub fn artifact(&self) -> Option<Artifact> {
        self.primary_file().map(|file| match &file.hashes.sha512 {
            Some(sha512) => Artifact::with_hash(
                &file.url,
                &file.filename,
                format_hash(sha512, HashAlgorithm::Sha512),
            ),
            None => Artifact::without_hash(&file.url, Some(file.filename.clone())),
        })
    }

    fn matches(&self, requested: &str) -> bool {
        self.version_number == requested || self.name == requested
    }
}

/// Choose a version from a newest-first list: the requested one, or the newest
/// compatible with `minecraft_version` when given
pub fn select_version<'a>(
    versions: &'a [Version],
    requested: Option<&str>,
    minecraft_version: Option<&str>,
) -> Option<&'a Version> {
    let mut candidates = versions.iter();
    match (requested, minecraft_version) {
        (Some(requested), _) => candidates.find(|v| v.matches(requested)),
        (None, Some(mc)) => {
            candidates.find(|v| v.game_versions.iter().any(|gv| matches_mc_version(gv, mc)))
        }
        (None, None) => candidates.next(),
    }
}

pub struct ModrinthCatalog {
    http: Http,
    base_url: String,
}

impl ModrinthCatalog {
    pub fn new(http: Http, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
        }
    }

    fn loaders_json() -> String {
        serde_json::to_string(PLUGIN_LOADERS).unwrap_or_default()
    }

    /// Search plugins by name, most downloaded first
    pub async fn search(&self, query: &str, limit: usize) -> anyhow::Result<Vec<SearchHit>> {
        let loader_facets: Vec<String> = PLUGIN_LOADERS
            .iter()
            .map(|loader| format!("categories:{}", loader))
            .collect();
        let facets =
            serde_json::to_string(&[loader_facets, vec!["project_type:plugin".to_string()]])?;

        let url = format!(
            "{}search?query={}&facets={}&index=downloads&limit={}",
            self.base_url,
            urlencoding::encode(query),
            urlencoding::encode(&facets),
            limit.clamp(1, MAX_SEARCH_LIMIT)
        );
        let response: SearchResponse = self.http.fetch_json(&url).await?;
        debug!("Search for '{}' returned {} hit(s)", query, response.hits.len());
        Ok(response.hits)
    }

    /// Look up a project by id or slug
    pub async fn project(&self, id: &str) -> anyhow::Result<Option<Project>> {
        let url = format!("{}project/{}", self.base_url, urlencoding::encode(id));
        self.http.fetch_json_optional(&url).await
    }

    /// Find a plugin by slug, id or exact name; None when nothing matches
    pub async fn find_by_name(&self, name: &str) -> anyhow::Result<Option<Project>> {
        if let Some(project) = self.project(name).await? {
            return Ok(Some(project));
        }

        debug!("No project with slug '{}', searching by name", name);
        let hits = self.search(name, 20).await?;
        match search::find_exact(hits, name) {
            Some(hit) => self.project(&hit.project_id).await,
            None => Ok(None),
        }
    }

    /// Versions of a project usable on Bukkit-family servers, newest first
    pub async fn versions(&self, project_id: &str) -> anyhow::Result<Vec<Version>> {
        let url = format!(
            "{}project/{}/version?loaders={}",
            self.base_url,
            urlencoding::encode(project_id),
            urlencoding::encode(&Self::loaders_json())
        );
        let mut versions: Vec<Version> = self.http.fetch_json(&url).await?;
        versions.sort_by(|a, b| b.date_published.cmp(&a.date_published));
        Ok(versions)
    }

    /// Resolve the version of a project to download
    pub async fn resolve_version(
        &self,
        project: &Project,
        requested: Option<&str>,
        minecraft_version: Option<&str>,
    ) -> anyhow::Result<Version> {
        let versions = self.versions(&project.id).await?;
        if versions.is_empty() {
            anyhow::bail!("No server plugin versions found for '{}'", project.title);
        }

        select_version(&versions, requested, minecraft_version)
            .cloned()
            .ok_or_else(|| match (requested, minecraft_version) {
                (Some(requested), _) => anyhow::anyhow!(
                    "Version '{}' not found for '{}'",
                    requested,
                    project.title
                ),
                (None, Some(mc)) => anyhow::anyhow!(
                    "No version of '{}' supports Minecraft {}",
                    project.title,
                    mc
                ),
                (None, None) => anyhow::anyhow!("No versions found for '{}'", project.title),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn versions() -> Vec<Version> {
        serde_json::from_str(
            r#"[
                {"version_number": "7.3.1", "name": "WorldEdit 7.3.1",
                 "date_published": "2024-03-01T00:00:00Z",
                 "game_versions": ["1.20.4"], "loaders": ["paper"],
                 "files": [
                    {"filename": "worldedit-sources.jar", "url": "https://cdn/src.jar",
                     "primary": false, "hashes": {"sha512": "11"}},
                    {"filename": "worldedit-bukkit-7.3.1.jar", "url": "https://cdn/we.jar",
                     "primary": true, "hashes": {"sha512": "AB", "sha1": "cd"}}
                 ]},
                {"version_number": "7.2.15", "name": "WorldEdit 7.2.15",
                 "date_published": "2023-06-01T00:00:00Z",
                 "game_versions": ["1.19.4", "1.20"], "loaders": ["bukkit"],
                 "files": [
                    {"filename": "worldedit-bukkit-7.2.15.jar", "url": "https://cdn/old.jar",
                     "hashes": {}}
                 ]}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_select_newest_by_default() {
        let versions = versions();
        let v = select_version(&versions, None, None).unwrap();
        assert_eq!(v.version_number, "7.3.1");
    }

    #[test]
    fn test_select_requested_version() {
        let versions = versions();
        assert_eq!(
            select_version(&versions, Some("7.2.15"), None).unwrap().version_number,
            "7.2.15"
        );
        assert_eq!(
            select_version(&versions, Some("WorldEdit 7.3.1"), None)
                .unwrap()
                .version_number,
            "7.3.1"
        );
        assert!(select_version(&versions, Some("9.9.9"), None).is_none());
    }

    #[test]
    fn test_select_by_minecraft_version() {
        let versions = versions();
        let v = select_version(&versions, None, Some("1.19.4")).unwrap();
        assert_eq!(v.version_number, "7.2.15");
        assert!(select_version(&versions, None, Some("1.8.8")).is_none());
    }

    #[test]
    fn test_primary_file_artifact() {
        let versions = versions();
        let artifact = versions[0].artifact().unwrap();
        assert_eq!(artifact.url, "https://cdn/we.jar");
        assert_eq!(artifact.filename.as_deref(), Some("worldedit-bukkit-7.3.1.jar"));
        assert_eq!(artifact.hash.as_deref(), Some("sha512:ab"));

        let artifact = versions[1].artifact().unwrap();
        assert_eq!(artifact.url, "https://cdn/old.jar");
        assert_eq!(artifact.hash, None);
    }

    #[test]
    fn test_parse_project() {
        let project: Project = serde_json::from_str(
            r#"{"id": "1u6JkXh5", "slug": "worldedit", "title": "WorldEdit",
                "description": "In-game map editor", "downloads": 5000000,
                "followers": 1000, "loaders": ["bukkit", "fabric"],
                "game_versions": ["1.20.4"], "source_url": null,
                "project_type": "mod"}"#,
        )
        .unwrap();
        assert_eq!(project.page_url(), "https://modrinth.com/plugin/worldedit");
        assert_eq!(project.source_url, None);
    }
}
