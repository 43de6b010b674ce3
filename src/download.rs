// Download module for streaming artifacts to disk while reporting progress
//
// Progress is reported through a status `Hook`; the downloader never draws
// anything itself.

use crate::sources::artifact::Artifact;
use crate::sources::hash::{HashAlgorithm, Hasher};
use crate::sources::http::{self, Http};
use crate::status::Hook;
use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Status codes emitted while a download runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Emitted once before the first byte is written
    Started,
    /// Emitted after every chunk written to disk
    Progress,
    /// Emitted once after the last chunk
    Finished,
}

/// Payload accompanying every download status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub name: String,
    pub downloaded: u64,
    pub total: Option<u64>,
}

pub type DownloadHook = Hook<Status, Transfer>;

/// A body that can be read chunk by chunk
#[async_trait]
pub trait ChunkSource: Send {
    /// Next chunk of the body, or None once it is exhausted
    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>>;
}

#[async_trait]
impl ChunkSource for reqwest::Response {
    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>> {
        Ok(self.chunk().await?.map(|bytes| bytes.to_vec()))
    }
}

/// A file written by `download`
#[derive(Debug, Clone)]
pub struct Downloaded {
    pub path: PathBuf,
    pub filename: String,
    pub hash: String,
}

/// Download `artifact` into `dest_dir`, verifying its digest when the catalog provided one
pub async fn download(
    http: &Http,
    artifact: &Artifact,
    dest_dir: &Path,
    hook: &DownloadHook,
) -> Result<Downloaded> {
    let mut response = http.get(&artifact.url).await?;

    if !response.status().is_success() {
        anyhow::bail!("Download failed: {} ({})", artifact.url, response.status());
    }

    let filename = match &artifact.filename {
        Some(name) => name.clone(),
        None => http::extract_filename(&response, &artifact.url),
    };
    let filename = safe_filename(&filename)
        .ok_or_else(|| anyhow::anyhow!("Could not determine a filename for {}", artifact.url))?;

    let path = dest_dir.join(&filename);
    let total = response.content_length();
    debug!("Saving {} ({:?} bytes) to {}", artifact.url, total, path.display());

    let hash = save(
        &mut response,
        &filename,
        total,
        &path,
        artifact.hash_algorithm(),
        artifact.hash.as_deref(),
        hook,
    )
    .await?;

    Ok(Downloaded {
        path,
        filename,
        hash,
    })
}

/// Stream `source` into `path`, returning the formatted digest of what was written.
///
/// Bytes land in a `.part` file next to `path`. The part file replaces `path`
/// only once its digest matches `expected` (when given); on any failure it is
/// removed and whatever was at `path` stays untouched.
pub async fn save<S: ChunkSource + ?Sized>(
    source: &mut S,
    name: &str,
    total: Option<u64>,
    path: &Path,
    algorithm: HashAlgorithm,
    expected: Option<&str>,
    hook: &DownloadHook,
) -> Result<String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let partial = partial_path(path);
    let written = write_chunks(source, name, total, &partial, algorithm, hook)
        .await
        .and_then(|hash| verify(name, expected, hash));
    match written {
        Ok(hash) => {
            fs::rename(&partial, path)?;
            Ok(hash)
        }
        Err(e) => {
            if partial.exists() {
                fs::remove_file(&partial)?;
            }
            Err(e)
        }
    }
}

async fn write_chunks<S: ChunkSource + ?Sized>(
    source: &mut S,
    name: &str,
    total: Option<u64>,
    partial: &Path,
    algorithm: HashAlgorithm,
    hook: &DownloadHook,
) -> Result<String> {
    let mut file = File::create(partial)?;
    let mut hasher = Hasher::new(algorithm);
    let mut downloaded = 0u64;

    let transfer = |downloaded| Transfer {
        name: name.to_string(),
        downloaded,
        total,
    };

    hook.call(Status::Started, transfer(0))?;

    while let Some(chunk) = source.next_chunk().await? {
        file.write_all(&chunk)?;
        hasher.update(&chunk);
        downloaded += chunk.len() as u64;
        hook.call(Status::Progress, transfer(downloaded))?;
    }

    file.flush()?;
    hook.call(Status::Finished, transfer(downloaded))?;

    Ok(hasher.finish())
}

fn verify(name: &str, expected: Option<&str>, hash: String) -> Result<String> {
    match expected {
        Some(expected) if !expected.eq_ignore_ascii_case(&hash) => anyhow::bail!(
            "Hash mismatch for {}: expected {}, got {}",
            name,
            expected,
            hash
        ),
        _ => Ok(hash),
    }
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    path.with_file_name(name)
}

/// Strip any directory components a server-supplied filename may carry
fn safe_filename(filename: &str) -> Option<String> {
    let name = filename.rsplit(['/', '\\']).next()?.trim();
    if name.is_empty() || name == "." || name == ".." {
        None
    } else {
        Some(name.to_string())
    }
}
