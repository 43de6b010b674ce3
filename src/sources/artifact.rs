// Downloadable artifact model shared by the server and plugin catalogs

use crate::sources::hash::HashAlgorithm;

/// A file a catalog offers for download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Download URL
    pub url: String,

    /// Filename (if known from API)
    pub filename: Option<String>,

    /// Expected digest, formatted as "algorithm:hash"
    pub hash: Option<String>,
}

impl Artifact {
    /// Create an artifact with full details (hash provided by API)
    pub fn with_hash(
        url: impl Into<String>,
        filename: impl Into<String>,
        hash: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            filename: Some(filename.into()),
            hash: Some(hash.into()),
        }
    }

    /// Create an artifact whose digest is unknown
    pub fn without_hash(url: impl Into<String>, filename: Option<String>) -> Self {
        Self {
            url: url.into(),
            filename,
            hash: None,
        }
    }

    /// Algorithm to hash the download with, matching the expected digest when there is one
    pub fn hash_algorithm(&self) -> HashAlgorithm {
        match self.hash.as_deref() {
            Some(h) if h.starts_with("sha512:") => HashAlgorithm::Sha512,
            _ => HashAlgorithm::Sha256,
        }
    }
}
