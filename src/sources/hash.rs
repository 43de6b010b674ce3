// Hash computation for verifying downloads

use sha2::{Digest, Sha256, Sha512};

/// Hash algorithm types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Sha256,
    Sha512,
}

impl HashAlgorithm {
    /// Get the algorithm prefix for formatted output
    pub fn prefix(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha512 => "sha512",
        }
    }
}

/// Incremental hasher fed chunk by chunk while a file streams to disk
pub enum Hasher {
    Sha256(Sha256),
    Sha512(Sha512),
}

impl Hasher {
    pub fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Sha256 => Hasher::Sha256(Sha256::new()),
            HashAlgorithm::Sha512 => Hasher::Sha512(Sha512::new()),
        }
    }

    pub fn update(&mut self, data: &[u8]) {
        match self {
            Hasher::Sha256(h) => h.update(data),
            Hasher::Sha512(h) => h.update(data),
        }
    }

    /// Finish hashing and return the formatted digest (e.g. "sha256:abc123...")
    pub fn finish(self) -> String {
        match self {
            Hasher::Sha256(h) => format_hash(&hex::encode(h.finalize()), HashAlgorithm::Sha256),
            Hasher::Sha512(h) => format_hash(&hex::encode(h.finalize()), HashAlgorithm::Sha512),
        }
    }
}

/// Compute hash of data and return formatted string
pub fn compute_hash(data: &[u8], algorithm: HashAlgorithm) -> String {
    let mut hasher = Hasher::new(algorithm);
    hasher.update(data);
    hasher.finish()
}

/// Format a hex digest with its algorithm prefix
pub fn format_hash(hash: &str, algorithm: HashAlgorithm) -> String {
    format!("{}:{}", algorithm.prefix(), hash.to_lowercase())
}
