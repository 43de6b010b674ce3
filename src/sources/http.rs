// Shared HTTP client utilities

use anyhow::Result;
use log::debug;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// HTTP client carrying the configured User-Agent
#[derive(Clone)]
pub struct Http {
    client: Client,
}

impl Http {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .connect_timeout(Duration::from_secs(15))
            .read_timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;
        Ok(Self { client })
    }

    /// Send a GET request, returning the response whatever its status
    pub async fn get(&self, url: &str) -> Result<Response> {
        debug!("GET {}", url);
        Ok(self.client.get(url).send().await?)
    }

    /// Fetch JSON from a URL and deserialize it
    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        match self.fetch_json_optional(url).await? {
            Some(result) => Ok(result),
            None => anyhow::bail!("Resource not found: {}", url),
        }
    }

    /// Fetch JSON from a URL, returning None for 404 errors
    pub async fn fetch_json_optional<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>> {
        let response = self.get(url).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            anyhow::bail!("HTTP request failed: {} ({})", url, response.status());
        }

        let result = response
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("Invalid response from {}: {}", url, e))?;
        Ok(Some(result))
    }
}

/// Extract filename from Content-Disposition header or URL
pub fn extract_filename(response: &Response, url: &str) -> String {
    response
        .headers()
        .get("content-disposition")
        .and_then(|h| h.to_str().ok())
        .and_then(filename_from_disposition)
        .unwrap_or_else(|| filename_from_url(url))
}

fn filename_from_disposition(header: &str) -> Option<String> {
    header
        .split("filename=")
        .nth(1)
        .and_then(|f| f.trim_matches('"').split(';').next())
        .map(|f| f.trim_matches('"').to_string())
        .filter(|f| !f.is_empty())
}

/// Last path segment of a URL without its query string
pub fn filename_from_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let name = path.rsplit('/').next().unwrap_or_default();
    match urlencoding::decode(name) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => name.to_string(),
    }
}
