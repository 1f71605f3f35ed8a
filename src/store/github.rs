//! GitHub contents API client.
//!
//! Thin HTTP wrapper over `/repos/{owner}/{repo}/contents/{path}`. Blob
//! content travels as base64 of UTF-8 JSON and the blob sha serves as the
//! version token. Request building and response parsing are pure functions
//! so they can be tested without a network.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use tracing::debug;

use super::{Blob, ContentStore, Entry, StoreError, VersionToken, WriteReceipt};
use crate::cache::Credentials;
use crate::config::StoreSettings;

const ACCEPT: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = "pixelboard";

// =============================================================================
// CLIENT
// =============================================================================

pub struct GitHubStore {
    http: reqwest::Client,
    base_url: String,
    owner: String,
    repo: String,
    branch: String,
    token: String,
}

impl GitHubStore {
    /// Build a client for the namespace named by `credentials`.
    ///
    /// # Errors
    ///
    /// Returns `Transport` if the HTTP client can't be constructed.
    pub fn new(credentials: &Credentials, settings: &StoreSettings) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| StoreError::Transport(format!("http client build failed: {e}")))?;
        let branch = credentials.branch.clone().unwrap_or_else(|| settings.default_branch.clone());
        Ok(Self {
            http,
            base_url: settings.api_base_url.trim_end_matches('/').to_owned(),
            owner: credentials.owner.trim().to_owned(),
            repo: credentials.repo.trim().to_owned(),
            branch,
            token: credentials.token.trim().to_owned(),
        })
    }

    fn url(&self, path: &str) -> String {
        contents_url(&self.base_url, &self.owner, &self.repo, path)
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, ACCEPT)
    }

    /// Send and collect `(status, body)`, mapping non-success statuses to errors.
    async fn send(&self, builder: reqwest::RequestBuilder, path: &str) -> Result<String, StoreError> {
        let response = builder.send().await.map_err(|e| StoreError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| StoreError::Transport(e.to_string()))?;
        debug!(path, status, "github contents response");
        if (200..300).contains(&status) {
            Ok(body)
        } else {
            Err(classify_failure(status, &body, path))
        }
    }
}

#[async_trait]
impl ContentStore for GitHubStore {
    async fn get(&self, path: &str) -> Result<Blob, StoreError> {
        let url = format!("{}?ref={}", self.url(path), self.branch);
        let body = self.send(self.request(reqwest::Method::GET, &url), path).await?;
        parse_file(&body)
    }

    async fn put(
        &self,
        path: &str,
        content: &str,
        version: Option<&VersionToken>,
        message: &str,
    ) -> Result<WriteReceipt, StoreError> {
        let body = PutRequest {
            message,
            content: BASE64.encode(content),
            sha: version.map(|v| v.0.as_str()),
            branch: &self.branch,
        };
        let builder = self.request(reqwest::Method::PUT, &self.url(path)).json(&body);
        let response = self.send(builder, path).await?;
        parse_put(&response)
    }

    async fn delete(&self, path: &str, version: &VersionToken, message: &str) -> Result<(), StoreError> {
        let body = DeleteRequest { message, sha: &version.0, branch: &self.branch };
        let builder = self.request(reqwest::Method::DELETE, &self.url(path)).json(&body);
        self.send(builder, path).await.map(|_| ())
    }

    async fn list(&self, dir: &str) -> Result<Vec<Entry>, StoreError> {
        let url = format!("{}?ref={}", self.url(dir), self.branch);
        match self.send(self.request(reqwest::Method::GET, &url), dir).await {
            Ok(body) => parse_listing(&body),
            Err(StoreError::NotFound(_)) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(serde::Serialize)]
struct PutRequest<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
    branch: &'a str,
}

#[derive(serde::Serialize)]
struct DeleteRequest<'a> {
    message: &'a str,
    sha: &'a str,
    branch: &'a str,
}

#[derive(serde::Deserialize)]
struct FileResponse {
    content: String,
    sha: String,
    #[serde(default)]
    html_url: Option<String>,
}

#[derive(serde::Deserialize)]
struct PutResponse {
    content: PutContent,
}

#[derive(serde::Deserialize)]
struct PutContent {
    sha: String,
    #[serde(default)]
    html_url: Option<String>,
}

#[derive(serde::Deserialize)]
struct ListingItem {
    name: String,
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    message: String,
}

// =============================================================================
// PARSING
// =============================================================================

fn contents_url(base_url: &str, owner: &str, repo: &str, path: &str) -> String {
    format!("{base_url}/repos/{owner}/{repo}/contents/{}", path.trim_start_matches('/'))
}

/// Map a non-success status to the store error taxonomy.
fn classify_failure(status: u16, body: &str, path: &str) -> StoreError {
    let message = serde_json::from_str::<ErrorBody>(body).map_or_else(|_| body.trim().to_owned(), |b| b.message);
    match status {
        404 => StoreError::NotFound(path.to_owned()),
        409 => StoreError::Conflict(path.to_owned()),
        // GitHub answers a create over an existing file with 422 "sha wasn't supplied".
        422 if message.contains("sha") => StoreError::Conflict(path.to_owned()),
        _ => StoreError::Transport(format!("status {status}: {message}")),
    }
}

/// Decode base64 content; GitHub wraps it at 60 columns.
fn decode_content(encoded: &str) -> Result<String, StoreError> {
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = BASE64.decode(compact).map_err(|e| StoreError::Decode(format!("base64: {e}")))?;
    String::from_utf8(bytes).map_err(|e| StoreError::Decode(format!("utf-8: {e}")))
}

fn parse_file(body: &str) -> Result<Blob, StoreError> {
    let file: FileResponse = serde_json::from_str(body).map_err(|e| StoreError::Decode(e.to_string()))?;
    Ok(Blob { content: decode_content(&file.content)?, version: VersionToken(file.sha), url: file.html_url })
}

fn parse_put(body: &str) -> Result<WriteReceipt, StoreError> {
    let response: PutResponse = serde_json::from_str(body).map_err(|e| StoreError::Decode(e.to_string()))?;
    Ok(WriteReceipt { version: VersionToken(response.content.sha), url: response.content.html_url })
}

fn parse_listing(body: &str) -> Result<Vec<Entry>, StoreError> {
    let items: Vec<ListingItem> = serde_json::from_str(body).map_err(|e| StoreError::Decode(e.to_string()))?;
    Ok(items
        .into_iter()
        .filter(|item| item.kind == "file" && item.name.ends_with(".json"))
        .map(|item| Entry { path: item.path, name: item.name })
        .collect())
}

#[cfg(test)]
#[path = "github_test.rs"]
mod tests;
