//! GitLab repository file downloader
//!
//! Lists a directory of a project at a given ref, optionally keeps only the
//! files whose names match one of a set of patterns, and writes the decoded
//! blobs into a scratch directory that is wiped before every download.

use crate::config::GitLabConfig;
use crate::errors::{GitLabError, GitLabResult};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Page size for repository tree listings (GitLab maximum)
const TREE_PAGE_SIZE: u32 = 100;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// `<cwd>/tmp/public_keys`
pub fn default_tmp_dir() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("tmp")
        .join("public_keys")
}

/// One entry of a repository tree listing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TreeItem {
    pub id: String,
    pub name: String,
    /// `blob` for files, `tree` for directories
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub path: String,
}

impl TreeItem {
    pub fn is_blob(&self) -> bool {
        self.kind == "blob"
    }
}

/// Raw blob as returned by the API, content base64-encoded
#[derive(Debug, Clone, Deserialize)]
pub struct Blob {
    pub content: String,
}

/// The subset of the GitLab REST API the downloader needs
#[async_trait]
pub trait RepositoryApi: Send + Sync {
    /// Check the token is still accepted
    async fn auth(&self) -> GitLabResult<()>;

    /// Every entry under `path` at `reference`, across all pages
    async fn repository_tree(
        &self,
        project_id: u64,
        path: &str,
        reference: &str,
    ) -> GitLabResult<Vec<TreeItem>>;

    async fn repository_blob(&self, project_id: u64, id: &str) -> GitLabResult<Blob>;
}

/// `reqwest` implementation of [`RepositoryApi`] using a private token
pub struct GitLabApi {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl GitLabApi {
    pub fn new(url: &str, token: &str) -> GitLabResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/v4{}", self.base_url, path)
    }

    async fn get(&self, url: &str, query: &[(&str, String)]) -> GitLabResult<reqwest::Response> {
        debug!("GitLab GET {}", url);
        let response = self
            .client
            .get(url)
            .header("PRIVATE-TOKEN", &self.token)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GitLabError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl RepositoryApi for GitLabApi {
    async fn auth(&self) -> GitLabResult<()> {
        self.get(&self.api_url("/user"), &[]).await?;
        Ok(())
    }

    async fn repository_tree(
        &self,
        project_id: u64,
        path: &str,
        reference: &str,
    ) -> GitLabResult<Vec<TreeItem>> {
        let url = self.api_url(&format!("/projects/{}/repository/tree", project_id));
        let mut items = Vec::new();
        let mut page = 1u32;

        loop {
            let query = [
                ("ref", reference.to_string()),
                ("path", path.to_string()),
                ("per_page", TREE_PAGE_SIZE.to_string()),
                ("page", page.to_string()),
            ];
            let response = self.get(&url, &query).await?;
            let next_page = response
                .headers()
                .get("x-next-page")
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.parse::<u32>().ok());

            let batch: Vec<TreeItem> = response.json().await?;
            let batch_len = batch.len();
            items.extend(batch);

            match next_page {
                Some(next) if batch_len > 0 => page = next,
                _ => break,
            }
        }

        Ok(items)
    }

    async fn repository_blob(&self, project_id: u64, id: &str) -> GitLabResult<Blob> {
        let url = self.api_url(&format!("/projects/{}/repository/blobs/{}", project_id, id));
        Ok(self.get(&url, &[]).await?.json().await?)
    }
}

/// Downloads repository files into a scratch directory
pub struct GitLab<A> {
    api: A,
    tmp_dir: PathBuf,
}

impl GitLab<GitLabApi> {
    pub fn connect(config: &GitLabConfig) -> GitLabResult<Self> {
        let api = GitLabApi::new(&config.url, &config.token)?;
        Ok(Self::new(api, config.tmp_dir.clone()))
    }
}

impl<A: RepositoryApi> GitLab<A> {
    pub fn new(api: A, tmp_dir: impl Into<PathBuf>) -> Self {
        Self {
            api,
            tmp_dir: tmp_dir.into(),
        }
    }

    pub fn tmp_dir(&self) -> &Path {
        &self.tmp_dir
    }

    /// Download the files under `dir_path` at `branch` into the scratch directory
    ///
    /// When `include_only_files` holds at least one pattern, only files whose
    /// name matches a pattern at its start are kept. The scratch directory is
    /// removed and recreated first, so it ends up holding exactly the files of
    /// this download. Returns the written paths in listing order.
    pub async fn download_files_from_project(
        &self,
        project_id: u64,
        dir_path: &str,
        branch: &str,
        include_only_files: Option<&[String]>,
    ) -> GitLabResult<Vec<PathBuf>> {
        self.api.auth().await?;

        let mut items = self.api.repository_tree(project_id, dir_path, branch).await?;
        if let Some(patterns) = include_only_files.filter(|patterns| !patterns.is_empty()) {
            let filters = compile_name_filters(patterns)?;
            items.retain(|item| filters.iter().any(|re| re.is_match(&item.name)));
        }

        self.prepare_temp_directory().await?;

        let mut downloaded = Vec::new();
        for item in items.iter().filter(|item| item.is_blob()) {
            let blob = self.api.repository_blob(project_id, &item.id).await?;
            let content = decode_blob(&item.id, &blob)?;

            let file_path = self.tmp_dir.join(&item.name);
            tokio::fs::write(&file_path, content).await?;
            debug!("Wrote {}", file_path.display());
            downloaded.push(file_path);
        }

        info!(
            "Downloaded {} files from project {} ({} @ {}) into {}",
            downloaded.len(),
            project_id,
            dir_path,
            branch,
            self.tmp_dir.display()
        );
        Ok(downloaded)
    }

    async fn prepare_temp_directory(&self) -> GitLabResult<()> {
        if tokio::fs::try_exists(&self.tmp_dir).await? {
            tokio::fs::remove_dir_all(&self.tmp_dir).await?;
        }
        tokio::fs::create_dir_all(&self.tmp_dir).await?;
        Ok(())
    }
}

/// Patterns match at the start of the name only
fn compile_name_filters(patterns: &[String]) -> GitLabResult<Vec<Regex>> {
    patterns
        .iter()
        .map(|pattern| Regex::new(&format!("^(?:{})", pattern)).map_err(GitLabError::from))
        .collect()
}

fn decode_blob(id: &str, blob: &Blob) -> GitLabResult<String> {
    let encoded: String = blob.content.split_whitespace().collect();
    let bytes = STANDARD.decode(encoded)?;
    String::from_utf8(bytes).map_err(|_| GitLabError::Utf8 { id: id.to_string() })
}
