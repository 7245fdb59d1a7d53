use crate::config::AppConfig;
use crate::errors::{AppError, AppResult};
use crate::gitlab::GitLab;
use crate::utils::pubkeys::load_public_keys_from_files;
use clap::Args;
use std::path::PathBuf;
use tracing::info;

/// Download validator public key files from a GitLab project
#[derive(Args)]
pub struct DownloadKeysCommand {
    /// GitLab instance URL (overrides config.toml)
    #[arg(long)]
    pub gitlab_url: Option<String>,

    /// Private access token (overrides config.toml)
    #[arg(long)]
    pub token: Option<String>,

    /// Project id holding the key files
    #[arg(long)]
    pub project_id: Option<u64>,

    /// Directory inside the repository
    #[arg(long)]
    pub dir_path: Option<String>,

    /// Branch or tag to read from
    #[arg(long)]
    pub branch: Option<String>,

    /// Only keep files whose name matches this pattern (repeatable)
    #[arg(long = "include")]
    pub include: Vec<String>,

    /// Local scratch directory, wiped before download
    #[arg(long)]
    pub tmp_dir: Option<PathBuf>,

    /// After downloading, count the keys in files starting with this prefix
    #[arg(long)]
    pub prefix: Option<String>,
}

impl DownloadKeysCommand {
    pub async fn run(&self) -> AppResult<()> {
        let mut gitlab_config = AppConfig::get_defaults().gitlab;

        if let Some(url) = &self.gitlab_url {
            gitlab_config.url = url.clone();
        }
        if let Some(token) = &self.token {
            gitlab_config.token = token.clone();
        }
        if let Some(project_id) = self.project_id {
            gitlab_config.project_id = Some(project_id);
        }
        if let Some(dir_path) = &self.dir_path {
            gitlab_config.dir_path = dir_path.clone();
        }
        if let Some(branch) = &self.branch {
            gitlab_config.branch = branch.clone();
        }
        if !self.include.is_empty() {
            gitlab_config.include_only_files = self.include.clone();
        }
        if let Some(tmp_dir) = &self.tmp_dir {
            gitlab_config.tmp_dir = tmp_dir.clone();
        }

        let project_id = gitlab_config.project_id.ok_or_else(|| {
            AppError::Config(
                "GitLab project id is required (--project-id or WEB3_UTILS_GITLAB__PROJECT_ID)"
                    .to_string(),
            )
        })?;

        info!(
            "Downloading {} @ {} from project {}",
            gitlab_config.dir_path, gitlab_config.branch, project_id
        );
        let gitlab = GitLab::connect(&gitlab_config)?;
        let files = gitlab
            .download_files_from_project(
                project_id,
                &gitlab_config.dir_path,
                &gitlab_config.branch,
                Some(gitlab_config.include_only_files.as_slice()),
            )
            .await?;

        for file in &files {
            println!("{}", file.display());
        }

        if let Some(prefix) = &self.prefix {
            let keys = load_public_keys_from_files(prefix, gitlab.tmp_dir())?;
            println!("{} keys in files starting with '{}'", keys.len(), prefix);
        }
        Ok(())
    }
}
