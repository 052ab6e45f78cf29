use std::{fmt, path::PathBuf, str::FromStr};

use crate::error::{BuildError, Result};

pub const DEFAULT_GIT_HOST: &str = "github.com";
pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_WORK_DIR: &str = "./tempproject";
pub const DEFAULT_DIST_DIR: &str = "./dist";
pub const DEFAULT_BUILD_OUTPUT: &str = "dist";

/// An `owner/name` repository reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    owner: String,
    name: String,
}

impl RepoSlug {
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name, also the checkout directory name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FromStr for RepoSlug {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = value.trim().trim_end_matches(".git");
        let valid_part = |part: &str| {
            !part.is_empty()
                && part != "."
                && part != ".."
                && part
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        };

        match trimmed.split_once('/') {
            Some((owner, name)) if valid_part(owner) && valid_part(name) => Ok(Self {
                owner: owner.to_string(),
                name: name.to_string(),
            }),
            _ => Err(format!("expected a repository as owner/name, got {value:?}")),
        }
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Settings for one site build run.
///
/// The token is never printed: `Debug` masks it and every URL meant for
/// humans goes through [`BuildConfig::redacted_url`].
#[derive(Clone)]
pub struct BuildConfig {
    pub repo: RepoSlug,
    pub git_host: String,
    pub branch: String,
    pub work_dir: PathBuf,
    pub dist_dir: PathBuf,
    /// Build output directory, relative to the checkout.
    pub build_output: PathBuf,
    token: String,
}

impl BuildConfig {
    /// Config with default host, branch and directories. Fails with
    /// [`BuildError::MissingToken`] when no usable token is given.
    pub fn new(repo: RepoSlug, token: Option<String>) -> Result<Self> {
        let token = token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(BuildError::MissingToken)?;

        Ok(Self {
            repo,
            git_host: DEFAULT_GIT_HOST.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            work_dir: PathBuf::from(DEFAULT_WORK_DIR),
            dist_dir: PathBuf::from(DEFAULT_DIST_DIR),
            build_output: PathBuf::from(DEFAULT_BUILD_OUTPUT),
            token,
        })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn checkout_dir(&self) -> PathBuf {
        self.work_dir.join(self.repo.name())
    }

    /// Clone URL carrying the token as userinfo.
    pub fn authenticated_url(&self) -> String {
        format!(
            "https://{}@{}/{}.git",
            urlencoding::encode(&self.token),
            self.git_host,
            self.repo
        )
    }

    pub fn redacted_url(&self) -> String {
        format!("https://***@{}/{}.git", self.git_host, self.repo)
    }
}

impl fmt::Debug for BuildConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildConfig")
            .field("repo", &self.repo)
            .field("git_host", &self.git_host)
            .field("branch", &self.branch)
            .field("work_dir", &self.work_dir)
            .field("dist_dir", &self.dist_dir)
            .field("build_output", &self.build_output)
            .field("token", &"***")
            .finish()
    }
}
