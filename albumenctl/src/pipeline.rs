use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{info, warn};

use crate::{
    commands::{CommandRunner, CommandSpec, run_checked},
    config::BuildConfig,
    copy::copy_tree,
    error::{BuildError, Result},
};

/// Outcome of a successful build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub files_copied: usize,
    pub dist_dir: PathBuf,
}

/// Fetches the site repository, builds it with npm and stages the build
/// output in the dist directory.
///
/// Steps run strictly in order. The work directory is removed once the run
/// ends, whether it succeeded or not.
#[derive(Debug)]
pub struct SiteBuilder<R> {
    config: BuildConfig,
    runner: R,
}

impl<R: CommandRunner> SiteBuilder<R> {
    pub fn new(config: BuildConfig, runner: R) -> Self {
        Self { config, runner }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub async fn build(&self) -> Result<BuildReport> {
        info!(
            repo = %self.config.repo,
            branch = %self.config.branch,
            "Starting site build"
        );

        let result = self.run_steps().await;
        if let Err(err) = &result {
            warn!("Build failed: {}", err);
        }

        self.cleanup_work_dir();
        result
    }

    async fn run_steps(&self) -> Result<BuildReport> {
        let work_dir = &self.config.work_dir;
        info!("Setting up work directory {}", work_dir.display());
        fs::create_dir_all(work_dir).map_err(|e| {
            BuildError::io(format!("failed to create {}", work_dir.display()), e)
        })?;

        let checkout = self.checkout().await?;

        info!("Cleaning {}", self.config.dist_dir.display());
        reset_dir(&self.config.dist_dir)?;

        info!("Installing dependencies");
        run_checked(
            &self.runner,
            &CommandSpec::new("npm").arg("install").current_dir(&checkout),
        )
        .await?;

        info!("Building site");
        run_checked(
            &self.runner,
            &CommandSpec::new("npm").args(["run", "build"]).current_dir(&checkout),
        )
        .await?;

        let output = checkout.join(&self.config.build_output);
        info!(
            "Copying {} into {}",
            output.display(),
            self.config.dist_dir.display()
        );
        let files_copied = copy_tree(&output, &self.config.dist_dir)?;

        info!(files = files_copied, "Build completed");
        Ok(BuildReport {
            files_copied,
            dist_dir: self.config.dist_dir.clone(),
        })
    }

    /// Clone the repository into the work directory, or hard-reset an
    /// existing checkout to the remote branch.
    async fn checkout(&self) -> Result<PathBuf> {
        let checkout = self.config.checkout_dir();
        let token = self.config.token().to_string();

        if checkout.is_dir() {
            info!(repo = %self.config.repo, "Updating existing checkout");
            run_checked(
                &self.runner,
                &CommandSpec::new("git")
                    .args(["fetch", "origin"])
                    .current_dir(&checkout),
            )
            .await?;
            run_checked(
                &self.runner,
                &CommandSpec::new("git")
                    .args([
                        "reset".to_string(),
                        "--hard".to_string(),
                        format!("origin/{}", self.config.branch),
                    ])
                    .current_dir(&checkout),
            )
            .await?;
        } else {
            info!("Cloning {}", self.config.redacted_url());
            run_checked(
                &self.runner,
                &CommandSpec::new("git")
                    .args([
                        "clone".to_string(),
                        "--branch".to_string(),
                        self.config.branch.clone(),
                        self.config.authenticated_url(),
                        self.config.repo.name().to_string(),
                    ])
                    .current_dir(&self.config.work_dir)
                    .secret(urlencoding::encode(&token).into_owned())
                    .secret(token),
            )
            .await?;
        }

        Ok(checkout)
    }

    fn cleanup_work_dir(&self) {
        let work_dir = &self.config.work_dir;
        if !work_dir.exists() {
            return;
        }

        info!("Cleaning up {}", work_dir.display());
        if let Err(err) = fs::remove_dir_all(work_dir) {
            warn!(
                "Failed to remove work directory {}: {}",
                work_dir.display(),
                err
            );
        }
    }
}

/// Remove `dir` if present and recreate it empty.
fn reset_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir)
            .map_err(|e| BuildError::io(format!("failed to remove {}", dir.display()), e))?;
    }
    fs::create_dir_all(dir)
        .map_err(|e| BuildError::io(format!("failed to create {}", dir.display()), e))
}
