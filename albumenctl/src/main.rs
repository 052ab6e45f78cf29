use std::path::PathBuf;

use albumenctl::{BuildConfig, RepoSlug, SiteBuilder, SystemRunner, config};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "albumenctl")]
#[command(about = "Albumen site tooling")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch, build and stage the gallery front-end
    Build(BuildArgs),
}

#[derive(Args, Debug)]
struct BuildArgs {
    /// Site repository as owner/name (token read from GITHUB_TOKEN)
    #[arg(long, env = "SITE_REPO")]
    repo: RepoSlug,

    /// Git host serving the repository
    #[arg(long, env = "SITE_GIT_HOST", default_value = config::DEFAULT_GIT_HOST)]
    git_host: String,

    /// Branch to build
    #[arg(long, env = "SITE_BRANCH", default_value = config::DEFAULT_BRANCH)]
    branch: String,

    /// Temporary checkout location, removed after the run
    #[arg(long, env = "SITE_WORK_DIR", default_value = config::DEFAULT_WORK_DIR)]
    work_dir: PathBuf,

    /// Directory receiving the built site
    #[arg(long, env = "SITE_DIST_DIR", default_value = config::DEFAULT_DIST_DIR)]
    dist_dir: PathBuf,

    /// Build output directory inside the checkout
    #[arg(long, env = "SITE_BUILD_OUTPUT", default_value = config::DEFAULT_BUILD_OUTPUT)]
    build_output: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before clap reads its env fallbacks
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "albumenctl=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Build(args) => {
            let config = build_config(args)?;
            let report = SiteBuilder::new(config, SystemRunner).build().await?;
            info!(
                "Staged {} files in {}",
                report.files_copied,
                report.dist_dir.display()
            );
        }
    }

    Ok(())
}

fn build_config(args: BuildArgs) -> anyhow::Result<BuildConfig> {
    let mut config = BuildConfig::new(args.repo, std::env::var("GITHUB_TOKEN").ok())?;
    config.git_host = args.git_host;
    config.branch = args.branch;
    config.work_dir = args.work_dir;
    config.dist_dir = args.dist_dir;
    config.build_output = args.build_output;
    Ok(config)
}
