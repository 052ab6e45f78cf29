//! # albumenctl
//!
//! Builds the Albumen gallery front-end and stages it for deployment:
//! clone (or update) the site repository, `npm install`, `npm run build`,
//! then copy the build output into the dist directory. The temporary
//! checkout is always removed afterwards.
//!
//! ```no_run
//! use albumenctl::{BuildConfig, SiteBuilder, SystemRunner};
//!
//! # async fn run() -> Result<(), albumenctl::BuildError> {
//! let config = BuildConfig::new(
//!     "judy/homescreen".parse().expect("valid repository"),
//!     std::env::var("GITHUB_TOKEN").ok(),
//! )?;
//! let report = SiteBuilder::new(config, SystemRunner).build().await?;
//! println!("{} files staged in {}", report.files_copied, report.dist_dir.display());
//! # Ok(())
//! # }
//! ```
#![allow(missing_docs)]

pub mod commands;
pub mod config;
pub mod copy;
pub mod error;
pub mod pipeline;

pub use commands::{CommandRunner, CommandSpec, SystemRunner};
pub use config::{BuildConfig, RepoSlug};
pub use error::BuildError;
pub use pipeline::{BuildReport, SiteBuilder};
