use std::{
    fmt::{self, Display},
    future::Future,
    io,
    path::{Path, PathBuf},
    process::Stdio,
};

use tokio::process::Command;
use tracing::debug;

use crate::error::{BuildError, Result};

/// Abstract command representation so the pipeline can be tested without
/// spawning processes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub inherit_stdio: bool,
    /// Substrings masked as `***` whenever the command is displayed.
    pub secrets: Vec<String>,
}

/// Command line with secrets masked
impl Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        for secret in self.secrets.iter().filter(|s| !s.is_empty()) {
            line = line.replace(secret.as_str(), "***");
        }
        f.write_str(&line)
    }
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            inherit_stdio: true,
            secrets: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.secrets.push(secret.into());
        self
    }
}

pub fn to_command(spec: &CommandSpec) -> Command {
    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args);
    if let Some(cwd) = &spec.cwd {
        cmd.current_dir(cwd);
    }
    if spec.inherit_stdio {
        cmd.stdin(Stdio::inherit());
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());
    }
    cmd
}

/// Runs external commands for the build pipeline.
pub trait CommandRunner {
    /// Run `spec` to completion, yielding its exit code (`None` when the
    /// process was killed by a signal). `Err` means it could not be started.
    fn run(&self, spec: &CommandSpec) -> impl Future<Output = io::Result<Option<i32>>> + Send;
}

/// Spawns real processes through `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    async fn run(&self, spec: &CommandSpec) -> io::Result<Option<i32>> {
        let status = to_command(spec).status().await?;
        Ok(status.code())
    }
}

/// Run `spec` and turn a start failure or a non-zero exit into a
/// [`BuildError`].
pub async fn run_checked<R: CommandRunner>(runner: &R, spec: &CommandSpec) -> Result<()> {
    debug!(command = %spec, cwd = ?spec.cwd, "Running command");

    match runner.run(spec).await {
        Ok(Some(0)) => Ok(()),
        Ok(code) => Err(BuildError::CommandFailed {
            command: spec.to_string(),
            code,
        }),
        Err(source) => Err(BuildError::Spawn {
            command: spec.to_string(),
            source,
        }),
    }
}
