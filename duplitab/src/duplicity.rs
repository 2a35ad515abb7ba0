//! Running the duplicity executable.
//!
//! Every call spawns one process and blocks until it exits. stdout and
//! stderr are captured through a single pipe, so the text keeps the order
//! duplicity wrote it in. Timeouts are enforced by duplicity itself through
//! its `--timeout` option.

use crate::config::DuplicityConfig;
use crate::status::CollectionStatus;
use crate::{DuplitabError, Result};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// Handle for invoking duplicity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Duplicity {
    program: PathBuf,
    global_args: Vec<OsString>,
    env: BTreeMap<String, String>,
    timeout_seconds: Option<u64>,
}

impl Default for Duplicity {
    fn default() -> Self {
        Self::new("duplicity")
    }
}

impl Duplicity {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            global_args: Vec::new(),
            env: BTreeMap::new(),
            timeout_seconds: None,
        }
    }

    pub fn from_config(config: &DuplicityConfig) -> Self {
        Self {
            program: config.program.clone(),
            global_args: config.global_args.iter().map(OsString::from).collect(),
            env: config.env.clone(),
            timeout_seconds: config.timeout_seconds,
        }
    }

    /// Add an argument passed before every command.
    pub fn global_arg(mut self, arg: impl Into<OsString>) -> Self {
        self.global_args.push(arg.into());
        self
    }

    /// Set an environment variable for the process, e.g. `PASSPHRASE`.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Timeout used when a call does not pass its own.
    pub fn default_timeout(mut self, seconds: Option<u64>) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Run duplicity with `args` and return its merged output.
    ///
    /// `--timeout <seconds>` is inserted ahead of `args` when a timeout is
    /// given here or configured on the handle; zero means none. A non-zero
    /// exit yields [`DuplitabError::CommandFailed`] carrying the output.
    pub fn run<I, S>(&self, args: I, timeout_seconds: Option<u64>) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let timeout_seconds = timeout_seconds.filter(|s| *s > 0).or(self.timeout_seconds);
        let args = self.command_args(args, timeout_seconds);

        debug!(
            "Running {} {}",
            self.program.display(),
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let (mut reader, writer) = std::io::pipe()?;

        let mut command = Command::new(&self.program);
        command
            .args(&args)
            .envs(&self.env)
            .stdin(Stdio::null())
            .stdout(writer.try_clone()?)
            .stderr(writer);

        let mut child = command.spawn().map_err(|source| DuplitabError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        // The command still holds the write ends; reading would never see EOF.
        drop(command);

        let mut raw = Vec::new();
        let read = reader.read_to_end(&mut raw);
        let status = child.wait()?;
        read?;

        let output = String::from_utf8_lossy(&raw).into_owned();

        if status.success() {
            debug!("duplicity finished, {} bytes of output", raw.len());
            Ok(output)
        } else {
            warn!("duplicity exited with {}", status);
            Err(DuplitabError::CommandFailed {
                status: status.code(),
                output,
            })
        }
    }

    /// Request and parse the status of the collection at `url`.
    pub fn collection_status(
        &self,
        url: &str,
        timeout_seconds: Option<u64>,
    ) -> Result<CollectionStatus> {
        let text = self.run(["collection-status", url], timeout_seconds)?;
        Ok(CollectionStatus::parse(&text)?)
    }

    fn command_args<I, S>(&self, args: I, timeout_seconds: Option<u64>) -> Vec<OsString>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let mut all = self.global_args.clone();
        if let Some(seconds) = timeout_seconds.filter(|s| *s > 0) {
            all.push("--timeout".into());
            all.push(seconds.to_string().into());
        }
        all.extend(args.into_iter().map(Into::into));
        all
    }
}
