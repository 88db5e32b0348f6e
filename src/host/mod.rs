//! Host inspection layer.
//!
//! Every suite talks to the machine under test through the [`Host`] trait.
//! Observations are taken on demand and never cached: each assertion
//! re-queries the host.
//!
//! ## Files
//! - `local.rs` — [`LocalHost`], the running machine (optionally under a root prefix).
//! - `accounts.rs` — uid/gid to name resolution and group lookup.
//! - `packages.rs` — package manager detection and installation queries.

pub mod accounts;
pub mod local;
pub mod packages;

pub use local::LocalHost;

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageObservation {
    pub is_installed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupObservation {
    pub exists: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileObservation {
    pub path: String,
    pub exists: bool,
    pub is_file: bool,
    pub is_directory: bool,
    pub user: String,
    pub group: String,
    /// Permission bits including setuid/setgid/sticky (`st_mode & 0o7777`).
    pub mode: u32,
}

impl FileObservation {
    pub fn missing(path: &str) -> Self {
        FileObservation {
            path: path.to_string(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub command: String,
    pub rc: i32,
    pub stdout: String,
    pub stderr: String,
}

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("failed to inspect {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` was terminated by a signal")]
    Signaled { command: String },
    #[error("account lookup failed: {0}")]
    Accounts(#[from] nix::Error),
    #[error("no supported package manager found (looked for dpkg, rpm, pacman, apk)")]
    NoPackageManager,
    #[error("{path} is not valid UTF-8")]
    NotUtf8 { path: String },
}

/// Read-only view of the machine under test.
pub trait Host {
    fn package(&self, name: &str) -> Result<PackageObservation, HostError>;

    fn file(&self, path: &str) -> Result<FileObservation, HostError>;

    /// Text content of a regular file.
    fn content(&self, path: &str) -> Result<String, HostError>;

    fn group(&self, name: &str) -> Result<GroupObservation, HostError>;

    /// Runs `command` through `/bin/sh -c`, elevated when `sudo` is set.
    fn run(&self, command: &str, sudo: bool) -> Result<CommandOutput, HostError>;

    /// Location of `path` as seen by commands run on this host.
    fn locate(&self, path: &str) -> String {
        path.to_string()
    }
}

/// Single-quotes `value` for `/bin/sh`.
pub fn shell_quote(value: &str) -> String {
    if !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:@%+,".contains(c))
    {
        return value.to_string();
    }
    format!("'{}'", value.replace('\'', r"'\''"))
}
