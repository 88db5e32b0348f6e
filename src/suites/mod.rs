//! Verification suites.
//!
//! - `daemon.rs` — Samba package, configuration, helper script, shares,
//!   users and startability.
//! - `mount.rs` — cifs-utils, mount points, credential files, fstab and
//!   live mount table entries.
//!
//! Suites only build [`Check`] lists from settings and variables; the runner
//! evaluates them against a [`Host`].

pub mod daemon;
pub mod mount;

#[cfg(test)]
pub mod testing;

use crate::domain::vars::Variables;
use crate::host::Host;
use crate::services::assertions::{CheckFailure, CheckResult, Failure, Verdict};
use crate::services::runner::Check;
use crate::services::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suite {
    Daemon,
    Mount,
}

impl Suite {
    pub fn name(self) -> &'static str {
        match self {
            Suite::Daemon => "daemon",
            Suite::Mount => "mount",
        }
    }

    pub fn checks<'a>(self, settings: &'a Settings, vars: &'a Variables) -> Vec<Check<'a>> {
        match self {
            Suite::Daemon => daemon::checks(settings, vars),
            Suite::Mount => mount::checks(settings, vars),
        }
    }
}

fn package_installed(host: &dyn Host, name: &str) -> CheckResult {
    let pkg = host.package(name)?;
    if pkg.is_installed {
        Ok(Verdict::Pass)
    } else {
        Err(Failure::Missing {
            subject: format!("package {}", name),
        }
        .into())
    }
}

/// Content of a file that must exist.
fn read_existing(host: &dyn Host, path: &str) -> Result<String, CheckFailure> {
    if !host.file(path)?.exists {
        return Err(Failure::Missing {
            subject: path.to_string(),
        }
        .into());
    }
    Ok(host.content(path)?)
}

/// Content of an optional file; `None` when it does not exist.
fn read_optional(host: &dyn Host, path: &str) -> Result<Option<String>, CheckFailure> {
    if !host.file(path)?.exists {
        return Ok(None);
    }
    Ok(Some(host.content(path)?))
}

fn collect(failures: Vec<Failure>) -> CheckResult {
    if failures.is_empty() {
        Ok(Verdict::Pass)
    } else {
        Err(CheckFailure(failures))
    }
}
