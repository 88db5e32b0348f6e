//! Assertion primitives shared by the suites.
//!
//! Failures are values: a check returns [`CheckFailure`] carrying one or
//! more [`Failure`]s, each embedding actual and expected values.

use crate::host::{CommandOutput, FileObservation, HostError};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Failure {
    #[error("{subject} does not exist")]
    Missing { subject: String },
    #[error("{subject} is not a {expected}")]
    WrongType {
        subject: String,
        expected: &'static str,
    },
    #[error("{subject} {attribute} is {actual}, expected {expected}")]
    Mismatch {
        subject: String,
        attribute: &'static str,
        actual: String,
        expected: String,
    },
    #[error("{subject} does not contain {needle:?}")]
    MissingContent { subject: String, needle: String },
    /// Like `MissingContent`, without echoing the secret value.
    #[error("{subject} has no {key}= line with the expected value")]
    MissingSecret { subject: String, key: &'static str },
    #[error("`{command}` exited with status {rc}: {stderr}")]
    Subprocess {
        command: String,
        rc: i32,
        stderr: String,
    },
    #[error("{0}")]
    Inspection(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckFailure(pub Vec<Failure>);

impl fmt::Display for CheckFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", failure)?;
        }
        Ok(())
    }
}

impl From<Failure> for CheckFailure {
    fn from(f: Failure) -> Self {
        CheckFailure(vec![f])
    }
}

impl From<HostError> for CheckFailure {
    fn from(e: HostError) -> Self {
        let mut msg = e.to_string();
        let mut source = std::error::Error::source(&e);
        while let Some(s) = source {
            let text = s.to_string();
            if !msg.contains(&text) {
                msg.push_str(": ");
                msg.push_str(&text);
            }
            source = s.source();
        }
        CheckFailure(vec![Failure::Inspection(msg)])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    PassWith(String),
    /// Tolerated absence; counts as a pass.
    Skip(String),
}

pub type CheckResult = Result<Verdict, CheckFailure>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    File,
    Directory,
}

impl Kind {
    fn label(self) -> &'static str {
        match self {
            Kind::File => "regular file",
            Kind::Directory => "directory",
        }
    }
}

/// Expected attributes of a filesystem object. `None` fields are not checked.
#[derive(Debug, Clone, Copy)]
pub struct Expect<'a> {
    pub kind: Kind,
    pub user: Option<&'a str>,
    pub group: Option<&'a str>,
    /// Exact match on the permission bits.
    pub mode: Option<u32>,
    /// Bits that must be set, other bits are free.
    pub required_bits: u32,
}

impl<'a> Expect<'a> {
    pub fn of(kind: Kind) -> Self {
        Expect {
            kind,
            user: None,
            group: None,
            mode: None,
            required_bits: 0,
        }
    }

    pub fn owned_by(mut self, user: &'a str, group: &'a str) -> Self {
        self.user = Some(user);
        self.group = Some(group);
        self
    }

    pub fn group(mut self, group: &'a str) -> Self {
        self.group = Some(group);
        self
    }

    pub fn mode(mut self, mode: u32) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_bits(mut self, bits: u32) -> Self {
        self.required_bits |= bits;
        self
    }
}

pub fn format_mode(mode: u32) -> String {
    format!("0o{:o}", mode)
}

/// Checks existence first, then reports every mismatching attribute.
pub fn expect_file(
    obs: &FileObservation,
    subject: &str,
    expect: &Expect<'_>,
) -> Result<(), CheckFailure> {
    if !obs.exists {
        return Err(Failure::Missing {
            subject: subject.to_string(),
        }
        .into());
    }

    let mut failures = Vec::new();
    let kind_ok = match expect.kind {
        Kind::File => obs.is_file,
        Kind::Directory => obs.is_directory,
    };
    if !kind_ok {
        failures.push(Failure::WrongType {
            subject: subject.to_string(),
            expected: expect.kind.label(),
        });
    }
    let mismatch = |attribute, actual: String, expected: String| Failure::Mismatch {
        subject: subject.to_string(),
        attribute,
        actual,
        expected,
    };
    if let Some(user) = expect.user {
        if obs.user != user {
            failures.push(mismatch("owner", obs.user.clone(), user.to_string()));
        }
    }
    if let Some(group) = expect.group {
        if obs.group != group {
            failures.push(mismatch("group", obs.group.clone(), group.to_string()));
        }
    }
    if let Some(mode) = expect.mode {
        if obs.mode != mode {
            failures.push(mismatch("mode", format_mode(obs.mode), format_mode(mode)));
        }
    }
    if obs.mode & expect.required_bits != expect.required_bits {
        failures.push(mismatch(
            "mode",
            format_mode(obs.mode),
            format!("bits {} set", format_mode(expect.required_bits)),
        ));
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(CheckFailure(failures))
    }
}

pub fn expect_contains(content: &str, subject: &str, needle: &str) -> Result<(), Failure> {
    if content.contains(needle) {
        Ok(())
    } else {
        Err(Failure::MissingContent {
            subject: subject.to_string(),
            needle: needle.to_string(),
        })
    }
}

/// Accepts the exit status if it is in `accepted`; returns it for callers
/// that distinguish between accepted codes.
pub fn expect_exit(out: &CommandOutput, accepted: &[i32]) -> Result<i32, Failure> {
    if accepted.contains(&out.rc) {
        Ok(out.rc)
    } else {
        Err(Failure::Subprocess {
            command: out.command.clone(),
            rc: out.rc,
            stderr: out.stderr.trim_end().to_string(),
        })
    }
}
