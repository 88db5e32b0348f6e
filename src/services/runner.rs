use crate::domain::models::{CheckItem, CheckStatus, VerifyReport};
use crate::host::Host;
use crate::services::assertions::{CheckResult, Verdict};
use tracing::{info, warn};

type Inspect<'a> = Box<dyn Fn(&dyn Host) -> CheckResult + 'a>;

/// A named, independent predicate over host state.
pub struct Check<'a> {
    pub name: String,
    inspect: Inspect<'a>,
}

impl<'a> Check<'a> {
    pub fn new(name: impl Into<String>, inspect: impl Fn(&dyn Host) -> CheckResult + 'a) -> Self {
        Check {
            name: name.into(),
            inspect: Box::new(inspect),
        }
    }

    pub fn evaluate(&self, host: &dyn Host) -> CheckItem {
        let (status, detail) = match (self.inspect)(host) {
            Ok(Verdict::Pass) => (CheckStatus::Ok, None),
            Ok(Verdict::PassWith(note)) => (CheckStatus::Ok, Some(note)),
            Ok(Verdict::Skip(reason)) => (CheckStatus::Skipped, Some(reason)),
            Err(failure) => (CheckStatus::Failed, Some(failure.to_string())),
        };
        match status {
            CheckStatus::Failed => warn!(
                check = %self.name,
                detail = detail.as_deref().unwrap_or_default(),
                "check failed"
            ),
            _ => info!(check = %self.name, status = status.as_str(), "check finished"),
        }
        CheckItem {
            name: self.name.clone(),
            status,
            detail,
        }
    }
}

pub fn matches_filter(name: &str, only: Option<&str>) -> bool {
    only.map(|prefix| name.starts_with(prefix)).unwrap_or(true)
}

/// Evaluates every selected check in order; a failing check never stops
/// the ones after it.
pub fn run_suite(
    suite: &str,
    host: &dyn Host,
    checks: &[Check<'_>],
    only: Option<&str>,
) -> VerifyReport {
    info!(suite, total = checks.len(), "running suite");
    let items = checks
        .iter()
        .filter(|c| matches_filter(&c.name, only))
        .map(|c| c.evaluate(host))
        .collect();
    let report = VerifyReport::from_checks(suite, items);
    info!(
        suite,
        passed = report.passed,
        failed = report.failed,
        skipped = report.skipped,
        "suite finished"
    );
    report
}
