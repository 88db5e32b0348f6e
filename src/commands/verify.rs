use super::Inputs;
use crate::cli::Cli;
use crate::host::LocalHost;
use crate::services::output::print_reports;
use crate::services::runner::run_suite;
use crate::suites::Suite;

/// Runs `suites` against the local host. Returns whether every check passed
/// or was skipped.
pub fn handle_verify(cli: &Cli, inputs: &Inputs, suites: &[Suite]) -> anyhow::Result<bool> {
    let host = LocalHost::new(
        cli.root.clone(),
        inputs.settings.packages.manager,
        inputs.settings.commands.use_sudo,
    );

    let reports: Vec<_> = suites
        .iter()
        .map(|suite| {
            let checks = suite.checks(&inputs.settings, &inputs.vars);
            run_suite(suite.name(), &host, &checks, cli.only.as_deref())
        })
        .collect();

    print_reports(cli.json, &reports)?;
    Ok(reports.iter().all(|r| r.is_ok()))
}
