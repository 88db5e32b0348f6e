use super::Inputs;
use crate::cli::Cli;
use crate::domain::models::CheckListing;
use crate::services::output::print_out;
use crate::services::runner::matches_filter;
use crate::suites::Suite;

pub fn handle_list(cli: &Cli, inputs: &Inputs, suites: &[Suite]) -> anyhow::Result<()> {
    let listings: Vec<CheckListing> = suites
        .iter()
        .flat_map(|suite| {
            suite
                .checks(&inputs.settings, &inputs.vars)
                .into_iter()
                .filter(|c| matches_filter(&c.name, cli.only.as_deref()))
                .map(move |c| CheckListing {
                    suite: suite.name().to_string(),
                    name: c.name,
                })
                .collect::<Vec<_>>()
        })
        .collect();
    print_out(cli.json, &listings, |l| format!("{}\t{}", l.suite, l.name))
}
