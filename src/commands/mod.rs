//! Command handler layer.
//!
//! This module owns CLI-oriented orchestration and output wiring.
//!
//! ## Files
//! - `verify.rs` — daemon/mount/all suite runs.
//! - `list.rs` — check listing without host access.
//!
//! ## Principles
//! - Load settings and variables once, here.
//! - Delegate checking to `suites/*` and `services/*`.
//! - Keep behavior and output schema stable.

pub mod list;
pub mod verify;

pub use list::handle_list;
pub use verify::handle_verify;

use crate::cli::{Cli, SuiteTarget};
use crate::domain::vars::Variables;
use crate::services::settings::Settings;
use crate::services::vars;
use crate::suites::Suite;
use anyhow::Context;

/// Settings and variables shared by every command.
pub struct Inputs {
    pub settings: Settings,
    pub vars: Variables,
}

impl Inputs {
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let settings = Settings::load_or_default(cli.config.as_deref())
            .context("loading settings")?;
        let vars = vars::load_or_default(cli.vars.as_deref()).context("loading variables")?;
        Ok(Inputs { settings, vars })
    }
}

pub fn suites_for(target: SuiteTarget) -> &'static [Suite] {
    match target {
        SuiteTarget::All => &[Suite::Daemon, Suite::Mount],
        SuiteTarget::Daemon => &[Suite::Daemon],
        SuiteTarget::Mount => &[Suite::Mount],
    }
}
