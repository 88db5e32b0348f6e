use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "smbverify",
    version,
    about = "Verify Samba daemon provisioning and CIFS client mounts"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        env = "SMBVERIFY_VARS",
        value_name = "FILE",
        help = "Provisioning variables (YAML, or JSON by extension)"
    )]
    pub vars: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        env = "SMBVERIFY_CONFIG",
        value_name = "FILE",
        help = "Settings file (TOML) overriding canonical paths, accounts and commands"
    )]
    pub config: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        value_name = "DIR",
        help = "Inspect files, accounts and packages under this directory instead of /"
    )]
    pub root: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        value_name = "PREFIX",
        help = "Only run checks whose name starts with PREFIX"
    )]
    pub only: Option<String>,
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Verify the Samba daemon host
    Daemon,
    /// Verify CIFS client mounts
    Mount,
    /// Run the daemon and mount suites
    All,
    /// Print the checks that would run for the loaded variables
    List {
        #[arg(value_enum, default_value_t = SuiteTarget::All)]
        suite: SuiteTarget,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SuiteTarget {
    All,
    Daemon,
    Mount,
}
