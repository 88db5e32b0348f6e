//! Service layer containing verification logic and side-effect helpers.
//!
//! ## Service map
//! - `assertions.rs` — failure values and file/content/exit-status assertions.
//! - `runner.rs` — named checks and suite evaluation into a report.
//! - `settings.rs` — TOML settings with canonical defaults.
//! - `vars.rs` — provisioning variables loader (YAML/JSON).
//! - `output.rs` — JSON/text output helpers.
//!
//! ## Conventions
//! - Checks never touch the host directly; they go through `host::Host`.
//! - A failing check is a value, not an early return from the run.

pub mod assertions;
pub mod output;
pub mod runner;
pub mod settings;
pub mod vars;
