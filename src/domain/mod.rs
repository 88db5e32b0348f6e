//! Shared data model layer (structs/constants only).
//!
//! ## Purpose
//! - Keep variable specs and report structs in one place.
//! - Avoid cyclic imports between host inspection, suites and commands.
//! - Make JSON output schema changes explicit and reviewable.
//!
//! ## Files
//! - `models.rs` — report/output structs.
//! - `vars.rs` — externally supplied share/user/mount/credential specs.
//! - `constants.rs` — canonical paths, accounts and policy literals.
//!
//! ## Rule of thumb
//! Domain types should be data-only: no filesystem/process side effects.
//!
//! ## Compatibility note
//! Changes in `models.rs` affect `--json` output and
//! `docs/contracts/verify-report.schema.json`. Keep them synchronized.

pub mod constants;
pub mod models;
pub mod vars;
