use crate::domain::vars::Variables;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum VarsError {
    #[error("failed to read variables {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid YAML variables {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid JSON variables {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Loads variables from a `.json` file, or YAML for any other extension.
pub fn load_variables(path: &Path) -> Result<Variables, VarsError> {
    let raw = std::fs::read_to_string(path).map_err(|source| VarsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let is_json = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let vars: Variables = if is_json {
        serde_json::from_str(&raw).map_err(|source| VarsError::Json {
            path: path.to_path_buf(),
            source,
        })?
    } else if raw.trim().is_empty() {
        Variables::default()
    } else {
        serde_yaml::from_str(&raw).map_err(|source| VarsError::Yaml {
            path: path.to_path_buf(),
            source,
        })?
    };
    debug!(
        path = %path.display(),
        shares = vars.config_smbshares.len(),
        users = vars.config_smbusers.len(),
        mounts = vars.mount_dirs.len(),
        credentials = vars.mount_credentials.len(),
        "variables loaded"
    );
    report_credential_drift(&vars);
    Ok(vars)
}

pub fn load_or_default(path: Option<&Path>) -> Result<Variables, VarsError> {
    match path {
        Some(p) => load_variables(p),
        None => {
            warn!("no variables file given; only fixed checks will run");
            Ok(Variables::default())
        }
    }
}

fn report_credential_drift(vars: &Variables) {
    let (unreferenced, undeclared) = vars.used_credentials_drift();
    for key in unreferenced {
        warn!(key, "mount_used_creds lists a credential no mount references; not checked");
    }
    for key in undeclared {
        warn!(key, "credential referenced by a mount is missing from mount_used_creds; checking anyway");
    }
}
