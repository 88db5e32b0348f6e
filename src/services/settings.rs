use crate::domain::constants::*;
use crate::host::packages::PackageManager;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Tunables for the suites. Every field defaults to the canonical value, so
/// an empty (or absent) settings file verifies the standard layout.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub accounts: Accounts,
    pub paths: Paths,
    pub packages: Packages,
    pub commands: Commands,
    pub daemon: DaemonPolicy,
    pub mount: MountPolicy,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Accounts {
    pub privileged_user: String,
    pub privileged_group: String,
    pub share_group: String,
}

impl Default for Accounts {
    fn default() -> Self {
        Accounts {
            privileged_user: PRIVILEGED_USER.to_string(),
            privileged_group: PRIVILEGED_GROUP.to_string(),
            share_group: SHARE_GROUP.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Paths {
    pub smb_conf: String,
    pub smbuseradd: String,
    pub credentials_prefix: String,
    pub fstab: String,
    pub live_mounts: String,
}

impl Default for Paths {
    fn default() -> Self {
        Paths {
            smb_conf: SMB_CONF_PATH.to_string(),
            smbuseradd: SMBUSERADD_PATH.to_string(),
            credentials_prefix: CREDENTIALS_PREFIX.to_string(),
            fstab: FSTAB_PATH.to_string(),
            live_mounts: LIVE_MOUNTS_PATH.to_string(),
        }
    }
}

impl Paths {
    pub fn credentials_file(&self, key: &str) -> String {
        format!("{}{}", self.credentials_prefix, key)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Packages {
    /// Forces a package manager instead of detecting one.
    pub manager: Option<PackageManager>,
    pub daemon: String,
    pub client_tool: String,
    pub mount_client: String,
}

impl Default for Packages {
    fn default() -> Self {
        Packages {
            manager: None,
            daemon: DAEMON_PACKAGE.to_string(),
            client_tool: DAEMON_CLIENT_TOOL.to_string(),
            mount_client: MOUNT_CLIENT_PACKAGE.to_string(),
        }
    }
}

/// Shell command templates. `{smb_conf}`, `{user}` and `{tool}` are
/// substituted (shell-quoted) before execution.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Commands {
    pub use_sudo: bool,
    pub client_tool_lookup: String,
    pub validate: String,
    pub user_lookup: String,
    pub daemon_start: String,
    pub daemon_start_accepted_rc: Vec<i32>,
}

impl Default for Commands {
    fn default() -> Self {
        Commands {
            use_sudo: true,
            client_tool_lookup: CLIENT_TOOL_COMMAND.to_string(),
            validate: VALIDATE_COMMAND.to_string(),
            user_lookup: USER_LOOKUP_COMMAND.to_string(),
            daemon_start: DAEMON_START_COMMAND.to_string(),
            daemon_start_accepted_rc: DAEMON_START_ACCEPTED_RC.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DaemonPolicy {
    pub required_directives: Vec<String>,
    /// Fail, instead of skip, share directories that do not exist.
    pub strict_shares: bool,
}

impl Default for DaemonPolicy {
    fn default() -> Self {
        DaemonPolicy {
            required_directives: GLOBAL_DIRECTIVES.iter().map(|d| d.to_string()).collect(),
            strict_shares: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MountPolicy {
    pub fs_type: String,
    pub required_option: String,
}

impl Default for MountPolicy {
    fn default() -> Self {
        MountPolicy {
            fs_type: MOUNT_FS_TYPE.to_string(),
            required_option: REQUIRED_MOUNT_OPTION.to_string(),
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self, SettingsError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Settings::default()),
        }
    }
}

/// Fills `{key}` placeholders in a command template with shell-quoted values.
pub fn render_command(template: &str, values: &[(&str, &str)]) -> String {
    values.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{}}}", key), &crate::host::shell_quote(value))
    })
}
