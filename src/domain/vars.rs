use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Provisioning variables the suites verify against.
///
/// Unknown keys are ignored so a full inventory vars file can be passed as-is.
#[derive(Debug, Default, Deserialize)]
pub struct Variables {
    #[serde(default)]
    pub config_smbshares: Vec<ShareSpec>,
    #[serde(default)]
    pub config_smbusers: Vec<UserSpec>,
    #[serde(default)]
    pub mount_dirs: Vec<MountDirSpec>,
    #[serde(default)]
    pub mount_used_creds: Option<BTreeSet<String>>,
    #[serde(default)]
    pub mount_credentials: BTreeMap<String, CredentialRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShareSpec {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserSpec {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MountDirSpec {
    pub path: String,
    pub src: String,
    pub credentials: String,
    /// Options the provisioning run writes into the fstab entry. Logged
    /// alongside the entry; only `vers=` and `credentials=` are asserted.
    pub opts: String,
}

#[derive(Clone, Deserialize)]
pub struct CredentialRecord {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Variables {
    /// Credential keys referenced by at least one mount directory.
    pub fn used_credentials(&self) -> BTreeSet<&str> {
        self.mount_dirs
            .iter()
            .map(|m| m.credentials.as_str())
            .collect()
    }

    /// Keys listed in `mount_used_creds` that no mount references, and
    /// referenced keys missing from it.
    pub fn used_credentials_drift(&self) -> (Vec<&str>, Vec<&str>) {
        let Some(declared) = &self.mount_used_creds else {
            return (vec![], vec![]);
        };
        let used = self.used_credentials();
        let unreferenced = declared
            .iter()
            .map(String::as_str)
            .filter(|k| !used.contains(k))
            .collect();
        let undeclared = used
            .iter()
            .copied()
            .filter(|k| !declared.contains(*k))
            .collect();
        (unreferenced, undeclared)
    }
}
