use super::HostError;
use serde::Deserialize;
use std::path::Path;
use std::process::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Dpkg,
    Rpm,
    Pacman,
    Apk,
}

const DPKG_STATUS: &str = "var/lib/dpkg/status";
const APK_INSTALLED: &str = "lib/apk/db/installed";
const RPM_DBS: [&str; 2] = ["var/lib/rpm", "usr/lib/sysimage/rpm"];
const PACMAN_DB: &str = "var/lib/pacman";

impl PackageManager {
    /// Picks the manager whose database exists under `root` (`/` when unset).
    pub fn detect(root: Option<&Path>) -> Option<Self> {
        let base = root.unwrap_or_else(|| Path::new("/"));
        if base.join(DPKG_STATUS).is_file() {
            Some(PackageManager::Dpkg)
        } else if base.join(APK_INSTALLED).is_file() {
            Some(PackageManager::Apk)
        } else if RPM_DBS.iter().any(|db| base.join(db).is_dir()) {
            Some(PackageManager::Rpm)
        } else if base.join(PACMAN_DB).join("local").is_dir() {
            Some(PackageManager::Pacman)
        } else {
            None
        }
    }

    pub fn is_installed(self, name: &str, root: Option<&Path>) -> Result<bool, HostError> {
        let base = root.unwrap_or_else(|| Path::new("/"));
        match self {
            PackageManager::Dpkg => {
                let status = read_db(&base.join(DPKG_STATUS))?;
                Ok(dpkg_installed(&status, name))
            }
            PackageManager::Apk => {
                let db = read_db(&base.join(APK_INSTALLED))?;
                Ok(db.lines().any(|l| l.strip_prefix("P:") == Some(name)))
            }
            PackageManager::Rpm => {
                let mut cmd = Command::new("rpm");
                if let Some(root) = root {
                    cmd.arg("--root").arg(root);
                }
                cmd.args(["-q", "--quiet", name]);
                exits_zero(cmd, "rpm -q")
            }
            PackageManager::Pacman => {
                let mut cmd = Command::new("pacman");
                cmd.arg("--dbpath").arg(base.join(PACMAN_DB));
                cmd.args(["-Q", name]);
                exits_zero(cmd, "pacman -Q")
            }
        }
    }
}

fn read_db(path: &Path) -> Result<String, HostError> {
    std::fs::read_to_string(path).map_err(|source| HostError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn exits_zero(mut cmd: Command, label: &str) -> Result<bool, HostError> {
    let out = cmd.output().map_err(|source| HostError::Spawn {
        command: label.to_string(),
        source,
    })?;
    Ok(out.status.success())
}

/// A package counts as installed when its stanza has `Status: ... installed`.
fn dpkg_installed(status: &str, name: &str) -> bool {
    status.split("\n\n").any(|stanza| {
        let mut matches_name = false;
        let mut installed = false;
        for line in stanza.lines() {
            if let Some(pkg) = line.strip_prefix("Package:") {
                matches_name = pkg.trim() == name;
            } else if let Some(st) = line.strip_prefix("Status:") {
                installed = st.split_whitespace().last() == Some("installed");
            }
        }
        matches_name && installed
    })
}
