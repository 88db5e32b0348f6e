use super::HostError;
use nix::unistd::{Gid, Group, Uid, User};
use std::path::{Path, PathBuf};

/// Where user and group names come from.
///
/// `System` asks the running system's account database. `Files` reads
/// `passwd`/`group` files directly, which is what an inspected image root
/// carries.
#[derive(Debug, Clone)]
pub enum AccountDb {
    System,
    Files { passwd: PathBuf, group: PathBuf },
}

impl AccountDb {
    /// Account files under `root` when it carries them, the system otherwise.
    pub fn for_root(root: Option<&Path>) -> Self {
        match root {
            Some(root) if root.join("etc/passwd").is_file() => AccountDb::Files {
                passwd: root.join("etc/passwd"),
                group: root.join("etc/group"),
            },
            _ => AccountDb::System,
        }
    }

    /// Name of `uid`, or the number itself when it has no entry.
    pub fn user_name(&self, uid: u32) -> Result<String, HostError> {
        let found = match self {
            AccountDb::System => User::from_uid(Uid::from_raw(uid))?.map(|u| u.name),
            AccountDb::Files { passwd, .. } => lookup_by_id(passwd, uid)?,
        };
        Ok(found.unwrap_or_else(|| uid.to_string()))
    }

    pub fn group_name(&self, gid: u32) -> Result<String, HostError> {
        let found = match self {
            AccountDb::System => Group::from_gid(Gid::from_raw(gid))?.map(|g| g.name),
            AccountDb::Files { group, .. } => lookup_by_id(group, gid)?,
        };
        Ok(found.unwrap_or_else(|| gid.to_string()))
    }

    pub fn group_exists(&self, name: &str) -> Result<bool, HostError> {
        match self {
            AccountDb::System => Ok(Group::from_name(name)?.is_some()),
            AccountDb::Files { group, .. } => Ok(entries(group)?.any(|(n, _)| n == name)),
        }
    }
}

/// `name:x:id:...` records of a passwd/group style file.
fn entries(path: &Path) -> Result<impl Iterator<Item = (String, u32)>, HostError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(source) => {
            return Err(HostError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    let records: Vec<(String, u32)> = raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .filter_map(|l| {
            let mut fields = l.split(':');
            let name = fields.next()?;
            let id = fields.nth(1)?.parse().ok()?;
            Some((name.to_string(), id))
        })
        .collect();
    Ok(records.into_iter())
}

fn lookup_by_id(path: &Path, id: u32) -> Result<Option<String>, HostError> {
    Ok(entries(path)?.find(|(_, i)| *i == id).map(|(n, _)| n))
}
