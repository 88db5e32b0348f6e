use super::accounts::AccountDb;
use super::packages::PackageManager;
use super::{
    shell_quote, CommandOutput, FileObservation, GroupObservation, Host, HostError,
    PackageObservation,
};
use std::io::ErrorKind;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// The machine this process runs on.
///
/// With a `root` prefix, absolute paths, account files and package
/// databases are read from under that directory instead of `/`. Commands
/// still execute on the running machine.
pub struct LocalHost {
    root: Option<PathBuf>,
    accounts: AccountDb,
    package_manager: Option<PackageManager>,
    escalate: bool,
    sudo: Vec<String>,
}

impl LocalHost {
    pub fn new(
        root: Option<PathBuf>,
        package_manager: Option<PackageManager>,
        escalate: bool,
    ) -> Self {
        let accounts = AccountDb::for_root(root.as_deref());
        let package_manager =
            package_manager.or_else(|| PackageManager::detect(root.as_deref()));
        debug!(?root, ?package_manager, ?accounts, "local host initialized");
        LocalHost {
            root,
            accounts,
            package_manager,
            escalate,
            sudo: vec!["sudo".to_string(), "-n".to_string()],
        }
    }

    /// Replaces the `sudo -n` prefix used for elevated commands.
    #[cfg(test)]
    fn with_sudo(mut self, argv: &[&str]) -> Self {
        self.sudo = argv.iter().map(|a| a.to_string()).collect();
        self
    }

    fn resolve(&self, path: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(path.trim_start_matches('/')),
            None => PathBuf::from(path),
        }
    }

    fn is_privileged() -> bool {
        nix::unistd::geteuid().is_root()
    }

    fn shell(&self, command: &str, sudo: bool) -> Command {
        match self.sudo.split_first() {
            Some((program, args)) if sudo && !Self::is_privileged() => {
                let mut cmd = Command::new(program);
                cmd.args(args).args(["/bin/sh", "-c", command]);
                cmd
            }
            _ => {
                let mut cmd = Command::new("/bin/sh");
                cmd.args(["-c", command]);
                cmd
            }
        }
    }

    fn io_error(path: &Path, source: std::io::Error) -> HostError {
        HostError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl Host for LocalHost {
    fn package(&self, name: &str) -> Result<PackageObservation, HostError> {
        let pm = self.package_manager.ok_or(HostError::NoPackageManager)?;
        let is_installed = pm.is_installed(name, self.root.as_deref())?;
        debug!(package = name, ?pm, is_installed, "package queried");
        Ok(PackageObservation {
            is_installed,
        })
    }

    /// Existence and type follow symlinks like `test -f`; owner and mode
    /// are those of the path itself like `stat`.
    fn file(&self, path: &str) -> Result<FileObservation, HostError> {
        let resolved = self.resolve(path);
        let target = match std::fs::metadata(&resolved) {
            Ok(meta) => meta,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path, "file missing");
                return Ok(FileObservation::missing(path));
            }
            Err(e) => return Err(Self::io_error(&resolved, e)),
        };
        let meta = std::fs::symlink_metadata(&resolved)
            .map_err(|e| Self::io_error(&resolved, e))?;
        let obs = FileObservation {
            path: path.to_string(),
            exists: true,
            is_file: target.is_file(),
            is_directory: target.is_dir(),
            user: self.accounts.user_name(meta.uid())?,
            group: self.accounts.group_name(meta.gid())?,
            mode: meta.mode() & 0o7777,
        };
        debug!(
            path,
            user = %obs.user,
            group = %obs.group,
            mode = %format!("{:o}", obs.mode),
            symlink = meta.file_type().is_symlink(),
            "file inspected"
        );
        Ok(obs)
    }

    fn content(&self, path: &str) -> Result<String, HostError> {
        let resolved = self.resolve(path);
        match std::fs::read_to_string(&resolved) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == ErrorKind::PermissionDenied && self.escalate => {
                debug!(path, "permission denied, reading through sudo");
                let quoted = shell_quote(&resolved.to_string_lossy());
                match self.run(&format!("cat {}", quoted), true) {
                    Ok(out) if out.rc == 0 => Ok(out.stdout),
                    _ => Err(Self::io_error(&resolved, e)),
                }
            }
            Err(e) if e.kind() == ErrorKind::InvalidData => Err(HostError::NotUtf8 {
                path: path.to_string(),
            }),
            Err(e) => Err(Self::io_error(&resolved, e)),
        }
    }

    fn group(&self, name: &str) -> Result<GroupObservation, HostError> {
        Ok(GroupObservation {
            exists: self.accounts.group_exists(name)?,
        })
    }

    fn run(&self, command: &str, sudo: bool) -> Result<CommandOutput, HostError> {
        let sudo = sudo && self.escalate;
        debug!(command, sudo, "running command");
        let out = self.shell(command, sudo)
            .output()
            .map_err(|source| HostError::Spawn {
                command: command.to_string(),
                source,
            })?;
        let rc = out.status.code().ok_or_else(|| HostError::Signaled {
            command: command.to_string(),
        })?;
        debug!(command, rc, "command finished");
        Ok(CommandOutput {
            command: command.to_string(),
            rc,
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        })
    }

    fn locate(&self, path: &str) -> String {
        self.resolve(path).to_string_lossy().into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    fn rooted() -> (tempfile::TempDir, LocalHost) {
        let tmp = tempfile::TempDir::new().unwrap();
        let host = LocalHost::new(Some(tmp.path().to_path_buf()), None, false);
        (tmp, host)
    }

    #[test]
    fn absolute_paths_resolve_under_root() {
        let (tmp, host) = rooted();
        fs::create_dir_all(tmp.path().join("etc/samba")).unwrap();
        fs::write(tmp.path().join("etc/samba/smb.conf"), "[global]\n").unwrap();
        fs::set_permissions(
            tmp.path().join("etc/samba/smb.conf"),
            fs::Permissions::from_mode(0o640),
        )
        .unwrap();

        let obs = host.file("/etc/samba/smb.conf").unwrap();
        assert!(obs.exists && obs.is_file && !obs.is_directory);
        assert_eq!(obs.mode, 0o640);
        assert_eq!(obs.path, "/etc/samba/smb.conf");
        assert_eq!(host.content("/etc/samba/smb.conf").unwrap(), "[global]\n");
        assert_eq!(
            host.locate("/etc/samba/smb.conf"),
            tmp.path().join("etc/samba/smb.conf").to_string_lossy()
        );
    }

    #[test]
    fn missing_file_is_an_observation_not_an_error() {
        let (_tmp, host) = rooted();
        let obs = host.file("/etc/fstab").unwrap();
        assert!(!obs.exists);
        assert!(host.content("/etc/fstab").is_err());
    }

    #[test]
    fn setgid_bit_is_part_of_mode() {
        let (tmp, host) = rooted();
        let dir = tmp.path().join("srv/share");
        fs::create_dir_all(&dir).unwrap();
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o2775)).unwrap();
        let obs = host.file("/srv/share").unwrap();
        assert!(obs.is_directory);
        assert_eq!(obs.mode, 0o2775);
    }

    #[test]
    fn symlink_reports_its_own_mode_and_target_type() {
        let (tmp, host) = rooted();
        let samba = tmp.path().join("etc/samba");
        fs::create_dir_all(&samba).unwrap();
        fs::write(samba.join("smb.conf.dist"), "[global]\n").unwrap();
        fs::set_permissions(samba.join("smb.conf.dist"), fs::Permissions::from_mode(0o644))
            .unwrap();
        std::os::unix::fs::symlink("smb.conf.dist", samba.join("smb.conf")).unwrap();

        let obs = host.file("/etc/samba/smb.conf").unwrap();
        assert!(obs.exists && obs.is_file);
        assert_eq!(obs.mode, 0o777);
        assert_eq!(host.file("/etc/samba/smb.conf.dist").unwrap().mode, 0o644);
    }

    #[test]
    fn dangling_symlink_is_missing() {
        let (tmp, host) = rooted();
        fs::create_dir_all(tmp.path().join("etc")).unwrap();
        std::os::unix::fs::symlink("nowhere", tmp.path().join("etc/fstab")).unwrap();
        assert!(!host.file("/etc/fstab").unwrap().exists);
    }

    fn unreadable(tmp: &tempfile::TempDir) -> std::path::PathBuf {
        let creds = tmp.path().join("etc/.smbcreds-nas");
        fs::create_dir_all(tmp.path().join("etc")).unwrap();
        fs::write(&creds, "Username=media\n").unwrap();
        fs::set_permissions(&creds, fs::Permissions::from_mode(0o000)).unwrap();
        creds
    }

    #[test]
    fn unreadable_file_is_read_through_sudo_when_escalating() {
        if LocalHost::is_privileged() {
            // root reads the file directly
            return;
        }
        let tmp = tempfile::TempDir::new().unwrap();
        unreadable(&tmp);
        let host = LocalHost::new(Some(tmp.path().to_path_buf()), None, true)
            .with_sudo(&["/bin/sh", "-c", "echo elevated", "--"]);
        assert_eq!(host.content("/etc/.smbcreds-nas").unwrap(), "elevated\n");

        let failing = LocalHost::new(Some(tmp.path().to_path_buf()), None, true)
            .with_sudo(&["/bin/sh", "-c", "exit 1", "--"]);
        assert!(matches!(
            failing.content("/etc/.smbcreds-nas"),
            Err(HostError::Io { source, .. }) if source.kind() == ErrorKind::PermissionDenied
        ));
    }

    #[test]
    fn unreadable_file_is_an_error_without_escalation() {
        if LocalHost::is_privileged() {
            return;
        }
        let (tmp, host) = rooted();
        unreadable(&tmp);
        let host = host.with_sudo(&["/bin/sh", "-c", "echo elevated", "--"]);
        assert!(matches!(
            host.content("/etc/.smbcreds-nas"),
            Err(HostError::Io { source, .. }) if source.kind() == ErrorKind::PermissionDenied
        ));
    }

    #[test]
    fn run_captures_status_and_streams() {
        let (_tmp, host) = rooted();
        let out = host.run("echo out; echo err >&2; exit 3", true).unwrap();
        assert_eq!(out.rc, 3);
        assert_eq!(out.stdout, "out\n");
        assert_eq!(out.stderr, "err\n");
    }

    #[test]
    fn packages_without_database_report_error() {
        let (_tmp, host) = rooted();
        assert!(matches!(
            host.package("samba"),
            Err(HostError::NoPackageManager)
        ));
    }
}
