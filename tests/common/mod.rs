#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::os::unix::fs::{MetadataExt, PermissionsExt};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const SMB_CONF: &str = "\
[global]
   server role = standalone server
   logging = systemd
   map to guest = never

[data]
   path = /srv/data
   valid users = @samba
";

pub const FSTAB: &str = "\
UUID=0a1b / ext4 defaults 0 1
//nas/media /mnt/media cifs credentials=/etc/.smbcreds-nas,vers=3.1.1,uid=1000 0 0
";

pub const PROC_MOUNTS: &str = "\
/dev/vda1 / ext4 rw,relatime 0 0
//nas/media /mnt/media cifs rw,relatime,vers=3.1.1,cache=strict 0 0
";

const VARS: &str = "\
config_smbshares:
  - name: data
    path: /srv/data
config_smbusers:
  - name: alice
mount_dirs:
  - path: /mnt/media
    src: //nas/media
    credentials: nas
    opts: vers=3.1.1,uid=1000
mount_used_creds: [nas]
mount_credentials:
  nas:
    username: media
    password: s3cret
";

// Fixture files belong to the caller, so the fixture account files map the
// caller's uid and gid to root, and the share group is pointed at root too.
// Commands stand in for the Samba tools.
const SETTINGS: &str = r#"
[accounts]
share_group = "root"

[packages]
manager = "dpkg"

[commands]
use_sudo = false
client_tool_lookup = "true"
validate = "test -f {smb_conf}"
user_lookup = "test {user} = alice"
daemon_start = "test -f {smb_conf} && exit 1"
"#;

const DPKG_STATUS: &str = "\
Package: samba
Status: install ok installed
Version: 2:4.17.12

Package: cifs-utils
Status: install ok installed
Version: 2:7.0
";

/// A provisioned daemon and mount host laid out under a temporary root.
pub struct TestEnv {
    _tmp: TempDir,
    pub root: PathBuf,
    pub settings: PathBuf,
    pub vars: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let root = tmp.path().join("root");
        fs::create_dir_all(&root).expect("create fixture root");

        let settings = tmp.path().join("smbverify.toml");
        fs::write(&settings, SETTINGS).expect("write settings");
        let vars = tmp.path().join("vars.yml");
        fs::write(&vars, VARS).expect("write vars");

        let env = Self {
            _tmp: tmp,
            root,
            settings,
            vars,
        };
        env.provision();
        env
    }

    fn provision(&self) {
        let meta = fs::metadata(&self.root).expect("stat fixture root");
        let (uid, gid) = (meta.uid(), meta.gid());
        self.write(
            "etc/passwd",
            &format!("root:x:{uid}:{gid}:root:/root:/bin/sh\n"),
            0o644,
        );
        self.write("etc/group", &format!("root:x:{gid}:\n"), 0o644);
        self.write("var/lib/dpkg/status", DPKG_STATUS, 0o644);

        self.write("etc/samba/smb.conf", SMB_CONF, 0o644);
        self.write("usr/bin/smbuseradd", "#!/bin/sh\nexit 0\n", 0o755);
        self.mkdir("srv/data", 0o2775);

        self.mkdir("mnt/media", 0o755);
        self.write("etc/.smbcreds-nas", "Username=media\nPassword=s3cret\n", 0o600);
        self.write("etc/fstab", FSTAB, 0o644);
        self.write("proc/mounts", PROC_MOUNTS, 0o444);
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    pub fn write(&self, rel: &str, content: &str, mode: u32) {
        let p = self.path(rel);
        if let Some(parent) = p.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        if p.exists() {
            chmod(&p, 0o644);
        }
        fs::write(&p, content).expect("write fixture file");
        chmod(&p, mode);
    }

    pub fn mkdir(&self, rel: &str, mode: u32) {
        let p = self.path(rel);
        fs::create_dir_all(&p).expect("create fixture dir");
        chmod(&p, mode);
    }

    pub fn chmod(&self, rel: &str, mode: u32) {
        chmod(&self.path(rel), mode);
    }

    pub fn remove(&self, rel: &str) {
        let p = self.path(rel);
        if p.is_dir() {
            fs::remove_dir_all(p).expect("remove fixture dir");
        } else {
            fs::remove_file(p).expect("remove fixture file");
        }
    }

    pub fn append_settings(&self, extra: &str) {
        let mut s = fs::read_to_string(&self.settings).expect("read settings");
        s.push_str(extra);
        fs::write(&self.settings, s).expect("write settings");
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("smbverify");
        cmd.env_remove("SMBVERIFY_VARS")
            .env_remove("SMBVERIFY_CONFIG")
            .env_remove("RUST_LOG")
            .arg("--root")
            .arg(&self.root)
            .arg("--config")
            .arg(&self.settings)
            .arg("--vars")
            .arg(&self.vars);
        cmd
    }

    /// Runs with `--json` and returns the parsed envelope and exit code.
    pub fn run_json(&self, args: &[&str]) -> (Value, i32) {
        let out = self
            .cmd()
            .arg("--json")
            .args(args)
            .output()
            .expect("run smbverify");
        let code = out.status.code().expect("exit code");
        let json = serde_json::from_slice(&out.stdout).expect("valid json output");
        (json, code)
    }
}

fn chmod(path: &Path, mode: u32) {
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).expect("chmod fixture");
}

/// Status and detail of a named check in a single-suite report.
pub fn check<'a>(report: &'a Value, name: &str) -> (&'a str, Option<&'a str>) {
    let item = report["data"]["checks"]
        .as_array()
        .expect("checks array")
        .iter()
        .find(|c| c["name"] == name)
        .unwrap_or_else(|| panic!("check {name} in report"));
    (
        item["status"].as_str().expect("status"),
        item["detail"].as_str(),
    )
}

pub fn failed_names(report: &Value) -> Vec<String> {
    report["data"]["checks"]
        .as_array()
        .expect("checks array")
        .iter()
        .filter(|c| c["status"] == "failed")
        .map(|c| c["name"].as_str().unwrap_or_default().to_string())
        .collect()
}
