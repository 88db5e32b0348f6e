pub const SMB_CONF_PATH: &str = "/etc/samba/smb.conf";
pub const SMBUSERADD_PATH: &str = "/usr/bin/smbuseradd";
pub const CREDENTIALS_PREFIX: &str = "/etc/.smbcreds-";
pub const FSTAB_PATH: &str = "/etc/fstab";
pub const LIVE_MOUNTS_PATH: &str = "/proc/mounts";

pub const PRIVILEGED_USER: &str = "root";
pub const PRIVILEGED_GROUP: &str = "root";
pub const SHARE_GROUP: &str = "samba";

pub const DAEMON_PACKAGE: &str = "samba";
pub const DAEMON_CLIENT_TOOL: &str = "smbclient";
pub const MOUNT_CLIENT_PACKAGE: &str = "cifs-utils";

pub const SMB_CONF_MODE: u32 = 0o644;
pub const SMBUSERADD_MODE: u32 = 0o755;
pub const MOUNT_DIR_MODE: u32 = 0o755;
pub const CREDENTIALS_MODE: u32 = 0o600;
pub const SETGID_BIT: u32 = 0o2000;

pub const GLOBAL_DIRECTIVES: [&str; 3] = [
    "[global]",
    "server role = standalone server",
    "logging = systemd",
];

pub const CLIENT_TOOL_COMMAND: &str = "command -v {tool}";
pub const VALIDATE_COMMAND: &str = "testparm -s {smb_conf}";
pub const USER_LOOKUP_COMMAND: &str = "pdbedit -L | grep -q {user}";
pub const DAEMON_START_COMMAND: &str =
    "smbd -D --configfile={smb_conf} --option='server role check:inhibit=yes' -S";
/// `1` means the daemon is already active.
pub const DAEMON_START_ACCEPTED_RC: [i32; 2] = [0, 1];

pub const MOUNT_FS_TYPE: &str = "cifs";
pub const REQUIRED_MOUNT_OPTION: &str = "vers=3.1.1";
