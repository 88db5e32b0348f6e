use super::{collect, package_installed, read_existing, read_optional};
use crate::domain::constants::{CREDENTIALS_MODE, MOUNT_DIR_MODE};
use crate::domain::vars::{MountDirSpec, Variables};
use crate::host::Host;
use crate::services::assertions::{
    expect_contains, expect_file, CheckFailure, CheckResult, Expect, Failure, Kind, Verdict,
};
use crate::services::runner::Check;
use crate::services::settings::Settings;
use tracing::debug;

pub fn checks<'a>(settings: &'a Settings, vars: &'a Variables) -> Vec<Check<'a>> {
    let mut checks = vec![Check::new("cifs_utils_package", move |host| {
        package_installed(host, &settings.packages.mount_client)
    })];

    for mount in &vars.mount_dirs {
        checks.push(Check::new(
            format!("mount_directory[{}]", mount.path),
            move |host| mount_directory(host, mount),
        ));
    }

    let used = vars.used_credentials();
    for key in used.iter().copied() {
        checks.push(Check::new(
            format!("credentials_file[{}]", key),
            move |host| credentials_file(host, settings, key),
        ));
    }
    for key in used.iter().copied() {
        checks.push(Check::new(
            format!("credentials_content[{}]", key),
            move |host| credentials_content(host, settings, vars, key),
        ));
    }

    for mount in &vars.mount_dirs {
        checks.push(Check::new(
            format!("mount_present[{}]", mount.path),
            move |host| mount_present(host, settings, mount),
        ));
    }
    for mount in &vars.mount_dirs {
        checks.push(Check::new(
            format!("mount_options[{}]", mount.path),
            move |host| mount_options(host, settings, mount),
        ));
    }
    checks
}

fn mount_directory(host: &dyn Host, mount: &MountDirSpec) -> CheckResult {
    let expect = Expect::of(Kind::Directory).mode(MOUNT_DIR_MODE);
    expect_file(&host.file(&mount.path)?, &mount.path, &expect)?;
    Ok(Verdict::Pass)
}

fn credentials_file(host: &dyn Host, settings: &Settings, key: &str) -> CheckResult {
    let path = settings.paths.credentials_file(key);
    let expect = Expect::of(Kind::File)
        .owned_by(
            &settings.accounts.privileged_user,
            &settings.accounts.privileged_group,
        )
        .mode(CREDENTIALS_MODE);
    expect_file(&host.file(&path)?, &path, &expect)?;
    Ok(Verdict::Pass)
}

fn credentials_content(
    host: &dyn Host,
    settings: &Settings,
    vars: &Variables,
    key: &str,
) -> CheckResult {
    let record = vars
        .mount_credentials
        .get(key)
        .ok_or_else(|| Failure::Missing {
            subject: format!("credential record {:?} in mount_credentials", key),
        })?;
    let path = settings.paths.credentials_file(key);
    let content = read_existing(host, &path)?;

    let mut failures = Vec::new();
    if let Err(f) = expect_contains(&content, &path, &format!("Username={}", record.username)) {
        failures.push(f);
    }
    if !content.contains(&format!("Password={}", record.password)) {
        failures.push(Failure::MissingSecret {
            subject: path.clone(),
            key: "Password",
        });
    }
    collect(failures)
}

/// Uncommented lines of a mount table that mention source, target and type.
fn matching_lines<'t>(
    table: &'t str,
    mount: &'t MountDirSpec,
    fs_type: &'t str,
) -> impl Iterator<Item = &'t str> {
    table.lines().filter(move |line| {
        !line.trim_start().starts_with('#')
            && line.contains(mount.src.as_str())
            && line.contains(mount.path.as_str())
            && line.contains(fs_type)
    })
}

fn table_has_entry(
    host: &dyn Host,
    table: &str,
    mount: &MountDirSpec,
    fs_type: &str,
) -> Result<bool, CheckFailure> {
    let Some(content) = read_optional(host, table)? else {
        debug!(table, "mount table absent");
        return Ok(false);
    };
    let found = matching_lines(&content, mount, fs_type).next().is_some();
    Ok(found)
}

/// Persistent OR live: either table alone satisfies the check.
fn mount_present(host: &dyn Host, settings: &Settings, mount: &MountDirSpec) -> CheckResult {
    let fs_type = settings.mount.fs_type.as_str();
    let persistent = table_has_entry(host, &settings.paths.fstab, mount, fs_type)?;
    let live = table_has_entry(host, &settings.paths.live_mounts, mount, fs_type)?;
    match (persistent, live) {
        (true, true) => Ok(Verdict::Pass),
        (true, false) => Ok(Verdict::PassWith(format!(
            "configured in {} but not currently mounted",
            settings.paths.fstab
        ))),
        (false, true) => Ok(Verdict::PassWith(format!(
            "mounted but not in {}",
            settings.paths.fstab
        ))),
        (false, false) => Err(Failure::Missing {
            subject: format!(
                "mount {} -> {} in {} or {}",
                mount.src, mount.path, settings.paths.fstab, settings.paths.live_mounts
            ),
        }
        .into()),
    }
}

fn mount_options(host: &dyn Host, settings: &Settings, mount: &MountDirSpec) -> CheckResult {
    let fstab = &settings.paths.fstab;
    let Some(content) = read_optional(host, fstab)? else {
        return Ok(Verdict::Skip(format!("{} does not exist", fstab)));
    };
    let Some(line) = matching_lines(&content, mount, &settings.mount.fs_type).next() else {
        return Ok(Verdict::Skip(format!("no entry in {}", fstab)));
    };

    debug!(
        path = %mount.path,
        entry = line.trim(),
        declared = %mount.opts,
        "fstab entry found"
    );
    let subject = format!("{} entry {:?}", fstab, line.trim());
    let credentials = settings.paths.credentials_file(&mount.credentials);
    collect(
        [credentials.as_str(), settings.mount.required_option.as_str()]
            .into_iter()
            .filter_map(|needle| expect_contains(line, &subject, needle).err())
            .collect(),
    )
}
