use super::{collect, package_installed, read_existing};
use crate::domain::constants::{SETGID_BIT, SMBUSERADD_MODE, SMB_CONF_MODE};
use crate::domain::vars::{ShareSpec, UserSpec, Variables};
use crate::host::Host;
use crate::services::assertions::{
    expect_contains, expect_exit, expect_file, CheckResult, Expect, Failure, Kind, Verdict,
};
use crate::services::runner::Check;
use crate::services::settings::{render_command, Settings};

pub fn checks<'a>(settings: &'a Settings, vars: &'a Variables) -> Vec<Check<'a>> {
    let mut checks = vec![
        Check::new("samba_package", move |host| {
            package_installed(host, &settings.packages.daemon)
        }),
        Check::new("smbclient_command", move |host| client_tool(host, settings)),
        Check::new("samba_group", move |host| share_group(host, settings)),
        Check::new("smb_conf_file", move |host| config_file(host, settings)),
        Check::new("smb_conf_global", move |host| global_section(host, settings)),
        Check::new("smb_conf_valid", move |host| config_valid(host, settings)),
        Check::new("smbuseradd_script", move |host| helper_script(host, settings)),
    ];

    for share in &vars.config_smbshares {
        checks.push(Check::new(
            format!("share_directory[{}]", share.name),
            move |host| share_directory(host, settings, share),
        ));
    }
    for share in &vars.config_smbshares {
        checks.push(Check::new(
            format!("share_config[{}]", share.name),
            move |host| share_config(host, settings, share),
        ));
    }
    for user in &vars.config_smbusers {
        checks.push(Check::new(
            format!("samba_user[{}]", user.name),
            move |host| daemon_user(host, settings, user),
        ));
    }

    checks.push(Check::new("smbd_startable", move |host| {
        daemon_startable(host, settings)
    }));
    checks
}

fn client_tool(host: &dyn Host, settings: &Settings) -> CheckResult {
    let tool = &settings.packages.client_tool;
    let cmd = render_command(
        &settings.commands.client_tool_lookup,
        &[("tool", tool.as_str())],
    );
    let out = host.run(&cmd, false)?;
    if out.rc == 0 {
        Ok(Verdict::Pass)
    } else {
        Err(Failure::Missing {
            subject: format!("{} command", tool),
        }
        .into())
    }
}

fn share_group(host: &dyn Host, settings: &Settings) -> CheckResult {
    let name = &settings.accounts.share_group;
    if host.group(name)?.exists {
        Ok(Verdict::Pass)
    } else {
        Err(Failure::Missing {
            subject: format!("group {}", name),
        }
        .into())
    }
}

fn config_file(host: &dyn Host, settings: &Settings) -> CheckResult {
    let path = &settings.paths.smb_conf;
    let expect = Expect::of(Kind::File)
        .owned_by(
            &settings.accounts.privileged_user,
            &settings.accounts.privileged_group,
        )
        .mode(SMB_CONF_MODE);
    expect_file(&host.file(path)?, path, &expect)?;
    Ok(Verdict::Pass)
}

fn global_section(host: &dyn Host, settings: &Settings) -> CheckResult {
    let path = &settings.paths.smb_conf;
    let content = read_existing(host, path)?;
    collect(
        settings
            .daemon
            .required_directives
            .iter()
            .filter_map(|d| expect_contains(&content, path, d).err())
            .collect(),
    )
}

/// Runs even when the file is missing so the validator's own error is reported.
fn config_valid(host: &dyn Host, settings: &Settings) -> CheckResult {
    let conf = host.locate(&settings.paths.smb_conf);
    let cmd = render_command(&settings.commands.validate, &[("smb_conf", conf.as_str())]);
    expect_exit(&host.run(&cmd, false)?, &[0])?;
    Ok(Verdict::Pass)
}

fn helper_script(host: &dyn Host, settings: &Settings) -> CheckResult {
    let path = &settings.paths.smbuseradd;
    let expect = Expect::of(Kind::File)
        .owned_by(
            &settings.accounts.privileged_user,
            &settings.accounts.privileged_group,
        )
        .mode(SMBUSERADD_MODE);
    expect_file(&host.file(path)?, path, &expect)?;
    Ok(Verdict::Pass)
}

fn share_directory(host: &dyn Host, settings: &Settings, share: &ShareSpec) -> CheckResult {
    let obs = host.file(&share.path)?;
    if !obs.exists && !settings.daemon.strict_shares {
        return Ok(Verdict::Skip(format!("{} not created yet", share.path)));
    }
    let expect = Expect::of(Kind::Directory)
        .group(&settings.accounts.share_group)
        .with_bits(SETGID_BIT);
    expect_file(&obs, &share.path, &expect)?;
    Ok(Verdict::Pass)
}

fn share_config(host: &dyn Host, settings: &Settings, share: &ShareSpec) -> CheckResult {
    let path = &settings.paths.smb_conf;
    let content = read_existing(host, path)?;
    let section = format!("[{}]", share.name);
    collect(
        [section.as_str(), share.path.as_str()]
            .into_iter()
            .filter_map(|needle| expect_contains(&content, path, needle).err())
            .collect(),
    )
}

fn daemon_user(host: &dyn Host, settings: &Settings, user: &UserSpec) -> CheckResult {
    let cmd = render_command(
        &settings.commands.user_lookup,
        &[("user", user.name.as_str())],
    );
    let out = host.run(&cmd, settings.commands.use_sudo)?;
    match out.rc {
        0 => Ok(Verdict::Pass),
        _ if out.stderr.trim().is_empty() => Err(Failure::Missing {
            subject: format!("samba user {} in the daemon user database", user.name),
        }
        .into()),
        rc => Err(Failure::Subprocess {
            command: out.command.clone(),
            rc,
            stderr: out.stderr.trim_end().to_string(),
        }
        .into()),
    }
}

fn daemon_startable(host: &dyn Host, settings: &Settings) -> CheckResult {
    let conf = host.locate(&settings.paths.smb_conf);
    let cmd = render_command(
        &settings.commands.daemon_start,
        &[("smb_conf", conf.as_str())],
    );
    let out = host.run(&cmd, false)?;
    match expect_exit(&out, &settings.commands.daemon_start_accepted_rc)? {
        0 => Ok(Verdict::Pass),
        rc => Ok(Verdict::PassWith(format!(
            "exit status {} tolerated (daemon already active)",
            rc
        ))),
    }
}


#[cfg(test)]
mod proptest_tests {
    use super::*;
    use crate::domain::models::CheckStatus;
    use crate::services::runner::run_suite;
    use crate::suites::testing::FakeHost;
    use proptest::prelude::*;

    fn shares() -> impl Strategy<Value = Vec<ShareSpec>> {
        prop::collection::btree_set("[a-z][a-z0-9_-]{0,11}", 1..6).prop_map(|names| {
            names
                .into_iter()
                .map(|name| ShareSpec {
                    path: format!("/srv/{}", name),
                    name,
                })
                .collect()
        })
    }

    fn host_for(shares: &[ShareSpec], mode: u32) -> FakeHost {
        let mut conf = String::from(
            "[global]\n   server role = standalone server\n   logging = systemd\n",
        );
        for share in shares {
            conf.push_str(&format!("\n[{}]\n   path = {}\n", share.name, share.path));
        }
        let mut host = FakeHost::default()
            .with_package("samba")
            .with_group("samba")
            .with_file("/etc/samba/smb.conf", "root", "root", 0o644, &conf)
            .with_file("/usr/bin/smbuseradd", "root", "root", 0o755, "#!/bin/sh\n")
            .with_command("command -v smbclient", 0, "")
            .with_command("testparm -s /etc/samba/smb.conf", 0, "")
            .with_command(
                "smbd -D --configfile=/etc/samba/smb.conf --option='server role check:inhibit=yes' -S",
                0,
                "",
            );
        for share in shares {
            host = host.with_dir(&share.path, "root", "samba", mode);
        }
        host
    }

    proptest! {
        #[test]
        fn clearing_setgid_fails_exactly_that_share_directory(
            shares in shares(),
            pick in any::<prop::sample::Index>(),
            mode in prop::sample::select(vec![0o2775u32, 0o2770, 0o2755, 0o2750]),
        ) {
            let settings = Settings::default();
            let vars = Variables {
                config_smbshares: shares.clone(),
                ..Default::default()
            };
            let mut host = host_for(&shares, mode);
            let report = run_suite("daemon", &host, &checks(&settings, &vars), None);
            prop_assert!(report.is_ok(), "{:?}", report.checks);

            let cleared = pick.get(&shares);
            host.set_mode(&cleared.path, mode & !SETGID_BIT);
            let report = run_suite("daemon", &host, &checks(&settings, &vars), None);
            let failed: Vec<_> = report
                .checks
                .iter()
                .filter(|c| c.status == CheckStatus::Failed)
                .map(|c| c.name.clone())
                .collect();
            prop_assert_eq!(failed, vec![format!("share_directory[{}]", cleared.name)]);
        }
    }
}
