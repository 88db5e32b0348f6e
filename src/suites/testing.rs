use crate::host::{
    CommandOutput, FileObservation, GroupObservation, Host, HostError, PackageObservation,
};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

/// In-memory host for suite tests. Unknown commands exit 127.
#[derive(Default)]
pub struct FakeHost {
    pub packages: HashSet<String>,
    pub groups: HashSet<String>,
    pub files: HashMap<String, (FileObservation, String)>,
    pub commands: HashMap<String, CommandOutput>,
    pub runs: RefCell<Vec<(String, bool)>>,
}

impl FakeHost {
    pub fn with_package(mut self, name: &str) -> Self {
        self.packages.insert(name.to_string());
        self
    }

    pub fn with_group(mut self, name: &str) -> Self {
        self.groups.insert(name.to_string());
        self
    }

    pub fn with_file(self, path: &str, user: &str, group: &str, mode: u32, content: &str) -> Self {
        self.with_entry(path, user, group, mode, content, false)
    }

    pub fn with_dir(self, path: &str, user: &str, group: &str, mode: u32) -> Self {
        self.with_entry(path, user, group, mode, "", true)
    }

    fn with_entry(
        mut self,
        path: &str,
        user: &str,
        group: &str,
        mode: u32,
        content: &str,
        is_directory: bool,
    ) -> Self {
        let obs = FileObservation {
            path: path.to_string(),
            exists: true,
            is_file: !is_directory,
            is_directory,
            user: user.to_string(),
            group: group.to_string(),
            mode,
        };
        self.files
            .insert(path.to_string(), (obs, content.to_string()));
        self
    }

    pub fn with_command(mut self, command: &str, rc: i32, stderr: &str) -> Self {
        self.commands.insert(
            command.to_string(),
            CommandOutput {
                command: command.to_string(),
                rc,
                stdout: String::new(),
                stderr: stderr.to_string(),
            },
        );
        self
    }

    pub fn remove(&mut self, path: &str) {
        self.files.remove(path);
    }

    pub fn set_mode(&mut self, path: &str, mode: u32) {
        if let Some((obs, _)) = self.files.get_mut(path) {
            obs.mode = mode;
        }
    }

    pub fn set_content(&mut self, path: &str, content: &str) {
        if let Some((_, c)) = self.files.get_mut(path) {
            *c = content.to_string();
        }
    }
}

impl Host for FakeHost {
    fn package(&self, name: &str) -> Result<PackageObservation, HostError> {
        Ok(PackageObservation {
            is_installed: self.packages.contains(name),
        })
    }

    fn file(&self, path: &str) -> Result<FileObservation, HostError> {
        Ok(self
            .files
            .get(path)
            .map(|(obs, _)| obs.clone())
            .unwrap_or_else(|| FileObservation::missing(path)))
    }

    fn content(&self, path: &str) -> Result<String, HostError> {
        self.files
            .get(path)
            .map(|(_, c)| c.clone())
            .ok_or_else(|| HostError::Io {
                path: path.into(),
                source: std::io::ErrorKind::NotFound.into(),
            })
    }

    fn group(&self, name: &str) -> Result<GroupObservation, HostError> {
        Ok(GroupObservation {
            exists: self.groups.contains(name),
        })
    }

    fn run(&self, command: &str, sudo: bool) -> Result<CommandOutput, HostError> {
        self.runs.borrow_mut().push((command.to_string(), sudo));
        Ok(self
            .commands
            .get(command)
            .cloned()
            .unwrap_or_else(|| CommandOutput {
                command: command.to_string(),
                rc: 127,
                stdout: String::new(),
                stderr: format!("sh: {}: not found", command),
            }))
    }
}
