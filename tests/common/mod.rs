//! Shared fixtures: a throwaway repository with shell scripts standing in for
//! the wrapped tools and a `.hookwrap.toml` that points at them.
#![allow(dead_code)]

use hookwrap_lib::config::Config;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const ERR_C: &str = "#include <stdio.h>\nint main(){int i;return;}";
pub const ERR_C_FORMATTED: &str = "#include <stdio.h>\nint main() {\n  int i;\n  return;\n}";
pub const OK_C: &str = "int main() { return 0; }\n";

pub struct Workspace {
    pub dir: TempDir,
    global: Vec<String>,
    tools: Vec<(String, String)>,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        // Keeps config discovery from leaving the fixture
        fs::create_dir(dir.path().join(".git")).unwrap();
        Self {
            dir,
            global: Vec::new(),
            tools: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.path().join(name)).unwrap()
    }

    /// Install a fake `tool`. The script sees the hook argv as `$@`, and `$f`
    /// holds the last argument (normally the target file).
    pub fn fake_tool(&mut self, tool: &str, body: &str) -> PathBuf {
        self.fake_tool_with(tool, body, &[])
    }

    /// Like [`Workspace::fake_tool`] with extra `[tools.<tool>]` keys.
    pub fn fake_tool_with(&mut self, tool: &str, body: &str, extra: &[&str]) -> PathBuf {
        let bin = self.path().join("bin");
        fs::create_dir_all(&bin).unwrap();
        let script = bin.join(format!("fake-{tool}"));
        fs::write(&script, format!("#!/bin/sh\nfor f; do :; done\n{body}\n")).unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let mut table = format!("[tools.{tool}]\nbinary = {:?}\n", script.to_string_lossy());
        for line in extra {
            table.push_str(line);
            table.push('\n');
        }
        self.tools.retain(|(name, _)| name != tool);
        self.tools.push((tool.to_string(), table));
        self.write_config();
        script
    }

    /// Add a line to the `[global]` table.
    pub fn global(&mut self, line: &str) -> &mut Self {
        self.global.push(line.to_string());
        self.write_config();
        self
    }

    pub fn config_path(&self) -> PathBuf {
        self.path().join(".hookwrap.toml")
    }

    pub fn config(&self) -> Config {
        Config::from_file(&self.config_path()).unwrap()
    }

    fn write_config(&self) {
        let mut content = String::new();
        if !self.global.is_empty() {
            content.push_str("[global]\n");
            for line in &self.global {
                content.push_str(line);
                content.push('\n');
            }
            content.push('\n');
        }
        for (_, table) in &self.tools {
            content.push_str(table);
            content.push('\n');
        }
        fs::write(self.config_path(), content).unwrap();
    }

    /// The hookwrap binary, run from the workspace root.
    pub fn hookwrap(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::Command::new(env!("CARGO_BIN_EXE_hookwrap"));
        cmd.current_dir(self.path()).env_remove("RUST_LOG");
        cmd
    }
}

/// Formatter stand-in that prints `ERR_C_FORMATTED` for any file.
pub fn google_style_script() -> String {
    format!("printf '{}'", ERR_C_FORMATTED.replace('\n', "\\n"))
}

pub fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}
