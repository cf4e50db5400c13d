//! Shared helpers for the integration suite.

#![allow(dead_code)]

use anyhow::{Context, Result};
use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Stand-in for `coffee --stdio --print [--bare]`.
///
/// Strips backticks like embedded JavaScript does, wraps the output unless
/// `--bare` is given and fails on sources containing `SYNTAX ERROR`.
pub const FAKE_COFFEE: &str = r#"#!/bin/sh
bare=0
for arg in "$@"; do
  [ "$arg" = "--bare" ] && bare=1
done
input=$(cat)
if printf '%s' "$input" | grep -q 'SYNTAX ERROR'; then
  echo "[stdin]:2:1: error: unexpected SYNTAX" >&2
  exit 1
fi
[ $bare -eq 0 ] && printf '(function() {\n'
printf '%s\n' "$input" | tr -d '`'
[ $bare -eq 0 ] && printf '}).call(this);\n'
exit 0
"#;

/// Stand-in for `uglifyjs --compress --mangle`: squeezes whitespace.
pub const FAKE_UGLIFY: &str = r#"#!/bin/sh
tr -s '[:space:]' ' '
"#;

/// A project directory with a config file, base directories and fake tools.
pub struct TestProject {
    _temp_dir: TempDir,
    root: PathBuf,
}

impl TestProject {
    /// Create an empty project.
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path().join("site");
        fs::create_dir_all(&root)?;
        Ok(Self {
            _temp_dir: temp_dir,
            root,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Write a file below the project root, creating parents.
    pub fn write(&self, relative: &str, content: &str) -> Result<PathBuf> {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    pub fn read(&self, relative: &str) -> Result<String> {
        let path = self.path(relative);
        fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
    }

    /// Write percolate.toml.
    pub fn write_config(&self, content: &str) -> Result<PathBuf> {
        self.write("percolate.toml", content)
    }

    /// Install the fake `coffee` and `uglifyjs` scripts under `tools/`.
    #[cfg(unix)]
    pub fn install_fake_tools(&self) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        for (name, script) in [("coffee", FAKE_COFFEE), ("uglifyjs", FAKE_UGLIFY)] {
            let path = self.write(&format!("tools/{name}"), script)?;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
        }
        Ok(())
    }

    /// A `percolate` command running in the project root.
    pub fn percolate(&self) -> Command {
        let mut cmd = Command::cargo_bin("percolate").expect("percolate binary is built");
        cmd.current_dir(&self.root).env("NO_COLOR", "1").env_remove("PERCOLATE_CONFIG").env_remove("RUST_LOG");
        cmd
    }
}

/// Config wiring the fake tools to an `app` and a `debug` profile.
pub const FAKE_TOOLS_CONFIG: &str = r#"
base_dir = "global"
coffee_bin = "tools/coffee"
uglify_bin = "tools/uglifyjs"

[output.app]
template = "main"
base_dir = "app"
output_dir = "public/js"
output_file = "app.js"
compiled = true
compression = "uglify"

[output.app.vars]
version = "1.0.0"

[output.debug]
template = "main"
base_dir = "app"
output_dir = "public/js"
output_file = "app.debug.js"
depth = 2
"#;

/// A small app using mixins, templates, raw scripts and a variable, laid out
/// as `app/` with a `global/` fallback.
pub const SAMPLE_APP: &[(&str, &str)] = &[
    (
        "app/main.coffee",
        "{% mixins([\"strings\", \"helpers/*\"]) %}\n{% templates(\"list\") %}\n{% raw(\"legacy\") %}\nVERSION = '{% var(\"version\") %}'\nmain = ->\n\tTemplates.list(items: [])\n",
    ),
    ("app/mixins/strings.coffee", "_.mixin\n  capitalize: (s) -> s.toUpperCase()"),
    ("app/mixins/helpers/dom.coffee", "_.mixin\n  byId: (id) -> document.getElementById(id)"),
    ("app/templates/list.jst", "<ul><% _.each(items, function(i) { %><li><%= i %></li><% }) %></ul>"),
    ("global/raw/legacy.js", "window.legacy = {ready: true};"),
];

/// Write [`SAMPLE_APP`] into `project`.
pub fn write_sample_app(project: &TestProject) -> Result<()> {
    for (path, content) in SAMPLE_APP {
        project.write(path, content)?;
    }
    Ok(())
}
