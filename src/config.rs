//! Tool configuration loader describing how `actool` is launched.

use std::fs;
use std::path::Path;

use serde::Deserialize;

/// File searched for in the working directory when no explicit configuration is given.
pub const DEFAULT_CONFIG_FILE: &str = "compile_xcassets.config.json";

/// Discoverable configuration describing the program used to reach `actool`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Executable to spawn.
    pub program: String,
    /// Arguments placed before the generated `actool` flags.
    pub program_args: Vec<String>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            program: "xcrun".into(),
            program_args: vec!["actool".into()],
        }
    }
}

impl ToolConfig {
    /// Attempt to load configuration from the provided directory.
    ///
    /// A missing file silently yields the defaults; a file that cannot be parsed is reported
    /// through `tracing` and the defaults are used as well.
    pub fn discover(dir: &Path) -> Self {
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if !candidate.exists() {
            return Self::default();
        }

        match Self::from_path(&candidate) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %candidate.display(), error = %err, "ignoring unreadable tool configuration");
                Self::default()
            }
        }
    }

    /// Read configuration from a specific JSON file.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context as _;

        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Configuration launching `program` directly with no leading arguments.
    pub fn direct(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            program_args: Vec::new(),
        }
    }
}
