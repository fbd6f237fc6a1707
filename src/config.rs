use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{ActionError, Result};

/// File name looked up in the working directory and the user config directory.
pub const CONFIG_FILE_NAME: &str = "release-bump.toml";

/// Placeholder in [`ReplacementRule::files`] that expands to the discovered autoload file.
pub const AUTOLOAD_PLACEHOLDER: &str = "{autoload}";

/// Placeholder in [`ReplacementRule::replace`] that expands to the resolved version.
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// Represents the complete configuration for release-bump.
///
/// Built once at the process boundary and passed by reference to every component.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_commit_message")]
    pub commit_message: String,

    #[serde(default)]
    pub commit_disabled: bool,

    /// Prefix marking release branches, e.g. `release/`. Empty disables branch triggers.
    #[serde(default)]
    pub branch_prefix: String,

    /// Prefix marking test tags, stripped before version validation.
    #[serde(default)]
    pub test_tag_prefix: String,

    /// Explicit version that wins over anything derived from the trigger.
    #[serde(default)]
    pub next_version: String,

    #[serde(default = "default_autoload_extension")]
    pub autoload_extension: String,

    #[serde(default = "default_replacements")]
    pub replacements: Vec<ReplacementRule>,
}

/// One substitution applied to a set of files.
///
/// `pattern` is a regular expression; `replace` may reference capture groups
/// (`${1}`) and the `{version}` placeholder.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReplacementRule {
    pub files: Vec<String>,
    pub pattern: String,
    pub replace: String,
}

impl ReplacementRule {
    pub fn new(files: &[&str], pattern: &str, replace: &str) -> Self {
        ReplacementRule {
            files: files.iter().map(|f| f.to_string()).collect(),
            pattern: pattern.to_string(),
            replace: replace.to_string(),
        }
    }
}

fn default_commit_message() -> String {
    "feat: update version".to_string()
}

fn default_autoload_extension() -> String {
    "php".to_string()
}

/// Returns the default substitution rules for a WordPress-style plugin layout.
fn default_replacements() -> Vec<ReplacementRule> {
    vec![
        ReplacementRule::new(
            &[AUTOLOAD_PLACEHOLDER],
            r"(?mR)^(.*Version\s*:\s*)v?\d+(?:\.\d+)*$",
            "${1}{version}",
        ),
        ReplacementRule::new(
            &["readme.txt"],
            r"(?mR)^(\s*Stable tag\s*:\s*)v?\d+(?:\.\d+)*$",
            "${1}{version}",
        ),
        ReplacementRule::new(
            &["update.json", "package.json"],
            r#"("version"\s*:\s*")v?\d+(?:\.\d+)*(")"#,
            "${1}{version}${2}",
        ),
    ]
}

impl Default for Config {
    fn default() -> Self {
        Config {
            commit_message: default_commit_message(),
            commit_disabled: false,
            branch_prefix: String::new(),
            test_tag_prefix: String::new(),
            next_version: String::new(),
            autoload_extension: default_autoload_extension(),
            replacements: default_replacements(),
        }
    }
}

impl Config {
    /// Overlays action inputs (`INPUT_*` variables) on top of the loaded configuration.
    ///
    /// `lookup` returns the raw input value for a variable name. Inputs that are
    /// absent leave the current value untouched.
    pub fn with_inputs<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(message) = lookup("INPUT_COMMIT_MESSAGE").filter(|m| !m.trim().is_empty()) {
            self.commit_message = message;
        }
        if let Some(disabled) = lookup("INPUT_COMMIT_DISABLED") {
            self.commit_disabled = parse_bool_input(&disabled);
        }
        if let Some(prefix) = lookup("INPUT_BRANCH_PREFIX") {
            self.branch_prefix = prefix.trim().to_string();
        }
        if let Some(prefix) = lookup("INPUT_TEST_TAG_PREFIX") {
            self.test_tag_prefix = prefix.trim().to_string();
        }
        if let Some(version) = lookup("INPUT_NEXT_VERSION") {
            self.next_version = version.trim().to_string();
        }
        self
    }

    /// Overlays action inputs read from the process environment.
    pub fn with_env_inputs(self) -> Self {
        self.with_inputs(|name| std::env::var(name).ok())
    }

    /// Rejects configurations that cannot produce a commit.
    pub fn validate(&self) -> Result<()> {
        if self.commit_message.trim().is_empty() {
            return Err(ActionError::config("commit_message must not be empty"));
        }
        for rule in &self.replacements {
            regex::Regex::new(&rule.pattern)?;
        }
        Ok(())
    }
}

/// Interprets an action input as a boolean.
///
/// Empty, `0`, `false`, `no`, `n` and `off` (case-insensitive) are false.
pub fn parse_bool_input(value: &str) -> bool {
    !matches!(
        value.trim().to_lowercase().as_str(),
        "" | "0" | "false" | "no" | "n" | "off"
    )
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `release-bump.toml` in current directory
/// 3. `.release-bump.toml` in user config directory
/// 4. Default configuration if no file found
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new(CONFIG_FILE_NAME).exists() {
        fs::read_to_string(CONFIG_FILE_NAME)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(format!(".{}", CONFIG_FILE_NAME));
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    toml::from_str(&config_str).map_err(|e| ActionError::config(e.to_string()))
}
