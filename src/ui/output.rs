use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{formatter, Logger};
use crate::error::Result;

/// Publishes step outputs and exported variables for downstream steps.
///
/// Values go to the files named by `GITHUB_OUTPUT` / `GITHUB_ENV` when the
/// runner provides them, otherwise to the legacy workflow commands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionOutput {
    pub output_file: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
}

impl ActionOutput {
    pub fn from_env() -> Self {
        let path = |name: &str| {
            std::env::var_os(name)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };
        ActionOutput {
            output_file: path("GITHUB_OUTPUT"),
            env_file: path("GITHUB_ENV"),
        }
    }

    pub fn set_output(&self, logger: &Logger, name: &str, value: &str) -> Result<()> {
        match &self.output_file {
            Some(file) => append_key_value(file, name, value),
            None => {
                logger.workflow(formatter::set_output(name, value));
                Ok(())
            }
        }
    }

    pub fn export_variable(&self, logger: &Logger, name: &str, value: &str) -> Result<()> {
        match &self.env_file {
            Some(file) => append_key_value(file, name, value),
            None => {
                logger.workflow(formatter::set_env(name, value));
                Ok(())
            }
        }
    }
}

fn append_key_value(file: &Path, name: &str, value: &str) -> Result<()> {
    let mut handle = OpenOptions::new().create(true).append(true).open(file)?;
    writeln!(handle, "{}={}", name, value)?;
    Ok(())
}
