//! Pure formatting functions for CI log output.
//!
//! Every function returns the exact line to emit. Workflow commands follow the
//! `::name::message` convention understood by the runner.

use crate::replace::ReplaceResult;

/// Category of an emitted line, used by reporters to decide styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    GroupStart,
    GroupEnd,
    Info,
    Detail,
    Command,
    Warning,
    Error,
    Workflow,
}

/// Escape a message so the runner does not split or truncate it.
pub fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Escape a workflow command property value.
pub fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}

pub fn group_start(title: &str) -> String {
    format!("::group::{}", escape_data(title))
}

pub fn group_end() -> String {
    "::endgroup::".to_string()
}

pub fn info(message: &str) -> String {
    format!("> {}", message)
}

/// An indented detail line below an info or command line.
pub fn detail(message: &str) -> String {
    format!("  >> {}", message)
}

/// Echo of an external command, as the runner prints it.
pub fn command(command_line: &str) -> String {
    format!("[command]{}", command_line)
}

pub fn warning(message: &str) -> String {
    format!("::warning::{}", escape_data(message))
}

pub fn error(message: &str) -> String {
    format!("::error::{}", escape_data(message))
}

/// Legacy output command for runners without `GITHUB_OUTPUT`.
pub fn set_output(name: &str, value: &str) -> String {
    format!(
        "::set-output name={}::{}",
        escape_property(name),
        escape_data(value)
    )
}

/// Legacy environment export command for runners without `GITHUB_ENV`.
pub fn set_env(name: &str, value: &str) -> String {
    format!(
        "::set-env name={}::{}",
        escape_property(name),
        escape_data(value)
    )
}

/// One line per substitution result: a check mark for changed files, a cross otherwise.
pub fn replace_result(result: &ReplaceResult) -> String {
    format!(
        "{} {}",
        if result.has_changed { "✔" } else { "✖" },
        result.file
    )
}
