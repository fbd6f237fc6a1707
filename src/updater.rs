//! Version substitution in the local workspace.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::config::{Config, AUTOLOAD_PLACEHOLDER, VERSION_PLACEHOLDER};
use crate::context::TriggerContext;
use crate::domain::is_valid_context;
use crate::error::{ActionError, Result};
use crate::replace::apply_replacements;
use crate::ui::{formatter, Logger};
use crate::version::resolve_version;

fn autoload_header() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?mR)Version\s*:\s*v?\d+(\.\d+)*$").expect("autoload pattern is valid")
    })
}

/// Finds the file carrying the package version header.
///
/// Scans regular files with the given extension directly under `workspace`
/// (not recursively), in name order, and returns the first one whose content
/// has a `Version: x.y.z` line. The path is relative to `workspace`.
///
/// # Returns
/// * `Ok(path)` - Relative path of the autoload file
/// * `Err(ActionError::AutoloadNotFound)` - If no file carries the header
pub fn find_autoload_file(workspace: &Path, extension: &str) -> Result<String> {
    let mut candidates: Vec<_> = fs::read_dir(workspace)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == extension))
        .collect();
    candidates.sort();

    for path in candidates {
        let Ok(content) = fs::read_to_string(&path) else {
            continue;
        };
        if autoload_header().is_match(&content) {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                return Ok(name.to_string());
            }
        }
    }

    Err(ActionError::AutoloadNotFound {
        dir: workspace.to_path_buf(),
    })
}

/// Writes the resolved version into every configured target file.
///
/// Returns the changed paths in rule order, once per rule that changed the
/// file, so a path may appear several times. An invalid trigger context is a
/// no-op and yields an empty list.
pub fn update_package_version(
    context: &TriggerContext,
    config: &Config,
    workspace: &Path,
    logger: &Logger,
) -> Result<Vec<String>> {
    if !is_valid_context(context, config) {
        return Ok(Vec::new());
    }

    let autoload = find_autoload_file(workspace, &config.autoload_extension)?;
    let version = resolve_version(context, config).version;

    logger.start_group(&format!("Updating version to {}...", version));

    let mut changed = Vec::new();
    for rule in &config.replacements {
        let pattern = Regex::new(&rule.pattern)?;
        let files: Vec<String> = rule
            .files
            .iter()
            .map(|f| f.replace(AUTOLOAD_PLACEHOLDER, &autoload))
            .collect();
        let replacement = rule.replace.replace(VERSION_PLACEHOLDER, &version);

        for result in apply_replacements(workspace, &files, &pattern, &replacement)? {
            logger.info(&formatter::replace_result(&result));
            if result.has_changed {
                changed.push(result.file);
            }
        }
    }

    logger.end_group();
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReplacementRule;
    use crate::context::{EventName, Payload};
    use crate::ui::MemoryReporter;
    use std::sync::Arc;

    const AUTOLOAD: &str = "<?php\n/**\n * Plugin Name: Test\n * Version: 0.0.1\n */\n";

    fn tag_push(tag: &str) -> TriggerContext {
        TriggerContext {
            event_name: EventName::Push,
            git_ref: format!("refs/tags/{}", tag),
            sha: "sha".to_string(),
            repo_owner: "hello".to_string(),
            repo_name: "world".to_string(),
            payload: Payload::default(),
        }
    }

    fn plugin_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("helper.php"), "<?php\necho 'no header';\n").unwrap();
        fs::write(dir.path().join("test.php"), AUTOLOAD).unwrap();
        fs::write(dir.path().join("readme.txt"), "Stable tag: 0.0.1\n").unwrap();
        fs::write(dir.path().join("update.json"), "{\"version\": \"0.0.1\"}\n").unwrap();
        dir
    }

    fn logger() -> (Logger, Arc<MemoryReporter>) {
        let reporter = Arc::new(MemoryReporter::new());
        (Logger::new(reporter.clone()), reporter)
    }

    #[test]
    fn test_find_autoload_file() {
        let dir = plugin_dir();
        assert_eq!(find_autoload_file(dir.path(), "php").unwrap(), "test.php");
    }

    #[test]
    fn test_find_autoload_file_with_crlf_line_endings() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("plugin.php"),
            "<?php\r\n/**\r\n * Version: 1.0.0\r\n */\r\n",
        )
        .unwrap();
        assert_eq!(find_autoload_file(dir.path(), "php").unwrap(), "plugin.php");
    }

    #[test]
    fn test_find_autoload_file_ignores_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src").join("test.php"), AUTOLOAD).unwrap();

        let err = find_autoload_file(dir.path(), "php").unwrap_err();
        assert!(err.is_autoload_not_found());
    }

    #[test]
    fn test_invalid_context_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let (logger, reporter) = logger();

        let changed =
            update_package_version(&tag_push("test"), &Config::default(), dir.path(), &logger)
                .unwrap();

        assert!(changed.is_empty());
        assert!(reporter.lines().is_empty());
    }

    #[test]
    fn test_missing_autoload_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let (logger, _) = logger();

        let err =
            update_package_version(&tag_push("v1.0.0"), &Config::default(), dir.path(), &logger)
                .unwrap_err();
        assert!(err.is_autoload_not_found());
    }

    #[test]
    fn test_updates_all_targets() {
        let dir = plugin_dir();
        let (logger, reporter) = logger();

        let changed =
            update_package_version(&tag_push("v0.0.2"), &Config::default(), dir.path(), &logger)
                .unwrap();

        assert_eq!(changed, vec!["test.php", "readme.txt", "update.json"]);
        assert!(fs::read_to_string(dir.path().join("test.php"))
            .unwrap()
            .contains(" * Version: 0.0.2\n"));
        assert_eq!(
            fs::read_to_string(dir.path().join("update.json")).unwrap(),
            "{\"version\": \"0.0.2\"}\n"
        );
        assert!(reporter.lines().contains(&"> ✔ readme.txt".to_string()));
    }

    #[test]
    fn test_updates_crlf_files_in_place() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("test.php"), AUTOLOAD.replace('\n', "\r\n")).unwrap();
        fs::write(dir.path().join("readme.txt"), "=== Test ===\r\nStable tag: 0.0.1\r\n").unwrap();
        let (logger, _) = logger();

        let changed =
            update_package_version(&tag_push("v0.0.2"), &Config::default(), dir.path(), &logger)
                .unwrap();

        assert_eq!(changed, vec!["test.php", "readme.txt"]);
        assert!(fs::read_to_string(dir.path().join("test.php"))
            .unwrap()
            .contains(" * Version: 0.0.2\r\n"));
        assert_eq!(
            fs::read_to_string(dir.path().join("readme.txt")).unwrap(),
            "=== Test ===\r\nStable tag: 0.0.2\r\n"
        );
    }

    #[test]
    fn test_path_repeats_once_per_rule() {
        let dir = plugin_dir();
        let (logger, _) = logger();
        let mut config = Config::default();
        config.replacements.push(ReplacementRule::new(
            &["{autoload}"],
            r"(Plugin Name: )Test",
            "${1}Renamed {version}",
        ));

        let changed =
            update_package_version(&tag_push("v0.0.2"), &config, dir.path(), &logger).unwrap();

        assert_eq!(
            changed,
            vec!["test.php", "readme.txt", "update.json", "test.php"]
        );
    }

    #[test]
    fn test_second_run_changes_nothing() {
        let dir = plugin_dir();
        let (logger, _) = logger();
        let context = tag_push("v0.0.2");

        let first = update_package_version(&context, &Config::default(), dir.path(), &logger)
            .unwrap();
        let second = update_package_version(&context, &Config::default(), dir.path(), &logger)
            .unwrap();

        assert_eq!(first.len(), 3);
        assert!(second.is_empty());
    }
}
