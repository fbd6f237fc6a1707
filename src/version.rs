use std::sync::OnceLock;

use regex::Regex;

use crate::config::Config;
use crate::context::TriggerContext;
use crate::domain::branch::{resolve_branch, version_from_branch};

/// A normalized version string and whether it is usable.
///
/// Valid only when it consists of dot-separated non-negative integers once
/// any test tag prefix and leading `v` have been stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionCandidate {
    pub version: String,
    pub valid: bool,
}

impl VersionCandidate {
    /// Normalizes a raw tag or version string and validates the result.
    pub fn from_raw(raw: &str, config: &Config) -> Self {
        let version = normalize_version(raw, config);
        let valid = is_valid_version(&version);
        VersionCandidate { version, valid }
    }

    /// Validates the part of a release branch after its prefix.
    ///
    /// Only a leading `v` is stripped; the test tag prefix applies to tags alone.
    pub fn from_branch_remainder(remainder: &str) -> Self {
        let version = strip_v(remainder).to_string();
        let valid = is_valid_version(&version);
        VersionCandidate { version, valid }
    }
}

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d+(\.\d+)*$").expect("version pattern is valid"))
}

/// Checks the narrow version profile: `^\d+(\.\d+)*$`.
///
/// Pre-release and build metadata suffixes are rejected.
///
/// # Example
/// ```ignore
/// assert!(is_valid_version("1.2.3"));
/// assert!(is_valid_version("7"));
/// assert!(!is_valid_version("1.2.3-beta"));
/// assert!(!is_valid_version("v1.2.3"));
/// ```
pub fn is_valid_version(version: &str) -> bool {
    version_pattern().is_match(version)
}

/// Whether the tag carries the configured test tag prefix.
pub fn is_test_tag(tag_name: &str, config: &Config) -> bool {
    !config.test_tag_prefix.is_empty() && tag_name.starts_with(&config.test_tag_prefix)
}

/// Strips a single leading `v`.
pub fn strip_v(raw: &str) -> &str {
    raw.strip_prefix('v').unwrap_or(raw)
}

/// Strips the test tag prefix (when present) and a single leading `v`.
pub fn normalize_version(raw: &str, config: &Config) -> String {
    let stripped = if is_test_tag(raw, config) {
        &raw[config.test_tag_prefix.len()..]
    } else {
        raw
    };
    strip_v(stripped).to_string()
}

/// Whether the tag name yields a valid version after normalization.
pub fn is_valid_tag_name(tag_name: &str, config: &Config) -> bool {
    is_valid_version(&normalize_version(tag_name, config))
}

/// The configured next version, if it is itself valid.
pub fn next_version(config: &Config) -> Option<&str> {
    let version = config.next_version.as_str();
    (!version.is_empty() && is_valid_tag_name(version, config)).then_some(version)
}

/// Resolves the version to write for this trigger.
///
/// Precedence: a valid next version override, then the tag name, then the
/// branch name with the branch prefix removed.
pub fn resolve_version(context: &TriggerContext, config: &Config) -> VersionCandidate {
    if let Some(version) = next_version(config) {
        return VersionCandidate::from_raw(version, config);
    }

    if let Some(tag_name) = context.tag_name() {
        return VersionCandidate::from_raw(tag_name, config);
    }

    let branch = resolve_branch(context);
    VersionCandidate::from_branch_remainder(version_from_branch(&branch, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{EventName, Payload};

    fn config() -> Config {
        Config::default()
    }

    fn push(git_ref: &str) -> TriggerContext {
        TriggerContext {
            event_name: EventName::Push,
            git_ref: git_ref.to_string(),
            sha: "sha".to_string(),
            repo_owner: "hello".to_string(),
            repo_name: "world".to_string(),
            payload: Payload::default(),
        }
    }

    #[test]
    fn test_valid_versions() {
        for v in ["0", "1.2", "1.2.3", "10.20.30.40"] {
            assert!(is_valid_version(v), "{} should be valid", v);
        }
    }

    #[test]
    fn test_rejects_suffixes_and_garbage() {
        for v in ["", "v1.2.3", "1.2.3-beta", "1.2.3+build", "1..2", "1.2.", ".1", "a.b"] {
            assert!(!is_valid_version(v), "{} should be invalid", v);
        }
    }

    #[test]
    fn test_tag_strips_leading_v() {
        for (tag, expected) in [("v1.2.3", "1.2.3"), ("v0.0.1", "0.0.1"), ("3.4.5", "3.4.5")] {
            let candidate = resolve_version(&push(&format!("refs/tags/{}", tag)), &config());
            assert_eq!(candidate.version, expected);
            assert!(candidate.valid);
        }
    }

    #[test]
    fn test_tag_with_suffix_is_invalid() {
        let candidate = resolve_version(&push("refs/tags/v1.2.3-rc.1"), &config());
        assert!(!candidate.valid);
    }

    #[test]
    fn test_test_tag_prefix_is_stripped() {
        let mut config = config();
        config.test_tag_prefix = "test/".to_string();

        assert!(is_test_tag("test/v1.2.3", &config));
        let candidate = resolve_version(&push("refs/tags/test/v1.2.3"), &config);
        assert_eq!(candidate.version, "1.2.3");
        assert!(candidate.valid);
    }

    #[test]
    fn test_empty_test_tag_prefix_never_matches() {
        assert!(!is_test_tag("v1.2.3", &config()));
    }

    #[test]
    fn test_next_version_wins() {
        let mut config = config();
        config.next_version = "v9.9.9".to_string();

        let candidate = resolve_version(&push("refs/tags/v1.0.0"), &config);
        assert_eq!(candidate.version, "9.9.9");
        assert!(candidate.valid);
    }

    #[test]
    fn test_invalid_next_version_is_ignored() {
        let mut config = config();
        config.next_version = "next".to_string();

        assert_eq!(next_version(&config), None);
        let candidate = resolve_version(&push("refs/tags/v1.0.0"), &config);
        assert_eq!(candidate.version, "1.0.0");
    }

    #[test]
    fn test_version_from_prefixed_branch() {
        let mut config = config();
        config.branch_prefix = "release/".to_string();

        let candidate = resolve_version(&push("refs/heads/release/v1.2.3"), &config);
        assert_eq!(candidate.version, "1.2.3");
        assert!(candidate.valid);
    }

    #[test]
    fn test_branch_keeps_test_tag_prefix() {
        let mut config = config();
        config.branch_prefix = "release/".to_string();
        config.test_tag_prefix = "test/".to_string();

        let candidate = resolve_version(&push("refs/heads/release/test/1.2.3"), &config);
        assert_eq!(candidate.version, "test/1.2.3");
        assert!(!candidate.valid);
    }
}
