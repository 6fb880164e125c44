//! CLI / template version compatibility

use semver::Version;
use std::fmt;

/// Raised when a template expects a newer CLI than the one running
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatibilityWarning {
    pub cli_version: Version,
    pub template_version: Version,
    pub upgrade_command: String,
}

impl fmt::Display for CompatibilityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Template requires CLI {} or newer (running {}). Consider updating: {}",
            self.template_version, self.cli_version, self.upgrade_command
        )
    }
}

/// Compare the running CLI version against the template's version.
///
/// Unparseable versions never produce a warning.
pub fn check_compatibility(
    cli_version: &str,
    template_version: &str,
    upgrade_command: &str,
) -> Option<CompatibilityWarning> {
    let cli_version = parse_version(cli_version)?;
    let template_version = parse_version(template_version)?;

    (cli_version < template_version).then(|| CompatibilityWarning {
        cli_version,
        template_version,
        upgrade_command: upgrade_command.to_string(),
    })
}

/// Parse a version, accepting a leading `v`
pub fn parse_version(version: &str) -> Option<Version> {
    let trimmed = version.trim();
    Version::parse(trimmed.strip_prefix('v').unwrap_or(trimmed)).ok()
}
