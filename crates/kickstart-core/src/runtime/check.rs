//! Runtime detection for Node.js and npm

use std::process::Command;

/// Runtime detection result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeInfo {
    pub name: &'static str,
    pub version: Option<String>,
    pub available: bool,
}

impl RuntimeInfo {
    /// `Node.js (v20.1.0)` or `Node.js (not installed)`
    pub fn describe(&self) -> String {
        if self.available {
            format!("{} ({})", self.name, self.version.as_deref().unwrap_or("unknown"))
        } else {
            format!("{} (not installed)", self.name)
        }
    }
}

/// Run `<binary> --version` and report what was found
fn probe(name: &'static str, binary: &str) -> RuntimeInfo {
    match Command::new(binary).arg("--version").output() {
        Ok(out) if out.status.success() => RuntimeInfo {
            name,
            version: Some(String::from_utf8_lossy(&out.stdout).trim().to_string()),
            available: true,
        },
        _ => RuntimeInfo {
            name,
            version: None,
            available: false,
        },
    }
}

/// Check if Node.js is available
pub fn check_node() -> RuntimeInfo {
    probe("Node.js", "node")
}

/// Check if npm is available
pub fn check_npm() -> RuntimeInfo {
    probe("npm", npm_binary())
}

/// The npm executable name for this platform
pub fn npm_binary() -> &'static str {
    if cfg!(windows) {
        "npm.cmd"
    } else {
        "npm"
    }
}

/// Runtimes a generated extension project builds with. Advisory only:
/// missing runtimes are reported, never an error.
pub fn check_runtimes() -> Vec<RuntimeInfo> {
    vec![check_node(), check_npm()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_binary_is_unavailable() {
        let info = probe("Nothing", "kickstart-definitely-not-installed");
        assert!(!info.available);
        assert_eq!(info.describe(), "Nothing (not installed)");
    }

    #[test]
    fn test_check_runtimes_reports_both() {
        let names: Vec<_> = check_runtimes().iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Node.js", "npm"]);
    }
}
