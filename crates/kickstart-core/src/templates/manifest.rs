//! Template manifest types and parsing

use crate::error::ScaffoldError;
use serde::{Deserialize, Serialize};

/// File name of the manifest at the root of every template tree
pub const TEMPLATE_MANIFEST_FILE: &str = "template.yaml";

/// Root template manifest (templates/<name>/template.yaml)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateManifest {
    /// Display name of the template
    pub name: String,

    /// Description of what the template provides
    pub description: String,

    /// Semver version for CLI compatibility checking
    pub version: String,
}

impl TemplateManifest {
    pub fn parse(content: &str) -> Result<Self, ScaffoldError> {
        serde_yaml::from_str(content).map_err(|e| ScaffoldError::TemplateManifest(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_manifest() {
        let manifest = TemplateManifest::parse(
            "name: Chrome Extension\ndescription: Kickstart\nversion: 0.1.0\n",
        )
        .unwrap();
        assert_eq!(manifest.name, "Chrome Extension");
        assert_eq!(manifest.version, "0.1.0");
    }

    #[test]
    fn test_parse_manifest_missing_version() {
        let err = TemplateManifest::parse("name: x\ndescription: y\n").unwrap_err();
        assert!(matches!(err, ScaffoldError::TemplateManifest(_)));
    }
}
