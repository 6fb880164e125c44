//! Structured assembly of the extension's `manifest.json`
//!
//! The manifest is never produced by gluing JSON text together: the base
//! template is parsed, every block selected by the answers is set on a typed
//! document, and the result is serialized once.

use crate::answers::{slugify, Action, AnswerSet, OverridePage};
use crate::error::ScaffoldError;
use crate::plan::{ManifestEffect, MANIFEST_TEMPLATE};
use serde::Serialize;
use serde_json::{Map, Value};

pub const DEFAULT_LOCALE: &str = "en";

/// Minimum browser version for `devtools_page`
pub const DEVTOOLS_MINIMUM_CHROME_VERSION: &str = "10.0";

/// Host patterns granted to every extension and matched by content scripts
pub const HOST_PERMISSIONS: [&str; 2] = ["http://*/*", "https://*/*"];

pub const POPUP_PAGE: &str = "html/popup.html";
pub const OPTIONS_PAGE: &str = "html/options.html";
pub const DEVTOOLS_PAGE: &str = "html/devtools.html";
pub const BACKGROUND_SCRIPT: &str = "scripts/background.js";

/// Top-level keys owned by [`ManifestDocument`]; stripped from the template base
const MANAGED_KEYS: &[&str] = &[
    "default_locale",
    "background",
    "browser_action",
    "page_action",
    "chrome_url_overrides",
    "options_page",
    "devtools_page",
    "minimum_chrome_version",
    "content_scripts",
    "omnibox",
    "permissions",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Background {
    pub scripts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionBlock {
    pub default_title: String,
    pub default_popup: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UrlOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newtab: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bookmarks: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentScript {
    pub matches: Vec<String>,
    pub css: Vec<String>,
    pub js: Vec<String>,
    pub run_at: String,
    pub all_frames: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Omnibox {
    pub keyword: String,
}

/// The generated extension manifest
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManifestDocument {
    /// Fields taken as-is from the manifest template
    #[serde(flatten)]
    pub base: Map<String, Value>,

    pub default_locale: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Background>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_action: Option<ActionBlock>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_action: Option<ActionBlock>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub chrome_url_overrides: Option<UrlOverrides>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub options_page: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub devtools_page: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_chrome_version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_scripts: Option<Vec<ContentScript>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub omnibox: Option<Omnibox>,

    pub permissions: Vec<String>,
}

impl ManifestDocument {
    /// Start from the parsed manifest template; managed keys are dropped from it
    pub fn from_template(content: &str) -> Result<Self, ScaffoldError> {
        let value: Value =
            serde_json::from_str(content).map_err(|e| ScaffoldError::InvalidTemplate {
                path: MANIFEST_TEMPLATE.to_string(),
                reason: e.to_string(),
            })?;

        let Value::Object(mut base) = value else {
            return Err(ScaffoldError::InvalidTemplate {
                path: MANIFEST_TEMPLATE.to_string(),
                reason: "manifest template must be a JSON object".to_string(),
            });
        };
        for key in MANAGED_KEYS {
            base.remove(*key);
        }

        Ok(Self {
            base,
            default_locale: DEFAULT_LOCALE.to_string(),
            background: None,
            browser_action: None,
            page_action: None,
            chrome_url_overrides: None,
            options_page: None,
            devtools_page: None,
            minimum_chrome_version: None,
            content_scripts: None,
            omnibox: None,
            permissions: Vec::new(),
        })
    }

    /// Apply every selected effect and the permission list
    pub fn assemble(mut self, effects: &[ManifestEffect], answers: &AnswerSet) -> Self {
        for effect in effects {
            self.apply(*effect, answers);
        }

        self.permissions = answers.permissions.clone();
        for host in HOST_PERMISSIONS {
            if !self.permissions.iter().any(|p| p == host) {
                self.permissions.push(host.to_string());
            }
        }

        self
    }

    pub fn apply(&mut self, effect: ManifestEffect, answers: &AnswerSet) {
        match effect {
            ManifestEffect::None => {}
            ManifestEffect::Background => {
                self.background = Some(Background {
                    scripts: vec![BACKGROUND_SCRIPT.to_string()],
                });
            }
            ManifestEffect::Action => {
                let block = ActionBlock {
                    default_title: answers.short_name.clone(),
                    default_popup: POPUP_PAGE.to_string(),
                };
                match answers.action {
                    Action::Browser => self.browser_action = Some(block),
                    Action::Page => self.page_action = Some(block),
                    Action::None => {}
                }
            }
            ManifestEffect::UrlOverride(page) => {
                let overrides = self.chrome_url_overrides.get_or_insert_with(Default::default);
                match page {
                    OverridePage::Newtab => overrides.newtab = Some("html/newtab.html".to_string()),
                    OverridePage::Bookmarks => {
                        overrides.bookmarks = Some("html/bookmarks.html".to_string())
                    }
                    OverridePage::History => {
                        overrides.history = Some("html/history.html".to_string())
                    }
                    OverridePage::None => {}
                }
            }
            ManifestEffect::OptionsPage => {
                self.options_page = Some(OPTIONS_PAGE.to_string());
            }
            ManifestEffect::DevtoolsPage => {
                self.devtools_page = Some(DEVTOOLS_PAGE.to_string());
                self.minimum_chrome_version = Some(DEVTOOLS_MINIMUM_CHROME_VERSION.to_string());
            }
            ManifestEffect::ContentScripts => {
                self.content_scripts = Some(vec![ContentScript {
                    matches: HOST_PERMISSIONS.iter().map(|h| h.to_string()).collect(),
                    css: vec!["styles/content.css".to_string()],
                    js: vec!["scripts/content.js".to_string()],
                    run_at: "document_end".to_string(),
                    all_frames: false,
                }]);
            }
            ManifestEffect::Omnibox => {
                self.omnibox = Some(Omnibox {
                    keyword: slugify(&answers.short_name),
                });
            }
        }
    }

    /// Pretty-printed JSON with a trailing newline
    pub fn to_json(&self) -> Result<String, ScaffoldError> {
        let mut text =
            serde_json::to_string_pretty(self).map_err(|e| ScaffoldError::InvalidTemplate {
                path: MANIFEST_TEMPLATE.to_string(),
                reason: e.to_string(),
            })?;
        text.push('\n');
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::UiFeature;
    use crate::plan::FilePlan;

    const BASE: &str = r#"{
  "name": "__MSG_appName__",
  "version": "0.0.1",
  "manifest_version": 2,
  "permissions": ["stale"],
  "default_locale": "de"
}"#;

    fn build(answers: &AnswerSet) -> Value {
        let plan = FilePlan::for_answers(answers);
        let doc = ManifestDocument::from_template(BASE)
            .unwrap()
            .assemble(plan.effects(), answers);
        serde_json::from_str(&doc.to_json().unwrap()).unwrap()
    }

    #[test]
    fn test_minimal_manifest() {
        let manifest = build(&AnswerSet::named("x"));
        let object = manifest.as_object().unwrap();

        assert_eq!(manifest["name"], "__MSG_appName__");
        assert_eq!(manifest["default_locale"], "en");
        assert_eq!(manifest["background"]["scripts"][0], BACKGROUND_SCRIPT);
        assert_eq!(
            manifest["permissions"],
            serde_json::json!(["http://*/*", "https://*/*"])
        );
        for key in [
            "browser_action",
            "page_action",
            "chrome_url_overrides",
            "options_page",
            "devtools_page",
            "minimum_chrome_version",
            "content_scripts",
            "omnibox",
        ] {
            assert!(!object.contains_key(key), "{}", key);
        }
    }

    #[test]
    fn test_action_blocks_are_exclusive() {
        let mut answers = AnswerSet::named("x");
        answers.action = Action::Page;
        let manifest = build(&answers);
        assert_eq!(manifest["page_action"]["default_popup"], POPUP_PAGE);
        assert!(manifest.get("browser_action").is_none());

        answers.action = Action::Browser;
        let manifest = build(&answers);
        assert_eq!(manifest["browser_action"]["default_popup"], POPUP_PAGE);
        assert!(manifest.get("page_action").is_none());
    }

    #[test]
    fn test_devtools_sets_minimum_version() {
        let mut answers = AnswerSet::named("x");
        answers.ui_features = vec![UiFeature::DevtoolsPage];
        let manifest = build(&answers);
        assert_eq!(manifest["devtools_page"], DEVTOOLS_PAGE);
        assert_eq!(manifest["minimum_chrome_version"], "10.0");
    }

    #[test]
    fn test_all_features() {
        let mut answers = AnswerSet::named("Test Extension");
        answers.short_name = "Test Ext".to_string();
        answers.override_page = OverridePage::Newtab;
        answers.ui_features = UiFeature::ALL.to_vec();
        let manifest = build(&answers);

        assert_eq!(manifest["chrome_url_overrides"]["newtab"], "html/newtab.html");
        assert!(manifest["chrome_url_overrides"].get("history").is_none());
        assert_eq!(manifest["options_page"], OPTIONS_PAGE);
        assert_eq!(
            manifest["content_scripts"][0]["matches"],
            serde_json::json!(HOST_PERMISSIONS)
        );
        assert_eq!(manifest["omnibox"]["keyword"], "test-ext");
    }

    #[test]
    fn test_permissions_keep_order_and_hosts_not_duplicated() {
        let mut answers = AnswerSet::named("x");
        answers.permissions = vec![
            "tabs".to_string(),
            "https://*/*".to_string(),
            "alarms".to_string(),
        ];
        let manifest = build(&answers);
        assert_eq!(
            manifest["permissions"],
            serde_json::json!(["tabs", "https://*/*", "alarms", "http://*/*"])
        );
    }

    #[test]
    fn test_pretty_output_layout() {
        let mut answers = AnswerSet::named("x");
        answers.permissions = vec!["alarms".to_string()];
        let plan = FilePlan::for_answers(&answers);
        let text = ManifestDocument::from_template(BASE)
            .unwrap()
            .assemble(plan.effects(), &answers)
            .to_json()
            .unwrap();

        assert!(text.contains("\"default_locale\": \"en\","));
        assert!(text.contains("\"http://*/*\",\n    \"https://*/*\""));
        assert!(text.contains("\"background\": {"));
        assert_eq!(text.matches("\"permissions\"").count(), 1);
    }

    #[test]
    fn test_template_must_be_object() {
        assert!(matches!(
            ManifestDocument::from_template("[1, 2]"),
            Err(ScaffoldError::InvalidTemplate { .. })
        ));
        assert!(matches!(
            ManifestDocument::from_template("{ not json"),
            Err(ScaffoldError::InvalidTemplate { .. })
        ));
    }
}
