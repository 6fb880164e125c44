//! User answers: the raw boundary shape and the validated `AnswerSet`
//!
//! Answers arrive stringly typed (from prompts, CLI flags or an answers file)
//! as [`RawAnswers`] and are validated exactly once into an [`AnswerSet`].
//! Everything downstream takes `&AnswerSet`.

use crate::error::ScaffoldError;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Primary UI surface of the extension
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum)]
pub enum Action {
    #[default]
    None,
    Browser,
    Page,
}

impl Action {
    pub fn display_name(&self) -> &'static str {
        match self {
            Action::None => "No action",
            Action::Browser => "Browser action",
            Action::Page => "Page action",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match normalize(raw, "action").as_str() {
            "" | "no" | "none" => Some(Action::None),
            "browser" => Some(Action::Browser),
            "page" => Some(Action::Page),
            _ => None,
        }
    }
}

/// Built-in browser page replaced by the extension
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum)]
pub enum OverridePage {
    #[default]
    None,
    Newtab,
    Bookmarks,
    History,
}

impl OverridePage {
    pub fn display_name(&self) -> &'static str {
        match self {
            OverridePage::None => "No override",
            OverridePage::Newtab => "Newtab page",
            OverridePage::Bookmarks => "Bookmarks page",
            OverridePage::History => "History page",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match normalize(raw, "page").as_str() {
            "" | "no" | "none" => Some(OverridePage::None),
            "newtab" => Some(OverridePage::Newtab),
            "bookmarks" => Some(OverridePage::Bookmarks),
            "history" => Some(OverridePage::History),
            _ => None,
        }
    }
}

/// Optional UI surfaces that can be toggled independently
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiFeature {
    Options,
    DevtoolsPage,
    ContentScript,
    Omnibox,
}

impl UiFeature {
    pub const ALL: [UiFeature; 4] = [
        UiFeature::Options,
        UiFeature::DevtoolsPage,
        UiFeature::ContentScript,
        UiFeature::Omnibox,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            UiFeature::Options => "Options page",
            UiFeature::DevtoolsPage => "Devtools page",
            UiFeature::ContentScript => "Content script",
            UiFeature::Omnibox => "Omnibox",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match normalize(raw, "").as_str() {
            "options" | "optionspage" => Some(UiFeature::Options),
            "devtools" | "devtoolspage" => Some(UiFeature::DevtoolsPage),
            "contentscript" | "contentscripts" => Some(UiFeature::ContentScript),
            "omnibox" => Some(UiFeature::Omnibox),
            _ => None,
        }
    }
}

impl fmt::Display for UiFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Permissions offered by the interactive prompt.
///
/// Answers are not checked against this list; anything else is passed through.
pub const KNOWN_PERMISSIONS: &[&str] = &[
    "activeTab",
    "alarms",
    "bookmarks",
    "browsingData",
    "clipboardRead",
    "clipboardWrite",
    "contentSettings",
    "contextMenus",
    "cookies",
    "commands",
    "debugger",
    "declarativeContent",
    "desktopCapture",
    "downloads",
    "enterprise.platformKeys",
    "fontSettings",
    "gcm",
    "geolocation",
    "history",
    "identity",
    "idle",
    "input",
    "management",
    "notifications",
    "pageCapture",
    "proxy",
    "pushMessaging",
    "storage",
    "system.cpu",
    "system.memory",
    "system.storage",
    "tts",
    "ttsEngine",
    "tabs",
    "tabCapture",
    "topSites",
    "webNavigation",
    "webRequest",
    "webRequestBlocking",
];

/// Answers as supplied by a user, before validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAnswers {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub short_name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub action: Option<String>,

    #[serde(default)]
    pub override_page: Option<String>,

    #[serde(default, alias = "uifeatures")]
    pub ui_features: Vec<String>,

    #[serde(default)]
    pub permissions: Vec<String>,
}

impl RawAnswers {
    /// Parse an answers document (YAML, which also accepts JSON)
    pub fn from_yaml(content: &str) -> Result<Self, ScaffoldError> {
        serde_yaml::from_str(content)
            .map_err(|e| ScaffoldError::invalid_answer("answers", e.to_string()))
    }

    /// Overlay the fields set in `other` on top of these answers
    pub fn merge(&mut self, other: RawAnswers) {
        if other.name.is_some() {
            self.name = other.name;
        }
        if other.short_name.is_some() {
            self.short_name = other.short_name;
        }
        if other.description.is_some() {
            self.description = other.description;
        }
        if other.action.is_some() {
            self.action = other.action;
        }
        if other.override_page.is_some() {
            self.override_page = other.override_page;
        }
        if !other.ui_features.is_empty() {
            self.ui_features = other.ui_features;
        }
        if !other.permissions.is_empty() {
            self.permissions = other.permissions;
        }
    }
}

/// Validated, strongly typed scaffolding choices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerSet {
    pub name: String,
    pub short_name: String,
    pub description: String,
    pub action: Action,
    pub override_page: OverridePage,
    /// Selected features in answer order, without duplicates
    pub ui_features: Vec<UiFeature>,
    /// Feature strings that matched no known feature; they select nothing
    pub unrecognized_features: Vec<String>,
    /// Permission identifiers in answer order, without duplicates
    pub permissions: Vec<String>,
}

impl AnswerSet {
    /// Minimal answer set with only a name; everything else unselected
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            short_name: name.clone(),
            name,
            description: String::new(),
            action: Action::None,
            override_page: OverridePage::None,
            ui_features: Vec::new(),
            unrecognized_features: Vec::new(),
            permissions: Vec::new(),
        }
    }

    pub fn has_feature(&self, feature: UiFeature) -> bool {
        self.ui_features.contains(&feature)
    }

    /// Lowercase, dash-separated form of the name (npm package name, omnibox keyword)
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }

    /// Value substituted for a `{{key}}` placeholder, if the key is known
    pub fn placeholder(&self, key: &str) -> Option<String> {
        match key {
            "name" => Some(self.name.clone()),
            "short_name" => Some(self.short_name.clone()),
            "description" => Some(self.description.clone()),
            "slug" => Some(self.slug()),
            _ => None,
        }
    }
}

impl TryFrom<RawAnswers> for AnswerSet {
    type Error = ScaffoldError;

    fn try_from(raw: RawAnswers) -> Result<Self, Self::Error> {
        let name = raw
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ScaffoldError::invalid_answer("name", "a name is required"))?
            .to_string();

        let short_name = raw
            .short_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| name.clone());

        let description = raw.description.unwrap_or_default().trim().to_string();

        let action = match raw.action.as_deref() {
            None => Action::None,
            Some(value) => Action::parse(value).ok_or_else(|| {
                ScaffoldError::invalid_answer(
                    "action",
                    format!("'{}' is not one of: none, browser, page", value),
                )
            })?,
        };

        let override_page = match raw.override_page.as_deref() {
            None => OverridePage::None,
            Some(value) => OverridePage::parse(value).ok_or_else(|| {
                ScaffoldError::invalid_answer(
                    "overridePage",
                    format!(
                        "'{}' is not one of: none, newtab, bookmarks, history",
                        value
                    ),
                )
            })?,
        };

        let mut ui_features = Vec::new();
        let mut unrecognized_features: Vec<String> = Vec::new();
        for value in &raw.ui_features {
            match UiFeature::parse(value) {
                Some(feature) if !ui_features.contains(&feature) => ui_features.push(feature),
                Some(_) => {}
                None if !unrecognized_features.contains(value) => {
                    unrecognized_features.push(value.clone())
                }
                None => {}
            }
        }

        let mut permissions: Vec<String> = Vec::new();
        for value in raw.permissions {
            let value = value.trim().to_string();
            if value.is_empty() {
                return Err(ScaffoldError::invalid_answer(
                    "permissions",
                    "permission entries must not be empty",
                ));
            }
            if !permissions.contains(&value) {
                permissions.push(value);
            }
        }

        Ok(Self {
            name,
            short_name,
            description,
            action,
            override_page,
            ui_features,
            unrecognized_features,
            permissions,
        })
    }
}

/// Lowercase and drop separators and a trailing word like "page" or "action"
fn normalize(raw: &str, suffix: &str) -> String {
    let compact: String = raw
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect();
    match compact.strip_suffix(suffix) {
        Some(stripped) if !suffix.is_empty() && !stripped.is_empty() => stripped.to_string(),
        _ => compact,
    }
}

pub(crate) fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    for c in value.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() {
        "extension".to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str) -> RawAnswers {
        RawAnswers {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_name_is_invalid() {
        let err = AnswerSet::try_from(RawAnswers::default()).unwrap_err();
        assert!(matches!(
            err,
            ScaffoldError::InvalidAnswer { field: "name", .. }
        ));

        let err = AnswerSet::try_from(raw("   ")).unwrap_err();
        assert!(matches!(
            err,
            ScaffoldError::InvalidAnswer { field: "name", .. }
        ));
    }

    #[test]
    fn test_short_name_defaults_to_name() {
        let answers = AnswerSet::try_from(raw("My Extension")).unwrap();
        assert_eq!(answers.short_name, "My Extension");
        assert_eq!(answers.action, Action::None);
        assert_eq!(answers.override_page, OverridePage::None);
    }

    #[test]
    fn test_parses_prompt_style_values() {
        let mut r = raw("test-extension");
        r.action = Some("Browser".to_string());
        r.override_page = Some("Newtab Page".to_string());
        r.ui_features = vec![
            "options".to_string(),
            "devtoolsPage".to_string(),
            "contentscript".to_string(),
            "omnibox".to_string(),
        ];

        let answers = AnswerSet::try_from(r).unwrap();
        assert_eq!(answers.action, Action::Browser);
        assert_eq!(answers.override_page, OverridePage::Newtab);
        assert_eq!(answers.ui_features, UiFeature::ALL.to_vec());
        assert!(answers.unrecognized_features.is_empty());
    }

    #[test]
    fn test_enum_spellings() {
        assert_eq!(Action::parse("page_action"), Some(Action::Page));
        assert_eq!(Action::parse("No"), Some(Action::None));
        assert_eq!(OverridePage::parse("NewtabPage"), Some(OverridePage::Newtab));
        assert_eq!(OverridePage::parse("history-page"), Some(OverridePage::History));
        assert_eq!(OverridePage::parse(""), Some(OverridePage::None));
        assert_eq!(UiFeature::parse("Content Scripts"), Some(UiFeature::ContentScript));
    }

    #[test]
    fn test_unknown_action_is_invalid() {
        let mut r = raw("x");
        r.action = Some("sidebar".to_string());
        let err = AnswerSet::try_from(r).unwrap_err();
        assert!(matches!(
            err,
            ScaffoldError::InvalidAnswer { field: "action", .. }
        ));
    }

    #[test]
    fn test_duplicates_collapse_in_order() {
        let mut r = raw("x");
        r.ui_features = vec![
            "omnibox".to_string(),
            "options".to_string(),
            "omnibox".to_string(),
        ];
        r.permissions = vec![
            "tabs".to_string(),
            "alarms".to_string(),
            "tabs".to_string(),
        ];

        let answers = AnswerSet::try_from(r).unwrap();
        assert_eq!(
            answers.ui_features,
            vec![UiFeature::Omnibox, UiFeature::Options]
        );
        assert_eq!(answers.permissions, vec!["tabs", "alarms"]);
    }

    #[test]
    fn test_unrecognized_values_pass_through() {
        let mut r = raw("x");
        r.ui_features = vec!["sidePanel".to_string(), "options".to_string()];
        r.permissions = vec!["notARealPermission".to_string()];

        let answers = AnswerSet::try_from(r).unwrap();
        assert_eq!(answers.ui_features, vec![UiFeature::Options]);
        assert_eq!(answers.unrecognized_features, vec!["sidePanel"]);
        assert_eq!(answers.permissions, vec!["notARealPermission"]);
    }

    #[test]
    fn test_answers_file_accepts_camel_case_and_alias() {
        let content = r#"
name: test-extension
shortName: test-ext
overridePage: Newtab Page
uifeatures: [options, omnibox]
permissions: [alarms]
"#;
        let r = RawAnswers::from_yaml(content).unwrap();
        assert_eq!(r.short_name.as_deref(), Some("test-ext"));
        assert_eq!(r.ui_features, vec!["options", "omnibox"]);

        let json = r#"{"name": "json-ext", "uiFeatures": ["devtoolsPage"]}"#;
        let r = RawAnswers::from_yaml(json).unwrap();
        assert_eq!(r.name.as_deref(), Some("json-ext"));
        assert_eq!(r.ui_features, vec!["devtoolsPage"]);
    }

    #[test]
    fn test_merge_overrides_only_set_fields() {
        let mut base = RawAnswers::from_yaml("name: a\ndescription: keep\n").unwrap();
        base.merge(RawAnswers {
            name: Some("b".to_string()),
            permissions: vec!["tabs".to_string()],
            ..Default::default()
        });
        assert_eq!(base.name.as_deref(), Some("b"));
        assert_eq!(base.description.as_deref(), Some("keep"));
        assert_eq!(base.permissions, vec!["tabs"]);
    }

    #[test]
    fn test_slug() {
        assert_eq!(AnswerSet::named("My Cool Extension!").slug(), "my-cool-extension");
        assert_eq!(AnswerSet::named("test-extension").slug(), "test-extension");
        assert_eq!(AnswerSet::named("***").slug(), "extension");
    }
}
