//! File plan: which templates are emitted for a given `AnswerSet`
//!
//! Every conditional part of a project is one row of [`RULES`]: a condition
//! over the answers, the template files it emits and the manifest block it
//! adds. The file plan and the manifest assembly both walk this one table.

use crate::answers::{Action, AnswerSet, OverridePage, UiFeature};

/// Template path of the extension manifest base document
pub const MANIFEST_TEMPLATE: &str = "app/manifest.json";

/// How a template file is turned into an output file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Bytes copied verbatim (binary assets, scripts)
    Copy,
    /// Text with `{{placeholder}}` substitution
    Render,
    /// JSON document; placeholders substituted inside string values only
    RenderJson,
}

/// One copy-and-substitute instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilePlanEntry {
    /// Path relative to the template root
    pub template: &'static str,
    /// Path relative to the output root
    pub destination: &'static str,
    pub kind: EntryKind,
}

const fn copy(path: &'static str) -> FilePlanEntry {
    FilePlanEntry {
        template: path,
        destination: path,
        kind: EntryKind::Copy,
    }
}

const fn render(path: &'static str) -> FilePlanEntry {
    FilePlanEntry {
        template: path,
        destination: path,
        kind: EntryKind::Render,
    }
}

const fn json(path: &'static str) -> FilePlanEntry {
    FilePlanEntry {
        template: path,
        destination: path,
        kind: EntryKind::RenderJson,
    }
}

/// Dotfiles are stored as `_name` in the template tree
const fn dotfile(template: &'static str, destination: &'static str) -> FilePlanEntry {
    FilePlanEntry {
        template,
        destination,
        kind: EntryKind::Copy,
    }
}

/// When a rule applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Always,
    /// Browser or page action selected
    AnyAction,
    OverridePage(OverridePage),
    Feature(UiFeature),
}

impl Condition {
    pub fn holds(&self, answers: &AnswerSet) -> bool {
        match self {
            Condition::Always => true,
            Condition::AnyAction => answers.action != Action::None,
            Condition::OverridePage(page) => answers.override_page == *page,
            Condition::Feature(feature) => answers.has_feature(*feature),
        }
    }
}

/// Manifest block added when a rule applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestEffect {
    None,
    Background,
    /// `browser_action` or `page_action`, depending on the answers
    Action,
    UrlOverride(OverridePage),
    OptionsPage,
    DevtoolsPage,
    ContentScripts,
    Omnibox,
}

/// One row of the feature table
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub condition: Condition,
    pub files: &'static [FilePlanEntry],
    pub effect: ManifestEffect,
}

pub const RULES: &[Rule] = &[
    Rule {
        name: "project",
        condition: Condition::Always,
        files: &[
            json("package.json"),
            dotfile("_editorconfig", ".editorconfig"),
            dotfile("_jshintrc", ".jshintrc"),
            dotfile("_gitattributes", ".gitattributes"),
            dotfile("_gitignore", ".gitignore"),
            render("README.md"),
            copy("LICENSE"),
        ],
        effect: ManifestEffect::None,
    },
    Rule {
        name: "build tasks",
        condition: Condition::Always,
        files: &[
            copy("gulpfile.js"),
            copy("tasks/clean.js"),
            copy("tasks/images.js"),
            copy("tasks/manifest.js"),
            copy("tasks/package.js"),
            copy("tasks/styles.js"),
            copy("tasks/scripts.js"),
        ],
        effect: ManifestEffect::None,
    },
    Rule {
        name: "artworks",
        condition: Condition::Always,
        files: &[
            copy("artworks/Chrome-Webstore-Icon_128x128.png"),
            copy("artworks/Promo-Image-Large_920x680.png"),
            copy("artworks/Promo-Image-Marquee_1400x560.png"),
            copy("artworks/Promo-Image-Small_440x280.png"),
            copy("artworks/Screenshot_1280x800.png"),
            copy("artworks/Screenshot_640x400.png"),
        ],
        effect: ManifestEffect::None,
    },
    Rule {
        name: "locales",
        condition: Condition::Always,
        files: &[
            json("app/_locales/en/messages.json"),
            dotfile("app/fonts/_gitkeep", "app/fonts/.gitkeep"),
        ],
        effect: ManifestEffect::None,
    },
    Rule {
        name: "background",
        condition: Condition::Always,
        files: &[copy("app/scripts/background.js")],
        effect: ManifestEffect::Background,
    },
    Rule {
        name: "popup",
        condition: Condition::AnyAction,
        files: &[
            render("app/html/popup.html"),
            copy("app/scripts/popup.js"),
            copy("app/styles/popup.less"),
        ],
        effect: ManifestEffect::Action,
    },
    Rule {
        name: "newtab",
        condition: Condition::OverridePage(OverridePage::Newtab),
        files: &[
            render("app/html/newtab.html"),
            copy("app/scripts/newtab.js"),
            copy("app/styles/newtab.less"),
        ],
        effect: ManifestEffect::UrlOverride(OverridePage::Newtab),
    },
    Rule {
        name: "bookmarks",
        condition: Condition::OverridePage(OverridePage::Bookmarks),
        files: &[
            render("app/html/bookmarks.html"),
            copy("app/scripts/bookmarks.js"),
            copy("app/styles/bookmarks.less"),
        ],
        effect: ManifestEffect::UrlOverride(OverridePage::Bookmarks),
    },
    Rule {
        name: "history",
        condition: Condition::OverridePage(OverridePage::History),
        files: &[
            render("app/html/history.html"),
            copy("app/scripts/history.js"),
            copy("app/styles/history.less"),
        ],
        effect: ManifestEffect::UrlOverride(OverridePage::History),
    },
    Rule {
        name: "options",
        condition: Condition::Feature(UiFeature::Options),
        files: &[
            render("app/html/options.html"),
            copy("app/scripts/options.js"),
            copy("app/styles/options.less"),
        ],
        effect: ManifestEffect::OptionsPage,
    },
    Rule {
        name: "devtools",
        condition: Condition::Feature(UiFeature::DevtoolsPage),
        files: &[
            render("app/html/devtools.html"),
            copy("app/scripts/devtools.js"),
            copy("app/styles/devtools.less"),
        ],
        effect: ManifestEffect::DevtoolsPage,
    },
    Rule {
        name: "content script",
        condition: Condition::Feature(UiFeature::ContentScript),
        files: &[copy("app/scripts/content.js"), copy("app/styles/content.less")],
        effect: ManifestEffect::ContentScripts,
    },
    Rule {
        name: "omnibox",
        condition: Condition::Feature(UiFeature::Omnibox),
        files: &[],
        effect: ManifestEffect::Omnibox,
    },
];

/// The entries and manifest effects selected for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePlan {
    entries: Vec<FilePlanEntry>,
    effects: Vec<ManifestEffect>,
}

impl FilePlan {
    pub fn for_answers(answers: &AnswerSet) -> Self {
        let mut entries = Vec::new();
        let mut effects = Vec::new();

        for rule in RULES.iter().filter(|rule| rule.condition.holds(answers)) {
            entries.extend_from_slice(rule.files);
            if rule.effect != ManifestEffect::None {
                effects.push(rule.effect);
            }
        }

        Self { entries, effects }
    }

    pub fn entries(&self) -> &[FilePlanEntry] {
        &self.entries
    }

    pub fn effects(&self) -> &[ManifestEffect] {
        &self.effects
    }

    /// Every template the run needs, the manifest base included
    pub fn required_templates(&self) -> impl Iterator<Item = &'static str> + '_ {
        std::iter::once(MANIFEST_TEMPLATE).chain(self.entries.iter().map(|e| e.template))
    }

    pub fn contains_destination(&self, destination: &str) -> bool {
        self.entries.iter().any(|e| e.destination == destination)
    }
}
