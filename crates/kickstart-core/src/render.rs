//! Scaffold renderer: plan, assemble the manifest, write everything
//!
//! Every template the plan needs is resolved before the first write, so a
//! missing template never leaves a half-written project behind. Writes run as
//! independent tasks; the first failure aborts the rest.

use crate::answers::AnswerSet;
use crate::error::{ScaffoldError, ScaffoldResult};
use crate::extension_manifest::ManifestDocument;
use crate::plan::{EntryKind, FilePlan, FilePlanEntry, MANIFEST_TEMPLATE};
use crate::templates::{substitute, substitute_json, TemplateSource, TemplateStore};
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tokio::task::JoinSet;

/// What a successful run produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderReport {
    /// Written files relative to the output root, sorted
    pub files: Vec<String>,
    /// Feature answers that selected nothing
    pub unrecognized_features: Vec<String>,
}

/// Render a project from the template tree (or zip bundle) at `template_root`
pub async fn render(
    answers: &AnswerSet,
    template_root: &Path,
    output_root: &Path,
) -> ScaffoldResult<RenderReport> {
    let store = TemplateStore::open(&TemplateSource::detect(template_root))?;
    render_with_store(answers, &store, output_root).await
}

/// Render a project from an already loaded template store
pub async fn render_with_store(
    answers: &AnswerSet,
    store: &TemplateStore,
    output_root: &Path,
) -> ScaffoldResult<RenderReport> {
    let plan = FilePlan::for_answers(answers);

    if let Some(missing) = plan.required_templates().find(|t| !store.contains(t)) {
        return Err(ScaffoldError::TemplateMissing {
            path: missing.to_string(),
        });
    }

    // Everything is prepared in memory first; tasks only write
    let manifest = ManifestDocument::from_template(&store.get_text(MANIFEST_TEMPLATE)?)?
        .assemble(plan.effects(), answers)
        .to_json()?;

    let mut outputs: Vec<(&'static str, Arc<[u8]>)> = Vec::with_capacity(plan.entries().len() + 1);
    for entry in plan.entries() {
        outputs.push((entry.destination, prepare(entry, store, answers)?));
    }
    outputs.push((MANIFEST_TEMPLATE, Arc::from(manifest.into_bytes())));

    fs::create_dir_all(output_root)
        .await
        .map_err(|e| ScaffoldError::write_failure(output_root, e))?;

    let mut tasks = JoinSet::new();
    for (destination, content) in outputs {
        let target = output_root.join(destination);
        tasks.spawn(async move {
            write_file(&target, &content).await?;
            Ok::<_, ScaffoldError>(destination)
        });
    }

    let mut files = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Ok(destination)) => files.push(destination.to_string()),
            Ok(Err(e)) => {
                tasks.abort_all();
                return Err(e);
            }
            Err(e) => {
                tasks.abort_all();
                return Err(ScaffoldError::Task(e.to_string()));
            }
        }
    }
    files.sort();

    Ok(RenderReport {
        files,
        unrecognized_features: answers.unrecognized_features.clone(),
    })
}

/// Produce the output bytes of one plan entry
fn prepare(
    entry: &FilePlanEntry,
    store: &TemplateStore,
    answers: &AnswerSet,
) -> ScaffoldResult<Arc<[u8]>> {
    match entry.kind {
        EntryKind::Copy => store.get(entry.template),
        EntryKind::Render => {
            let text = store.get_text(entry.template)?;
            Ok(Arc::from(substitute(&text, answers).into_bytes()))
        }
        EntryKind::RenderJson => {
            let text = store.get_text(entry.template)?;
            let value = serde_json::from_str(&text).map_err(|e| ScaffoldError::InvalidTemplate {
                path: entry.template.to_string(),
                reason: e.to_string(),
            })?;
            let mut rendered = serde_json::to_string_pretty(&substitute_json(value, answers))
                .map_err(|e| ScaffoldError::InvalidTemplate {
                    path: entry.template.to_string(),
                    reason: e.to_string(),
                })?;
            rendered.push('\n');
            Ok(Arc::from(rendered.into_bytes()))
        }
    }
}

async fn write_file(target: &Path, content: &[u8]) -> ScaffoldResult<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| ScaffoldError::write_failure(parent, e))?;
    }
    fs::write(target, content)
        .await
        .map_err(|e| ScaffoldError::write_failure(target, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::{Action, UiFeature};
    use crate::plan::RULES;
    use crate::templates::TemplateManifest;

    /// A store holding every template any rule can ask for
    fn full_store() -> TemplateStore {
        let mut files: Vec<(String, Vec<u8>)> = RULES
            .iter()
            .flat_map(|rule| rule.files.iter())
            .map(|entry| {
                let content = match entry.kind {
                    EntryKind::RenderJson => r#"{"name": "{{name}}"}"#.to_string(),
                    _ => format!("{} for {{{{short_name}}}}", entry.template),
                };
                (entry.template.to_string(), content.into_bytes())
            })
            .collect();
        files.push((
            MANIFEST_TEMPLATE.to_string(),
            br#"{"name": "__MSG_appName__", "manifest_version": 2}"#.to_vec(),
        ));

        TemplateStore::from_files(
            TemplateManifest {
                name: "test".to_string(),
                description: "test".to_string(),
                version: "0.1.0".to_string(),
            },
            files,
        )
    }

    #[tokio::test]
    async fn test_render_writes_plan_and_manifest() {
        let out = tempfile::tempdir().unwrap();
        let mut answers = AnswerSet::named("Quote \" Ext");
        answers.short_name = "qe".to_string();
        answers.action = Action::Browser;

        let report = render_with_store(&answers, &full_store(), out.path())
            .await
            .unwrap();

        assert!(report.files.contains(&"app/html/popup.html".to_string()));
        assert!(report.files.contains(&MANIFEST_TEMPLATE.to_string()));
        assert!(out.path().join(".gitignore").is_file());

        // Copy entries are verbatim, render entries substituted
        let popup_js = std::fs::read_to_string(out.path().join("app/scripts/popup.js")).unwrap();
        assert_eq!(popup_js, "app/scripts/popup.js for {{short_name}}");
        let popup_html = std::fs::read_to_string(out.path().join("app/html/popup.html")).unwrap();
        assert_eq!(popup_html, "app/html/popup.html for qe");

        // JSON templates stay valid with quotes in the answers
        let package: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(out.path().join("package.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(package["name"], "Quote \" Ext");
    }

    #[tokio::test]
    async fn test_missing_template_writes_nothing() {
        let out = tempfile::tempdir().unwrap();
        let target = out.path().join("project");
        let store = TemplateStore::from_files(full_store().manifest().clone(), Vec::new());

        let err = render_with_store(&AnswerSet::named("x"), &store, &target)
            .await
            .unwrap_err();

        assert!(matches!(err, ScaffoldError::TemplateMissing { path } if path == MANIFEST_TEMPLATE));
        assert!(!target.exists());
    }

    #[tokio::test]
    async fn test_invalid_json_template_is_reported() {
        let out = tempfile::tempdir().unwrap();
        let store = full_store();
        let mut files: Vec<(String, Vec<u8>)> = RULES
            .iter()
            .flat_map(|rule| rule.files.iter())
            .map(|e| (e.template.to_string(), store.get(e.template).unwrap().to_vec()))
            .collect();
        files.push((MANIFEST_TEMPLATE.to_string(), b"{}".to_vec()));
        files.retain(|(path, _)| path != "package.json");
        files.push(("package.json".to_string(), b"{ broken".to_vec()));
        let store = TemplateStore::from_files(store.manifest().clone(), files);

        let err = render_with_store(&AnswerSet::named("x"), &store, out.path())
            .await
            .unwrap_err();
        assert!(matches!(err, ScaffoldError::InvalidTemplate { path, .. } if path == "package.json"));
    }

    #[tokio::test]
    async fn test_unwritable_output_is_write_failure() {
        let out = tempfile::tempdir().unwrap();
        let blocker = out.path().join("file");
        std::fs::write(&blocker, "not a directory").unwrap();

        let err = render_with_store(&AnswerSet::named("x"), &full_store(), &blocker.join("sub"))
            .await
            .unwrap_err();
        assert!(matches!(err, ScaffoldError::WriteFailure { .. }));
    }

    #[tokio::test]
    async fn test_unrecognized_features_reported() {
        let out = tempfile::tempdir().unwrap();
        let mut answers = AnswerSet::named("x");
        answers.ui_features = vec![UiFeature::Omnibox];
        answers.unrecognized_features = vec!["sidePanel".to_string()];

        let report = render_with_store(&answers, &full_store(), out.path())
            .await
            .unwrap();
        assert_eq!(report.unrecognized_features, vec!["sidePanel"]);
    }
}
