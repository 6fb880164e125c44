//! Charm-style CLI prompts using cliclack

use crate::answers::{Action, AnswerSet, OverridePage, RawAnswers, UiFeature, KNOWN_PERMISSIONS};
use crate::product::ProductConfig;
use crate::render::render_with_store;
use crate::runtime::{check, install};
use crate::templates::{version, TemplateSource, TemplateStore};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Template directory or zip bundle instead of the product default
    pub template_dir: Option<PathBuf>,

    /// Project directory to create
    pub directory: Option<PathBuf>,

    /// YAML or JSON file with answers
    pub answers_file: Option<PathBuf>,

    /// Answers given as flags; these override the answers file
    pub answers: RawAnswers,

    /// Skip `npm install` after generation
    pub skip_install: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

/// Run the CLI with interactive prompts
pub async fn run<C: ProductConfig>(config: &C, args: CreateArgs, cli_version: &str) -> Result<()> {
    cliclack::intro(config.display_name())?;

    // Step 1: Load templates and check version compatibility
    let store = load_templates(config, &args)?;
    if let Some(warning) =
        version::check_compatibility(cli_version, &store.manifest().version, config.upgrade_command())
    {
        cliclack::log::warning(warning.to_string())?;
    }

    // Step 2: Collect answers (file, flags, then prompts for anything missing)
    let answers = collect_answers(&args)?;

    // Step 3: Select directory
    let project_dir = select_directory(&args, &answers)?;

    // Step 4: Summary
    show_summary(&answers, &project_dir)?;
    if !args.yes {
        let proceed: bool = cliclack::confirm("Create project?")
            .initial_value(true)
            .interact()?;
        if !proceed {
            anyhow::bail!("Setup cancelled.");
        }
    }

    // Step 5: Create project
    create_project(&store, &answers, &project_dir).await?;

    // Step 6: Install dependencies
    let installed = if args.skip_install {
        cliclack::log::info("Skipping dependency installation")?;
        false
    } else {
        install_dependencies(&project_dir).await?
    };

    // Step 7: Show next steps
    print_next_steps(config, &project_dir, &answers, installed)?;

    Ok(())
}

fn load_templates<C: ProductConfig>(config: &C, args: &CreateArgs) -> Result<TemplateStore> {
    let source = TemplateSource::from_config(config, args.template_dir.as_deref());

    let spinner = cliclack::spinner();
    spinner.start("Loading templates...");

    match TemplateStore::open(&source) {
        Ok(store) => {
            spinner.stop(format!(
                "Template: {} - {}",
                store.manifest().name,
                store.manifest().description
            ));
            Ok(store)
        }
        Err(e) => {
            spinner.stop("Failed to load templates");
            Err(e).with_context(|| format!("Templates at {}", source.path().display()))
        }
    }
}

fn collect_answers(args: &CreateArgs) -> Result<AnswerSet> {
    let mut raw = match &args.answers_file {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let raw = RawAnswers::from_yaml(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            cliclack::log::info(format!("Using answers from {}", path.display()))?;
            raw
        }
        None => RawAnswers::default(),
    };
    raw.merge(args.answers.clone());

    if !args.yes {
        prompt_missing(&mut raw)?;
    }

    let answers = AnswerSet::try_from(raw)?;
    for feature in &answers.unrecognized_features {
        cliclack::log::warning(format!("Unknown UI feature '{}' (ignored)", feature))?;
    }
    let unknown: Vec<&str> = answers
        .permissions
        .iter()
        .map(String::as_str)
        .filter(|p| !KNOWN_PERMISSIONS.contains(p))
        .collect();
    if !unknown.is_empty() {
        cliclack::log::info(format!(
            "Passing through unlisted permissions: {}",
            unknown.join(", ")
        ))?;
    }

    Ok(answers)
}

fn prompt_missing(raw: &mut RawAnswers) -> Result<()> {
    if raw.name.is_none() {
        let name: String = cliclack::input("Extension name")
            .placeholder("my-extension")
            .validate(|input: &String| {
                if input.trim().is_empty() {
                    Err("Please enter a name")
                } else {
                    Ok(())
                }
            })
            .interact()?;
        raw.name = Some(name);
    }

    if raw.short_name.is_none() {
        let default = raw.name.clone().unwrap_or_default();
        let short_name: String = cliclack::input("Short name (max. 12 characters)")
            .default_input(&default)
            .interact()?;
        raw.short_name = Some(short_name);
    }

    if raw.description.is_none() {
        let description: String = cliclack::input("Description")
            .default_input("My Chrome extension")
            .interact()?;
        raw.description = Some(description);
    }

    if raw.action.is_none() {
        let action: Action = cliclack::select("Primary UI action")
            .item(Action::Browser, Action::Browser.display_name(), "toolbar icon on every page")
            .item(Action::Page, Action::Page.display_name(), "icon shown on selected pages")
            .item(Action::None, Action::None.display_name(), "")
            .interact()?;
        raw.action = Some(answer_name(action));
    }

    if raw.override_page.is_none() {
        let page: OverridePage = cliclack::select("Override a browser page?")
            .item(OverridePage::None, OverridePage::None.display_name(), "")
            .item(OverridePage::Newtab, OverridePage::Newtab.display_name(), "")
            .item(OverridePage::Bookmarks, OverridePage::Bookmarks.display_name(), "")
            .item(OverridePage::History, OverridePage::History.display_name(), "")
            .interact()?;
        raw.override_page = Some(answer_name(page));
    }

    if raw.ui_features.is_empty() {
        let mut multi = cliclack::multiselect("UI features");
        for feature in UiFeature::ALL {
            multi = multi.item(feature, feature.display_name(), "");
        }
        let selected: Vec<UiFeature> = multi.required(false).interact()?;
        raw.ui_features = selected.iter().map(|f| format!("{:?}", f)).collect();
    }

    if raw.permissions.is_empty() {
        let mut multi = cliclack::multiselect("Permissions");
        for permission in KNOWN_PERMISSIONS {
            multi = multi.item(permission.to_string(), *permission, "");
        }
        raw.permissions = multi.required(false).interact()?;
    }

    Ok(())
}

fn answer_name<T: clap::ValueEnum>(value: T) -> String {
    value
        .to_possible_value()
        .map(|v| v.get_name().to_string())
        .unwrap_or_default()
}

fn select_directory(args: &CreateArgs, answers: &AnswerSet) -> Result<PathBuf> {
    let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let resolve = |p: PathBuf| if p.is_absolute() { p } else { current_dir.join(p) };

    let path = if let Some(dir) = &args.directory {
        let p = resolve(dir.clone());
        cliclack::log::info(format!("Using directory: {}", p.display()))?;
        p
    } else if args.yes {
        resolve(PathBuf::from(answers.slug()))
    } else {
        let slug = answers.slug();
        let input: String = cliclack::input("Project directory")
            .placeholder(&slug)
            .default_input(&slug)
            .interact()?;
        if input.is_empty() || input == "." {
            current_dir.clone()
        } else {
            resolve(PathBuf::from(input))
        }
    };

    if let Some(parent) = path.parent() {
        if !parent.exists() && parent != Path::new("") {
            anyhow::bail!("Parent directory does not exist: {}", parent.display());
        }
    }

    if path.is_dir() {
        if let Ok(entries) = std::fs::read_dir(&path) {
            let count = entries.count();
            if count > 0 {
                cliclack::log::warning(format!("Directory has {} existing items", count))?;

                let confirm = if args.yes {
                    true
                } else {
                    cliclack::confirm("Continue anyway?")
                        .initial_value(false)
                        .interact()?
                };

                if !confirm {
                    anyhow::bail!("Setup cancelled.");
                }
            }
        }
    }

    Ok(path)
}

fn show_summary(answers: &AnswerSet, project_dir: &Path) -> Result<()> {
    let features: Vec<&str> = answers.ui_features.iter().map(|f| f.display_name()).collect();
    let features = if features.is_empty() {
        "none".to_string()
    } else {
        features.join(", ")
    };

    cliclack::log::info(format!(
        "{} ({})\n{}\nAction: {}\nOverride: {}\nFeatures: {}\nPermissions: {}\nDirectory: {}",
        answers.name,
        answers.short_name,
        answers.description,
        answers.action.display_name(),
        answers.override_page.display_name(),
        features,
        answers.permissions.len(),
        project_dir.display()
    ))?;

    Ok(())
}

async fn create_project(store: &TemplateStore, answers: &AnswerSet, project_dir: &Path) -> Result<()> {
    let spinner = cliclack::spinner();
    spinner.start("Creating project...");

    match render_with_store(answers, store, project_dir).await {
        Ok(report) => {
            spinner.stop(format!(
                "Created {} files in {}",
                report.files.len(),
                project_dir.display()
            ));
            Ok(())
        }
        Err(e) => {
            spinner.stop("Failed to create project");
            Err(e.into())
        }
    }
}

/// Returns whether dependencies were installed
async fn install_dependencies(project_dir: &Path) -> Result<bool> {
    let runtimes = check::check_runtimes();
    let info: Vec<String> = runtimes.iter().map(|r| r.describe()).collect();
    cliclack::log::info(format!("Detected runtimes: {}", info.join(", ")))?;

    if !runtimes.iter().all(|r| r.available) {
        cliclack::log::warning("Node.js and npm are needed to build the extension (https://nodejs.org)")?;
        return Ok(false);
    }

    match install::install_dependencies(project_dir).await {
        Ok(()) => {
            cliclack::log::success("Dependencies installed")?;
            Ok(true)
        }
        Err(e) => {
            cliclack::log::warning(format!("{:#}", e))?;
            Ok(false)
        }
    }
}

fn print_next_steps<C: ProductConfig>(
    config: &C,
    project_dir: &Path,
    answers: &AnswerSet,
    installed: bool,
) -> Result<()> {
    let steps = config.next_steps(project_dir, answers, installed);

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    println!();
    println!("  Docs: {}", config.docs_url());

    cliclack::outro("Happy hacking!")?;

    Ok(())
}
