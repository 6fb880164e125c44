//! Kickstart CLI - Project scaffolding for Chrome extensions

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use kickstart_core::tui::CreateArgs;
use kickstart_core::{Action, AnswerSet, OverridePage, ProductConfig, RawAnswers};
use std::path::{Path, PathBuf};

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Chrome extension product configuration
#[derive(Clone)]
pub struct KickstartConfig;

impl ProductConfig for KickstartConfig {
    fn name(&self) -> &'static str {
        "kickstart"
    }

    fn display_name(&self) -> &'static str {
        "Chrome Extension Kickstart"
    }

    fn default_template_dir(&self) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../templates/chrome-extension")
    }

    fn template_dir_env(&self) -> &'static str {
        "KICKSTART_TEMPLATE_DIR"
    }

    fn docs_url(&self) -> &'static str {
        "https://developer.chrome.com/docs/extensions"
    }

    fn upgrade_command(&self) -> &'static str {
        "cargo install kickstart-tools --force"
    }

    fn next_steps(&self, dir: &Path, _answers: &AnswerSet, installed: bool) -> Vec<String> {
        let mut steps = Vec::new();
        let current = std::env::current_dir().ok();

        // Step 1: cd to directory if not current
        if current.as_deref() != Some(dir) {
            steps.push(format!("cd {}", dir.display()));
        }

        // Step 2: Install dependencies if that was skipped or failed
        if !installed {
            steps.push("npm install".to_string());
        }

        // Step 3: Build and watch
        steps.push("npm run dev".to_string());

        // Step 4: Load into the browser
        steps.push(
            "Open chrome://extensions, enable Developer mode and\n\
                  load the dist/ directory with \"Load unpacked\""
                .to_string(),
        );

        steps
    }
}

#[derive(Parser, Debug)]
#[command(name = "kickstart-tools")]
#[command(about = "CLI for scaffolding Chrome extension projects")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new Chrome extension project
    Create(CliCreateArgs),
    /// Bundle the template directory into a zip file (for development use)
    BuildZips(BuildZipsArgs),
}

#[derive(Parser, Debug)]
pub struct CliCreateArgs {
    /// Template directory or zip bundle to use instead of the bundled templates
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,

    /// Project directory to create
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// YAML or JSON file with answers (name, shortName, description, action, ...)
    #[arg(long)]
    pub answers: Option<PathBuf>,

    /// Extension name
    #[arg(long)]
    pub name: Option<String>,

    /// Short name (max. 12 characters)
    #[arg(long = "short-name")]
    pub short_name: Option<String>,

    /// Extension description
    #[arg(long)]
    pub description: Option<String>,

    /// Primary UI action
    #[arg(long, value_enum)]
    pub action: Option<Action>,

    /// Browser page to override
    #[arg(long = "override-page", value_enum)]
    pub override_page: Option<OverridePage>,

    /// UI features (comma-separated: options,devtoolsPage,contentScript,omnibox)
    #[arg(short, long, value_delimiter = ',')]
    pub features: Vec<String>,

    /// Permissions (comma-separated, e.g. tabs,storage,alarms)
    #[arg(short, long, value_delimiter = ',')]
    pub permissions: Vec<String>,

    /// Skip `npm install` after generating the project
    #[arg(long = "skip-install")]
    pub skip_install: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

fn value_name<T: ValueEnum>(value: T) -> Option<String> {
    value.to_possible_value().map(|v| v.get_name().to_string())
}

impl From<CliCreateArgs> for CreateArgs {
    fn from(args: CliCreateArgs) -> Self {
        CreateArgs {
            template_dir: args.template_dir,
            directory: args.directory,
            answers_file: args.answers,
            answers: RawAnswers {
                name: args.name,
                short_name: args.short_name,
                description: args.description,
                action: args.action.and_then(value_name),
                override_page: args.override_page.and_then(value_name),
                ui_features: args.features,
                permissions: args.permissions,
            },
            skip_install: args.skip_install,
            yes: args.yes,
        }
    }
}

#[derive(Parser, Debug)]
pub struct BuildZipsArgs {
    /// Template directory to bundle (defaults to the bundled templates)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    let config = KickstartConfig;

    match args.command {
        Some(Command::Create(create_args)) => {
            let result = kickstart_core::run(&config, create_args.into(), CLI_VERSION).await;

            // Ensure cursor is visible on normal exit
            let _ = console::Term::stderr().show_cursor();

            result
        }
        Some(Command::BuildZips(build_args)) => {
            kickstart_core::templates::build_zips(&config, build_args.template_dir.as_deref())
                .map(|_| ())
        }
        None => {
            // No subcommand provided, default to interactive create
            let result = kickstart_core::run(&config, CreateArgs::default(), CLI_VERSION).await;

            let _ = console::Term::stderr().show_cursor();

            result
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_flags_map_to_raw_answers() {
        let args = Args::parse_from([
            "kickstart-tools",
            "create",
            "--name",
            "test-extension",
            "--action",
            "browser",
            "--override-page",
            "newtab",
            "--features",
            "options,omnibox",
            "--permissions",
            "tabs,alarms",
            "--skip-install",
            "-y",
        ]);
        let Some(Command::Create(create)) = args.command else {
            panic!("expected create command");
        };
        let create: CreateArgs = create.into();

        assert!(create.yes);
        assert!(create.skip_install);
        let answers = AnswerSet::try_from(create.answers).unwrap();
        assert_eq!(answers.action, Action::Browser);
        assert_eq!(answers.override_page, OverridePage::Newtab);
        assert_eq!(answers.permissions, vec!["tabs", "alarms"]);
    }

    #[test]
    fn test_next_steps_mention_install_only_when_needed() {
        let config = KickstartConfig;
        let answers = AnswerSet::named("x");
        let dir = Path::new("/tmp/definitely-elsewhere");

        let steps = config.next_steps(dir, &answers, false);
        assert!(steps[0].starts_with("cd "));
        assert!(steps.contains(&"npm install".to_string()));

        let steps = config.next_steps(dir, &answers, true);
        assert!(!steps.contains(&"npm install".to_string()));
    }

    #[test]
    fn test_default_template_dir_is_bundled() {
        let dir = KickstartConfig.default_template_dir();
        assert!(dir.join("template.yaml").is_file());
    }
}
