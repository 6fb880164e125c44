//! Kickstart Core - scaffolding library for Chrome extension projects
//!
//! Given a set of answers (name, description, primary action, override page,
//! UI features, permissions) this library copies a template tree and renders
//! the handful of files that depend on those answers, most importantly the
//! extension's `manifest.json`.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - answer validation, the file plan, manifest
//!   assembly and the renderer
//! - **Layer 2: Workflow Orchestration** - `ProductConfig` trait, template
//!   stores, runtime detection and dependency install
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use kickstart_core::{render, AnswerSet, RawAnswers};
//!
//! let raw = RawAnswers::from_yaml("name: my-extension\naction: browser\n")?;
//! let answers = AnswerSet::try_from(raw)?;
//! let report = render(&answers, "templates/chrome-extension".as_ref(), "out".as_ref()).await?;
//! println!("wrote {} files", report.files.len());
//! ```

pub mod answers;
pub mod error;
pub mod extension_manifest;
pub mod plan;
pub mod product;
pub mod render;
pub mod runtime;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use answers::{Action, AnswerSet, OverridePage, RawAnswers, UiFeature, KNOWN_PERMISSIONS};
pub use error::{ScaffoldError, ScaffoldResult};
pub use extension_manifest::ManifestDocument;
pub use plan::{FilePlan, FilePlanEntry};
pub use product::ProductConfig;
pub use render::{render, render_with_store, RenderReport};
pub use runtime::{check_runtimes, RuntimeInfo};
pub use templates::{TemplateManifest, TemplateSource, TemplateStore};

#[cfg(feature = "tui")]
pub use tui::run;
