//! Product configuration trait for CLI binaries
//!
//! Each binary implements this trait to configure where its templates live
//! and what it tells the user once a project has been generated.

use crate::answers::AnswerSet;
use std::path::{Path, PathBuf};

/// Configuration trait for scaffolding CLI products
///
/// A product defines:
/// - Product identity (name, display name)
/// - Template location (default directory and env var override)
/// - Documentation links
/// - Post-setup instructions
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for CLI command, env vars)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Template directory (or zip bundle) used when nothing else is configured
    fn default_template_dir(&self) -> PathBuf;

    /// Environment variable name for overriding the template location
    fn template_dir_env(&self) -> &'static str;

    /// URL for platform documentation
    fn docs_url(&self) -> &'static str;

    /// Generate the "next steps" instructions after project creation
    fn next_steps(&self, dir: &Path, answers: &AnswerSet, installed: bool) -> Vec<String>;

    /// Upgrade/install command shown in version warnings
    fn upgrade_command(&self) -> &'static str;
}
