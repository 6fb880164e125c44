//! Template loading, bundling and placeholder substitution
//!
//! This module provides:
//! - The root template manifest type (`template.yaml`)
//! - Template stores backed by a local directory or a zip bundle
//! - `{{placeholder}}` substitution for text and JSON templates
//! - Version compatibility checking

pub mod manifest;
pub mod store;
pub mod substitute;
pub mod version;

use crate::product::ProductConfig;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

pub use manifest::{TemplateManifest, TEMPLATE_MANIFEST_FILE};
pub use store::{TemplateSource, TemplateStore};
pub use substitute::{substitute, substitute_json};
pub use version::{check_compatibility, CompatibilityWarning};

/// Bundle a template directory into `<dir>.zip` next to it
pub fn build_zips<C: ProductConfig>(config: &C, template_dir: Option<&Path>) -> Result<PathBuf> {
    let dir = template_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.default_template_dir());

    if !dir.is_dir() {
        anyhow::bail!("Template directory not found: {}", dir.display());
    }

    println!(
        "{}",
        format!("Building {} template bundle...", config.display_name())
            .cyan()
            .bold()
    );
    println!();

    let dir_name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "template".to_string());
    print!("  {} {}...", "->".blue(), dir_name);

    let zip_bytes = match TemplateStore::build_zip(&dir) {
        Ok(bytes) => bytes,
        Err(e) => {
            println!(" {}", "failed".red());
            return Err(e).with_context(|| format!("Failed to bundle {}", dir.display()));
        }
    };

    let zip_path = dir.with_file_name(format!("{}.zip", dir_name));
    std::fs::write(&zip_path, &zip_bytes)
        .with_context(|| format!("Failed to write {}", zip_path.display()))?;
    println!(" {} ({} bytes)", "done".green(), zip_bytes.len());

    println!();
    println!("{} {}", "Built".green().bold(), zip_path.display());

    Ok(zip_path)
}
