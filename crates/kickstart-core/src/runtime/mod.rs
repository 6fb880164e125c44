//! Runtime detection and dependency installation
//!
//! This module provides:
//! - Node.js / npm detection (advisory)
//! - `npm install` for freshly generated projects

pub mod check;
pub mod install;

pub use check::{check_node, check_npm, check_runtimes, RuntimeInfo};
pub use install::{install_command, install_dependencies};
