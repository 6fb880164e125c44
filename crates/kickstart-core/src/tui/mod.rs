//! Interactive answer collection using cliclack (Charm-style inline prompts)
//!
//! Only available when the `tui` feature is enabled. Prompts fill in whatever
//! the answers file and CLI flags left open, then hand a validated
//! `AnswerSet` to the renderer.

#[cfg(feature = "tui")]
mod prompts;

#[cfg(feature = "tui")]
pub use prompts::{run, CreateArgs};
