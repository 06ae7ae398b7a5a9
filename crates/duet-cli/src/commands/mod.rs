//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (config overrides, source selection, loading)
//! - `insights` - Insights over the whole dataset
//! - `reports` - Monthly report generation
//! - `validate` - Row validation summary

pub mod core;
pub mod insights;
pub mod reports;
pub mod validate;

// Re-export command functions for main.rs
pub use core::*;
pub use insights::*;
pub use reports::*;
pub use validate::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
