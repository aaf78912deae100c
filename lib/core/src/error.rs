//! Error handling foundation for nexus-gitlab-auth.
//!
//! This module provides only the `Result` type alias using rootcause.
//! Each crate defines its own error kinds in its own error module and
//! uses rootcause's `.context()` to layer them as errors propagate.

use rootcause::Report;

/// A Result type alias using rootcause's Report for error handling.
pub type Result<T, C = ()> = std::result::Result<T, Report<C>>;
