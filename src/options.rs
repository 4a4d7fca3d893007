// src/options.rs
//! Option binding: explicit values win, defaults fill the rest
//!
//! Every configurable knob flows through this seam when a bundle
//! description is bound, so the precedence rule lives in one place and
//! the sections stay declarative.

use crate::error::{Error, Result};

/// Resolve an optional knob against its default
pub fn resolve<T>(explicit: Option<T>, default: T) -> T {
    explicit.unwrap_or(default)
}

/// Resolve an optional knob against a default built on demand
pub fn resolve_with<T, F>(explicit: Option<T>, default: F) -> T
where
    F: FnOnce() -> T,
{
    explicit.unwrap_or_else(default)
}

/// Require a knob that has no default.
///
/// Fails with a ConfigurationError naming the knob; binding runs before
/// rendering, so the failure surfaces before any output exists.
pub fn require<T>(name: &str, explicit: Option<T>) -> Result<T> {
    explicit.ok_or_else(|| Error::ConfigurationError(format!("Missing required option '{}'", name)))
}
