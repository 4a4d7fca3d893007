// src/lib.rs

//! Galley
//!
//! Container recipe generator for packaged service bundles. A bundle's
//! declarative description (`bundle.toml`) is bound into an immutable
//! render context; a fixed pipeline of named, overridable sections then
//! produces a deterministic Containerfile.
//!
//! # Architecture
//!
//! - Declarative-first: the bundle manifest describes, galley resolves
//! - Sections: named blocks in fixed order, overridable with call-super
//! - Total classification: every architecture identifier maps to a variant
//! - Pure rendering: no filesystem access once the context is bound

pub mod arch;
pub mod bundle;
mod error;
pub mod options;
pub mod paths;
pub mod plan;
pub mod recipe;

pub use arch::ArchVariant;
pub use bundle::{BundleContext, BundleSpec};
pub use error::{Error, Result};
pub use plan::InstallPlan;
pub use recipe::{Inherited, Overrides, Recipe, RUNTIME_PACKAGE};
