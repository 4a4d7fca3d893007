// src/recipe/mod.rs
//! Recipe composition and rendering
//!
//! A recipe is an ordered pipeline of named sections; each section turns
//! the resolved [`BundleContext`] into one block of Containerfile text.
//! The six default sections cover what a service bundle needs, and a
//! caller can override any of them by name, optionally splicing the
//! inherited default text into its replacement.
//!
//! Rendering is pure: all inputs live in the context, every failure
//! surfaces before output exists, and rendering the same inputs twice
//! yields byte-identical text.

mod sections;

pub use sections::RUNTIME_PACKAGE;

use crate::bundle::{BundleContext, BundleSpec};
use crate::error::{Error, Result};
use std::collections::BTreeMap;

/// Pipeline section: multi-arch base-image stages and locale setup
pub const SECTION_BASE_IMAGE: &str = "base-image";
/// Pipeline section: user and group provisioning
pub const SECTION_BUNDLE_USER: &str = "bundle-user";
/// Pipeline section: environment exports, workdir, and bundle copy
pub const SECTION_ENVIRONMENT: &str = "environment";
/// Pipeline section: serving-runtime installation
pub const SECTION_RUNTIME_INSTALL: &str = "runtime-install";
/// Pipeline section: dependency manifests, wheels, and setup script
pub const SECTION_DEPENDENCIES: &str = "dependencies";
/// Pipeline section: port, permissions, identity switch, and command
pub const SECTION_ENTRYPOINT: &str = "entrypoint";

/// Separator between rendered blocks; sections themselves contain no
/// blank lines, so the separator uniquely delimits them
const SECTION_SEPARATOR: &str = "\n\n";

type BodyFn = dyn Fn(&BundleContext) -> Result<String>;
type OverrideFn = dyn Fn(&BundleContext, Inherited<'_>) -> Result<String>;

/// Handle on the default body of the section being overridden.
///
/// `render` consumes the handle, so an override can splice the inherited
/// text in at most once; dropping it unused makes the override a full
/// replacement.
pub struct Inherited<'a> {
    body: &'a BodyFn,
    context: &'a BundleContext,
}

impl Inherited<'_> {
    /// Render the inherited default body
    pub fn render(self) -> Result<String> {
        (self.body)(self.context)
    }
}

/// Caller-supplied replacement bodies, keyed by section name
#[derive(Default)]
pub struct Overrides {
    bodies: BTreeMap<String, Box<OverrideFn>>,
}

impl Overrides {
    /// An empty override set
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a replacement body for the named section.
    ///
    /// Names are validated when rendering starts: a name matching no
    /// registered section fails the render instead of being appended, so
    /// a typo cannot silently drop an override. Deliberate pipeline
    /// extension goes through [`Recipe::push_section`] instead.
    pub fn insert<F>(&mut self, name: impl Into<String>, body: F)
    where
        F: Fn(&BundleContext, Inherited<'_>) -> Result<String> + 'static,
    {
        self.bodies.insert(name.into(), Box::new(body));
    }

    /// Chainable form of [`Overrides::insert`]
    pub fn with<F>(mut self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&BundleContext, Inherited<'_>) -> Result<String> + 'static,
    {
        self.insert(name, body);
        self
    }

    fn get(&self, name: &str) -> Option<&OverrideFn> {
        self.bodies.get(name).map(|body| body.as_ref())
    }

    fn names(&self) -> impl Iterator<Item = &str> {
        self.bodies.keys().map(String::as_str)
    }
}

/// A named, positioned unit of generated text
struct Section {
    name: String,
    body: Box<BodyFn>,
}

/// Ordered pipeline of sections
pub struct Recipe {
    sections: Vec<Section>,
}

impl Recipe {
    /// The six-section default pipeline.
    ///
    /// Order is fixed; overrides replace bodies, never positions.
    pub fn default_pipeline() -> Self {
        let mut recipe = Self {
            sections: Vec::new(),
        };
        recipe.register(SECTION_BASE_IMAGE, sections::base_image);
        recipe.register(SECTION_BUNDLE_USER, sections::bundle_user);
        recipe.register(SECTION_ENVIRONMENT, sections::environment);
        recipe.register(SECTION_RUNTIME_INSTALL, sections::runtime_install);
        recipe.register(SECTION_DEPENDENCIES, sections::dependencies);
        recipe.register(SECTION_ENTRYPOINT, sections::entrypoint);
        recipe
    }

    fn register<F>(&mut self, name: impl Into<String>, body: F)
    where
        F: Fn(&BundleContext) -> Result<String> + 'static,
    {
        self.sections.push(Section {
            name: name.into(),
            body: Box::new(body),
        });
    }

    /// Append a section after the existing ones.
    ///
    /// Section names are unique: re-registering an existing name fails
    /// rather than adding a second section a single override would then
    /// hit twice. The position is fixed at registration; an override
    /// registered for the same name replaces the body in place.
    pub fn push_section<F>(&mut self, name: impl Into<String>, body: F) -> Result<()>
    where
        F: Fn(&BundleContext) -> Result<String> + 'static,
    {
        let name = name.into();
        if self.sections.iter().any(|section| section.name == name) {
            return Err(Error::TemplateError(format!(
                "Section '{}' is already registered",
                name
            )));
        }
        self.register(name, body);
        Ok(())
    }

    /// Section names in render order
    pub fn section_names(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.name.as_str()).collect()
    }

    /// Bind a bundle description and render its Containerfile
    pub fn render(&self, spec: &BundleSpec, overrides: &Overrides) -> Result<String> {
        let context = spec.bind()?;
        self.render_context(&context, overrides)
    }

    /// Render for an already-resolved context.
    ///
    /// Override names are validated before any section body runs, and any
    /// failure aborts the whole render; partial output is never returned.
    pub fn render_context(&self, context: &BundleContext, overrides: &Overrides) -> Result<String> {
        for name in overrides.names() {
            if !self.sections.iter().any(|section| section.name == name) {
                return Err(Error::TemplateError(format!(
                    "Override targets unknown section '{}'",
                    name
                )));
            }
        }

        let mut blocks = Vec::with_capacity(self.sections.len() + 1);
        blocks.push(banner(context));
        for section in &self.sections {
            let text = match overrides.get(&section.name) {
                Some(body) => {
                    let inherited = Inherited {
                        body: section.body.as_ref(),
                        context,
                    };
                    body(context, inherited)?
                }
                None => (section.body)(context)?,
            };
            blocks.push(text);
        }

        let mut output = blocks.join(SECTION_SEPARATOR);
        output.push('\n');
        Ok(output)
    }
}

/// Fixed header naming the bundle the recipe was generated for
fn banner(context: &BundleContext) -> String {
    format!(
        "# Containerfile for {} ({})\n# Generated by galley; regenerate instead of editing",
        context.name, context.version
    )
}
