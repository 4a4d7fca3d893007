// src/bundle/mod.rs
//! Bundle descriptions and resolved render contexts
//!
//! A bundle is the packaged service artifact galley generates recipes for.
//! Its layout is fixed: dependency manifests, wheels, and scripts all live
//! under `env/` relative to the bundle root, so the generated script can
//! find them without negotiation.
//!
//! Two types separate "what the packager said" from "what the renderer
//! sees": [`BundleSpec`] is the declarative description with every knob
//! optional, and [`BundleContext`] is the fully-resolved record produced
//! by [`BundleSpec::bind`]. Sections only ever read the context.

pub mod manifest;

use crate::error::{Error, Result};
use crate::{options, paths};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Manifest file name at the bundle root
pub const MANIFEST_FILE: &str = "bundle.toml";

/// Bundle-relative path of the locked dependency manifest
pub const LOCKED_REQUIREMENTS: &str = "env/requirements.lock.txt";

/// Bundle-relative path of the loose dependency manifest
pub const LOOSE_REQUIREMENTS: &str = "env/requirements.txt";

/// Bundle-relative directory holding locally built wheels
pub const WHEELS_DIR: &str = "env/wheels";

/// Bundle-relative path of the optional setup script
pub const SETUP_SCRIPT: &str = "env/setup.sh";

/// Bundle-relative path of the default entrypoint script
pub const ENTRYPOINT_SCRIPT: &str = "env/entrypoint.sh";

/// Default image the generated recipe builds on
pub const DEFAULT_BASE_IMAGE: &str = "python:3.11-slim";

/// Default architecture list when the description names none
pub const DEFAULT_ARCHITECTURES: &[&str] = &["amd64"];

/// Default in-image user name
pub const DEFAULT_USER: &str = "galley";

/// Default numeric id used for both the user and its group
pub const DEFAULT_UID: u32 = 1034;

/// Default dependency installer command
pub const DEFAULT_PACKAGE_MANAGER: &str = "pip";

/// Default port the service listens on
pub const DEFAULT_PORT: u16 = 3000;

/// Declarative bundle description, as written by the packager
///
/// Every knob except `name` has a default applied at bind time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BundleSpec {
    /// Bundle identity; the one knob with no default
    #[serde(default)]
    pub name: Option<String>,
    /// Bundle version tag
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub base_image: Option<String>,
    /// Target architectures in declaration order
    #[serde(default)]
    pub architectures: Option<Vec<String>>,
    #[serde(default)]
    pub user: Option<String>,
    /// Numeric id used for both the user and its group
    #[serde(default)]
    pub uid: Option<u32>,
    #[serde(default)]
    pub home: Option<String>,
    #[serde(default)]
    pub package_manager: Option<String>,
    /// Version tag of the serving runtime installed into the image
    #[serde(default)]
    pub runtime_version: Option<String>,
    #[serde(default)]
    pub entrypoint: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    /// Environment variables exported into the image
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    /// Bundle-relative files the packager placed in the bundle
    #[serde(default)]
    pub files: Vec<String>,
    /// When the packager assembled the bundle; metadata only, never
    /// rendered. Both the TOML-native datetime form and an RFC 3339
    /// string are accepted.
    #[serde(default, deserialize_with = "deserialize_created_at")]
    pub created_at: Option<DateTime<Utc>>,
}

// TOML has a native datetime type and packagers may also quote the stamp;
// both forms are accepted and normalized to UTC.
fn deserialize_created_at<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Stamp {
        Text(String),
        Native(toml::value::Datetime),
    }

    let text = match Stamp::deserialize(deserializer)? {
        Stamp::Text(text) => text,
        Stamp::Native(datetime) => datetime.to_string(),
    };
    DateTime::parse_from_rfc3339(&text)
        .map(|stamp| Some(stamp.with_timezone(&Utc)))
        .map_err(|e| {
            serde::de::Error::custom(format!("invalid created_at stamp '{}': {}", text, e))
        })
}

impl BundleSpec {
    /// Start a description for the named bundle
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Set the bundle version tag
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the base image
    pub fn with_base_image(mut self, image: impl Into<String>) -> Self {
        self.base_image = Some(image.into());
        self
    }

    /// Set the target architecture list
    pub fn with_architectures(
        mut self,
        identifiers: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.architectures = Some(identifiers.into_iter().map(Into::into).collect());
        self
    }

    /// Set the in-image user name
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Set the numeric user/group id
    pub fn with_uid(mut self, uid: u32) -> Self {
        self.uid = Some(uid);
        self
    }

    /// Set the dependency installer command
    pub fn with_package_manager(mut self, command: impl Into<String>) -> Self {
        self.package_manager = Some(command.into());
        self
    }

    /// Set the serving-runtime version tag
    pub fn with_runtime_version(mut self, version: impl Into<String>) -> Self {
        self.runtime_version = Some(version.into());
        self
    }

    /// Set the entrypoint script path
    pub fn with_entrypoint(mut self, path: impl Into<String>) -> Self {
        self.entrypoint = Some(path.into());
        self
    }

    /// Set the exposed port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Export an environment variable into the image
    pub fn with_env_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(name.into(), value.into());
        self
    }

    /// Record a bundle-relative file as present
    pub fn with_file(mut self, relative: impl Into<String>) -> Self {
        self.files.push(relative.into());
        self
    }

    /// Resolve this description into an immutable render context.
    ///
    /// Every required-value failure surfaces here, before any section body
    /// runs. The returned context is never mutated afterwards.
    pub fn bind(&self) -> Result<BundleContext> {
        let name = options::require("name", self.name.clone())?;

        let architectures = options::resolve_with(self.architectures.clone(), || {
            DEFAULT_ARCHITECTURES.iter().map(|a| a.to_string()).collect()
        });
        if architectures.is_empty() {
            return Err(Error::ConfigurationError(
                "Architecture list must not be empty".to_string(),
            ));
        }

        let user = options::resolve(self.user.clone(), DEFAULT_USER.to_string());
        let uid = options::resolve(self.uid, DEFAULT_UID);
        let home = options::resolve_with(self.home.clone(), || format!("/home/{}", user));
        let bundle_root = paths::expand(&home, &["bundle"]);
        let entrypoint = options::resolve_with(self.entrypoint.clone(), || {
            paths::expand(&bundle_root, &[ENTRYPOINT_SCRIPT])
        });

        Ok(BundleContext {
            name,
            version: options::resolve(self.version.clone(), "latest".to_string()),
            base_image: options::resolve(self.base_image.clone(), DEFAULT_BASE_IMAGE.to_string()),
            architectures,
            user,
            uid,
            home,
            bundle_root,
            package_manager: options::resolve(
                self.package_manager.clone(),
                DEFAULT_PACKAGE_MANAGER.to_string(),
            ),
            runtime_version: options::resolve(
                self.runtime_version.clone(),
                env!("CARGO_PKG_VERSION").to_string(),
            ),
            entrypoint,
            port: options::resolve(self.port, DEFAULT_PORT),
            env: self.env.clone(),
            files: self.files.iter().cloned().collect(),
        })
    }
}

/// Fully-resolved inputs for one render
///
/// Built once per render via [`BundleSpec::bind`]; sections share it
/// read-only and communicate through nothing else.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BundleContext {
    pub name: String,
    pub version: String,
    pub base_image: String,
    pub architectures: Vec<String>,
    pub user: String,
    pub uid: u32,
    pub home: String,
    pub bundle_root: String,
    pub package_manager: String,
    pub runtime_version: String,
    pub entrypoint: String,
    pub port: u16,
    pub env: BTreeMap<String, String>,
    pub files: BTreeSet<String>,
}

impl BundleContext {
    /// True when the bundle recorded this bundle-relative file as present
    pub fn has_file(&self, relative: &str) -> bool {
        self.files.contains(relative)
    }

    /// Absolute in-image path of a bundle-relative file
    pub fn bundle_path(&self, relative: &str) -> String {
        paths::expand(&self.bundle_root, &[relative])
    }
}
