// src/arch.rs
//! Target architecture classification for multi-arch recipes
//!
//! Bundle descriptions name architectures loosely ("aarch64", "linux/arm64",
//! "ARMhf"); the generated recipe needs one canonical variant per CPU family
//! so stage names line up with the TARGETARCH build argument.

use std::fmt;

/// Canonical CPU family selecting a base-image stage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArchVariant {
    /// 64-bit ARM (arm64, aarch64)
    Arm64,
    /// 32-bit ARM (armhf, armel)
    Arm,
    /// 32-bit x86 (i386)
    X86,
    /// Anything else, kept under its own identifier (amd64, ppc64le, ...)
    Named(String),
}

impl ArchVariant {
    /// Classify a raw architecture identifier.
    ///
    /// Case-insensitive substring matching; 64-bit ARM keywords are checked
    /// before 32-bit ones so "arm64" never lands on [`ArchVariant::Arm`].
    /// Total: unrecognized identifiers become [`ArchVariant::Named`] rather
    /// than an error.
    pub fn classify(identifier: &str) -> Self {
        let lowered = identifier.to_lowercase();
        if lowered.contains("arm64") || lowered.contains("aarch64") {
            Self::Arm64
        } else if lowered.contains("armhf") || lowered.contains("armel") {
            Self::Arm
        } else if lowered.contains("i386") {
            Self::X86
        } else {
            // "linux/amd64" and plain "amd64" must land on the same variant,
            // otherwise the stage name and TARGETARCH value cannot line up
            let name = match lowered.rsplit_once('/') {
                Some((_, tail)) => tail,
                None => lowered.as_str(),
            };
            Self::Named(name.to_string())
        }
    }

    /// Identifier used in stage names, matching TARGETARCH values
    pub fn as_str(&self) -> &str {
        match self {
            Self::Arm64 => "arm64",
            Self::Arm => "arm",
            Self::X86 => "386",
            Self::Named(name) => name,
        }
    }

    /// Platform string for a `FROM --platform=` clause
    pub fn platform(&self) -> String {
        format!("linux/{}", self.as_str())
    }

    /// Name of this variant's base-image stage
    pub fn stage(&self) -> String {
        format!("base-{}", self.as_str())
    }

    /// Classify a list of identifiers, dropping repeats.
    ///
    /// De-duplication compares stage identifiers rather than variants, so
    /// a pair like "armhf" and "arm" collapses into one stage instead of
    /// declaring `base-arm` twice. First-seen order is preserved so
    /// generated stages follow the order the bundle declared its
    /// architectures in. The accumulator is local to this call; nothing is
    /// shared between renders.
    pub fn classify_all(identifiers: &[String]) -> Vec<ArchVariant> {
        let mut variants = Vec::new();
        for identifier in identifiers {
            let variant = Self::classify(identifier);
            if !variants
                .iter()
                .any(|seen: &ArchVariant| seen.as_str() == variant.as_str())
            {
                variants.push(variant);
            }
        }
        variants
    }
}

impl fmt::Display for ArchVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
