// src/plan.rs
//! Dependency install planning
//!
//! A bundle may carry a locked dependency manifest, a loose one, both, or
//! neither. The plan fixes which manifest the generated install step
//! targets: locked wins over loose, and with neither present the step is
//! omitted from the output entirely (a bundle without dependencies is
//! valid).

use crate::bundle::{BundleContext, LOCKED_REQUIREMENTS, LOOSE_REQUIREMENTS};
use serde::Serialize;

/// Manifest fallback chain resolved for one render
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallPlan {
    candidates: Vec<&'static str>,
    selected: Option<&'static str>,
}

impl InstallPlan {
    /// Resolve the chain against a bundle's recorded files.
    ///
    /// Computed fresh per render; nothing persists between renders.
    pub fn for_bundle(context: &BundleContext) -> Self {
        let candidates = vec![LOCKED_REQUIREMENTS, LOOSE_REQUIREMENTS];
        let selected = candidates
            .iter()
            .copied()
            .find(|candidate| context.has_file(candidate));
        Self {
            candidates,
            selected,
        }
    }

    /// Bundle-relative path of the winning manifest, if any
    pub fn selected(&self) -> Option<&'static str> {
        self.selected
    }

    /// The candidate chain in priority order
    pub fn candidates(&self) -> &[&'static str] {
        &self.candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::BundleSpec;

    #[test]
    fn test_plan_prefers_locked_manifest() {
        let context = BundleSpec::named("svc")
            .with_file(LOCKED_REQUIREMENTS)
            .with_file(LOOSE_REQUIREMENTS)
            .bind()
            .unwrap();
        let plan = InstallPlan::for_bundle(&context);
        assert_eq!(plan.selected(), Some(LOCKED_REQUIREMENTS));
    }

    #[test]
    fn test_plan_falls_back_to_loose_manifest() {
        let context = BundleSpec::named("svc")
            .with_file(LOOSE_REQUIREMENTS)
            .bind()
            .unwrap();
        let plan = InstallPlan::for_bundle(&context);
        assert_eq!(plan.selected(), Some(LOOSE_REQUIREMENTS));
    }

    #[test]
    fn test_plan_without_manifests_selects_none() {
        let context = BundleSpec::named("svc").bind().unwrap();
        let plan = InstallPlan::for_bundle(&context);
        assert_eq!(plan.selected(), None);
    }

    #[test]
    fn test_plan_candidate_order_is_fixed() {
        let context = BundleSpec::named("svc").bind().unwrap();
        let plan = InstallPlan::for_bundle(&context);
        assert_eq!(
            plan.candidates(),
            &[LOCKED_REQUIREMENTS, LOOSE_REQUIREMENTS]
        );
    }
}
