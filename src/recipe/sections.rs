// src/recipe/sections.rs
//! Default section bodies
//!
//! Each body is a pure function of the resolved context producing one
//! block of Containerfile text without trailing newline; the renderer
//! owns the separators. Conditional and looping generation is plain Rust
//! control flow, not a templating language.

use crate::arch::ArchVariant;
use crate::bundle::{
    BundleContext, LOCKED_REQUIREMENTS, LOOSE_REQUIREMENTS, SETUP_SCRIPT, WHEELS_DIR,
};
use crate::error::Result;
use crate::paths;
use crate::plan::InstallPlan;

/// Serving-runtime package installed into every image
pub const RUNTIME_PACKAGE: &str = "galley-serve";

/// Multi-arch base-image stages, stage selection, locale and encoding.
///
/// One stage per de-duplicated architecture variant in first-seen order;
/// TARGETARCH is declared before the first stage because build arguments
/// used in FROM lines must be global.
pub(crate) fn base_image(context: &BundleContext) -> Result<String> {
    let variants = ArchVariant::classify_all(&context.architectures);

    let mut lines = vec!["ARG TARGETARCH".to_string()];
    for variant in &variants {
        lines.push(format!(
            "FROM --platform={} {} AS {}",
            variant.platform(),
            context.base_image,
            variant.stage()
        ));
    }
    lines.push("FROM base-${TARGETARCH} AS release".to_string());
    lines.push("ENV LANG=C.UTF-8".to_string());
    lines.push("ENV LC_ALL=C.UTF-8".to_string());
    lines.push("ENV PYTHONIOENCODING=UTF-8".to_string());
    Ok(lines.join("\n"))
}

/// Service user and group with a stable numeric id
pub(crate) fn bundle_user(context: &BundleContext) -> Result<String> {
    let user = &context.user;
    let id = context.uid;
    Ok(format!(
        "RUN groupadd -g {id} -o {user} && useradd -m -u {id} -g {id} -o -r {user}"
    ))
}

/// Environment exports, working directory, and bundle payload copy
pub(crate) fn environment(context: &BundleContext) -> Result<String> {
    let mut lines = vec![format!("ENV BUNDLE_PATH={}", context.bundle_root)];
    for (name, value) in &context.env {
        lines.push(format!("ENV {}={}", name, value));
    }
    lines.push(format!("WORKDIR {}", context.bundle_root));
    lines.push(format!(
        "COPY --chown={user}:{user} . ./",
        user = context.user
    ));
    Ok(lines.join("\n"))
}

/// Serving-runtime install pinned to the context's version tag
pub(crate) fn runtime_install(context: &BundleContext) -> Result<String> {
    Ok(format!(
        "RUN {} install {}=={} --no-cache-dir",
        context.package_manager, RUNTIME_PACKAGE, context.runtime_version
    ))
}

/// Dependency manifests, local wheels, and the optional setup script.
///
/// Three independent steps. The manifest install appears only when the
/// plan selected a manifest, and encodes locked-over-loose priority as
/// shell branches; the wheel and setup-script steps each carry their own
/// shell guard and are always emitted.
pub(crate) fn dependencies(context: &BundleContext) -> Result<String> {
    let plan = InstallPlan::for_bundle(context);
    let pm = &context.package_manager;
    let mut steps = Vec::new();

    if plan.selected().is_some() {
        let locked = context.bundle_path(LOCKED_REQUIREMENTS);
        let loose = context.bundle_path(LOOSE_REQUIREMENTS);
        steps.push(format!(
            "RUN if [ -f {locked} ]; then \\\n        {pm} install -r {locked} --no-cache-dir; \\\n    elif [ -f {loose} ]; then \\\n        {pm} install -r {loose} --no-cache-dir; \\\n    fi"
        ));
    }

    let wheels_dir = context.bundle_path(WHEELS_DIR);
    let wheels = paths::expand(&wheels_dir, &["*.whl"]);
    steps.push(format!(
        "RUN if [ -d {wheels_dir} ]; then \\\n        {pm} install {wheels} --no-cache-dir; \\\n    fi"
    ));

    let setup = context.bundle_path(SETUP_SCRIPT);
    steps.push(format!(
        "RUN if [ -f {setup} ]; then \\\n        chmod +x {setup} && {setup}; \\\n    fi"
    ));

    Ok(steps.join("\n"))
}

/// Exposed port, entrypoint permissions, identity switch, and command
pub(crate) fn entrypoint(context: &BundleContext) -> Result<String> {
    let lines = vec![
        format!("EXPOSE {}", context.port),
        format!("RUN chmod +x {}", context.entrypoint),
        format!("USER {}", context.user),
        format!("ENTRYPOINT [ \"{}\" ]", context.entrypoint),
        "CMD [\"serve\"]".to_string(),
    ];
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::BundleSpec;

    fn context() -> BundleContext {
        BundleSpec::named("svc").bind().unwrap()
    }

    // === base-image tests ===

    #[test]
    fn test_base_image_declares_targetarch_before_stages() {
        let text = base_image(&context()).unwrap();
        let arg = text.find("ARG TARGETARCH").unwrap();
        let from = text.find("FROM").unwrap();
        assert!(arg < from, "TARGETARCH must be declared before any stage");
    }

    #[test]
    fn test_base_image_dedups_variant_stages() {
        let spec = BundleSpec::named("svc").with_architectures([
            "linux/amd64",
            "linux/arm64",
            "linux/arm64",
        ]);
        let text = base_image(&spec.bind().unwrap()).unwrap();
        assert_eq!(text.matches("AS base-amd64").count(), 1);
        assert_eq!(text.matches("AS base-arm64").count(), 1);
        assert!(text.find("AS base-amd64").unwrap() < text.find("AS base-arm64").unwrap());
    }

    #[test]
    fn test_base_image_never_repeats_stage_names() {
        // "armhf" and "arm" classify differently but share a stage name
        let spec = BundleSpec::named("svc").with_architectures(["armhf", "arm"]);
        let text = base_image(&spec.bind().unwrap()).unwrap();
        assert_eq!(text.matches("AS base-arm").count(), 1);
    }

    #[test]
    fn test_base_image_final_stage_selects_by_targetarch() {
        let text = base_image(&context()).unwrap();
        assert!(text.contains("FROM base-${TARGETARCH} AS release"));
    }

    #[test]
    fn test_base_image_stage_lines() {
        let spec = BundleSpec::named("svc")
            .with_base_image("python:3.12-slim")
            .with_architectures(["aarch64"]);
        let text = base_image(&spec.bind().unwrap()).unwrap();
        assert!(text.contains("FROM --platform=linux/arm64 python:3.12-slim AS base-arm64"));
    }

    #[test]
    fn test_base_image_sets_locale_and_encoding() {
        let text = base_image(&context()).unwrap();
        assert!(text.contains("ENV LANG=C.UTF-8"));
        assert!(text.contains("ENV LC_ALL=C.UTF-8"));
        assert!(text.contains("ENV PYTHONIOENCODING=UTF-8"));
    }

    // === bundle-user tests ===

    #[test]
    fn test_bundle_user_creates_group_and_user() {
        let text = bundle_user(&context()).unwrap();
        assert_eq!(
            text,
            "RUN groupadd -g 1034 -o galley && useradd -m -u 1034 -g 1034 -o -r galley"
        );
    }

    // === environment tests ===

    #[test]
    fn test_environment_exports_sorted_env_vars() {
        let spec = BundleSpec::named("svc")
            .with_env_var("ZED", "last")
            .with_env_var("ALPHA", "first");
        let text = environment(&spec.bind().unwrap()).unwrap();
        let alpha = text.find("ENV ALPHA=first").unwrap();
        let zed = text.find("ENV ZED=last").unwrap();
        assert!(alpha < zed, "env exports render in sorted order");
    }

    #[test]
    fn test_environment_sets_workdir_and_copies_bundle() {
        let text = environment(&context()).unwrap();
        assert!(text.contains("ENV BUNDLE_PATH=/home/galley/bundle"));
        assert!(text.contains("WORKDIR /home/galley/bundle"));
        assert!(text.contains("COPY --chown=galley:galley . ./"));
    }

    // === runtime-install tests ===

    #[test]
    fn test_runtime_install_pins_version() {
        let spec = BundleSpec::named("svc").with_runtime_version("1.4.2");
        let text = runtime_install(&spec.bind().unwrap()).unwrap();
        assert_eq!(text, "RUN pip install galley-serve==1.4.2 --no-cache-dir");
    }

    // === dependencies tests ===

    #[test]
    fn test_dependencies_with_manifest_encodes_priority() {
        let spec = BundleSpec::named("svc").with_file(LOOSE_REQUIREMENTS);
        let text = dependencies(&spec.bind().unwrap()).unwrap();
        let locked = text.find("requirements.lock.txt").unwrap();
        let loose = text
            .find("elif [ -f /home/galley/bundle/env/requirements.txt ]")
            .unwrap();
        assert!(locked < loose, "locked branch is checked first");
    }

    #[test]
    fn test_dependencies_without_manifest_omits_install_step() {
        let text = dependencies(&context()).unwrap();
        assert!(!text.contains("requirements"));
        // The independent steps remain
        assert!(text.contains("*.whl"));
        assert!(text.contains("env/setup.sh"));
    }

    #[test]
    fn test_dependencies_wheel_and_setup_steps_are_guarded() {
        let text = dependencies(&context()).unwrap();
        assert!(text.contains("if [ -d /home/galley/bundle/env/wheels ]"));
        assert!(text.contains("pip install /home/galley/bundle/env/wheels/*.whl --no-cache-dir"));
        assert!(text.contains("if [ -f /home/galley/bundle/env/setup.sh ]"));
        assert!(text.contains("chmod +x /home/galley/bundle/env/setup.sh"));
    }

    // === entrypoint tests ===

    #[test]
    fn test_entrypoint_order_and_identity_switch() {
        let text = entrypoint(&context()).unwrap();
        assert!(text.contains("EXPOSE 3000"));
        let chmod = text
            .find("RUN chmod +x /home/galley/bundle/env/entrypoint.sh")
            .unwrap();
        let user = text.find("USER galley").unwrap();
        let entry = text
            .find("ENTRYPOINT [ \"/home/galley/bundle/env/entrypoint.sh\" ]")
            .unwrap();
        assert!(chmod < user, "permissions are fixed before dropping root");
        assert!(user < entry);
        assert!(text.ends_with("CMD [\"serve\"]"));
    }
}
