// src/paths.rs
//! Path composition for generated recipes
//!
//! Every path galley emits is interpreted later, inside the container, by
//! the shell executing the generated script. Composition is therefore pure
//! string work against the container's `/` convention, independent of the
//! host platform, and never checks that anything exists.

/// Join segments under a root path.
///
/// A segment may itself be a glob pattern (`*.whl`); it passes through
/// verbatim for the downstream shell to expand. An empty segment list
/// returns the root unchanged.
pub fn expand(root: &str, segments: &[&str]) -> String {
    if segments.is_empty() {
        return root.to_string();
    }
    let mut path = root.trim_end_matches('/').to_string();
    for segment in segments {
        path.push('/');
        path.push_str(segment);
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_joins_segments() {
        assert_eq!(
            expand("/home/galley/bundle", &["env", "requirements.txt"]),
            "/home/galley/bundle/env/requirements.txt"
        );
    }

    #[test]
    fn test_expand_empty_segments_returns_root() {
        assert_eq!(expand("/home/galley/bundle", &[]), "/home/galley/bundle");
    }

    #[test]
    fn test_expand_trailing_slash_root() {
        assert_eq!(
            expand("/home/galley/bundle/", &["env"]),
            "/home/galley/bundle/env"
        );
    }

    #[test]
    fn test_expand_wildcard_passes_through() {
        assert_eq!(
            expand("/home/galley/bundle", &["env", "wheels", "*.whl"]),
            "/home/galley/bundle/env/wheels/*.whl"
        );
    }

    #[test]
    fn test_expand_from_filesystem_root() {
        assert_eq!(expand("/", &["opt", "bundle"]), "/opt/bundle");
    }
}
