//! Flags tags that may be the requested version under another name.

/// Tags longer than this, with no `.` or `-`, look like opaque build ids.
pub const OPAQUE_TAG_MIN_LEN: usize = 12;

/// Substring marking a digest-pinned tag.
pub const DIGEST_MARKER: &str = "sha256";

/// Whether `tag` deserves a human look when no exact version matched.
///
/// Advisory only: a candidate never certifies an image.
pub fn is_candidate_tag(tag: &str) -> bool {
    let opaque = !tag.contains(&['.', '-'][..]) && tag.len() > OPAQUE_TAG_MIN_LEN;
    opaque || tag.contains(DIGEST_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opaque_build_id_is_candidate() {
        assert!(is_candidate_tag("a1b2c3d4e5f6g7"));
    }

    #[test]
    fn test_semver_is_never_candidate() {
        assert!(!is_candidate_tag("1.2.3-rc1"));
        assert!(!is_candidate_tag("1.16.0"));
        assert!(!is_candidate_tag("release-2024-01-01-abcdef"));
    }

    #[test]
    fn test_digest_marker_is_candidate_regardless_of_length() {
        assert!(is_candidate_tag("sha256abcdef"));
        assert!(is_candidate_tag("v1-sha256-abc"));
    }

    #[test]
    fn test_length_threshold_is_exclusive() {
        assert!(!is_candidate_tag("abcdefghijkl"));
        assert!(is_candidate_tag("abcdefghijklm"));
        assert!(!is_candidate_tag("latest"));
    }
}
