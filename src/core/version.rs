//! Build metadata of the verstamp tool itself, captured by `build.rs`

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// Build time from the build script, RFC 3339 in UTC
pub fn build_time() -> &'static str {
    BUILD_TIME
}

/// Short git hash captured by the build script
pub fn git_hash() -> &'static str {
    GIT_HASH
}

/// Text shown by `verstamp --version`
pub fn long_version() -> String {
    format!("{} ({} {})", PACKAGE_VERSION, GIT_HASH, BUILD_TIME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_version_includes_build_metadata() {
        let text = long_version();
        assert!(text.starts_with(env!("CARGO_PKG_VERSION")));
        assert!(text.contains(git_hash()));
        assert!(text.contains(build_time()));
    }

    #[test]
    fn test_build_metadata_is_well_formed() {
        let stamp = chrono::DateTime::parse_from_rfc3339(build_time());
        assert!(stamp.is_ok(), "build time {:?} is not RFC 3339", build_time());
        assert!(!git_hash().is_empty());
        assert!(!git_hash().contains(char::is_whitespace));
    }
}
