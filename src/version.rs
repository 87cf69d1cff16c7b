mod build_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

/// Returns the main version identifier, e.g. `v0.3`.
pub(crate) fn identifier() -> String {
    let digits = build_info::PKG_VERSION.strip_suffix(".0")
        .unwrap_or(build_info::PKG_VERSION);

    format!("v{digits}")
}

/// Returns an RFC 2822 formatted date of the build time in UTC.
pub(crate) fn build_time_utc() -> &'static str {
    build_info::BUILT_TIME_UTC
}

/// Returns the commit hash this was built from, if it was built from a git
/// checkout at all.
pub(crate) fn git_commit_hash() -> Option<&'static str> {
    build_info::GIT_COMMIT_HASH_SHORT
}

/// Returns whether the git working directory was dirty when this was built.
pub(crate) fn git_was_dirty() -> bool {
    build_info::GIT_DIRTY == Some(true)
}

/// Returns a string containing all version-related information.
pub(crate) fn full() -> String {
    let commit = match git_commit_hash() {
        Some(hash) => format!(" ({hash}{})", if git_was_dirty() { ", dirty" } else { "" }),
        None => String::new(),
    };

    format!("{}{commit}, built {}", identifier(), build_time_utc())
}

/// Value of the `User-Agent` header for outgoing requests.
pub(crate) fn user_agent() -> String {
    format!("country-browser/{}", build_info::PKG_VERSION)
}
