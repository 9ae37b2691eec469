//! Namespace path helpers
//!
//! Paths inside the engine are absolute and slash-separated, with no
//! trailing slash except for the root itself. The trailing-slash form for
//! directories only appears in rendered change entries.

/// Normalize a user-supplied path: leading slash, no duplicate or
/// trailing slashes, `.` segments dropped
pub fn normalize(path: &str) -> String {
    let segments: Vec<&str> = path
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();
    format!("/{}", segments.join("/"))
}

/// True for the namespace root (`""` or `"/"`)
pub fn is_root(path: &str) -> bool {
    path.is_empty() || path == "/"
}

/// Join a child name onto a parent path; the result is normalized, so a
/// name of `.` yields the parent itself
pub fn join(parent: &str, name: &str) -> String {
    normalize(&format!("{}/{}", parent, name))
}

/// Path as rendered in a change list
pub fn display_path(path: &str, is_dir: bool) -> String {
    if is_dir && !path.ends_with('/') {
        format!("{}/", path)
    } else {
        path.to_string()
    }
}

/// Path relative to the namespace root, as used in endpoint URLs
pub fn relative(path: &str) -> &str {
    path.trim_start_matches('/')
}
