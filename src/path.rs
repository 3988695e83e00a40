//! Request path parsing and canonical path cleaning
//!
//! The gateway uses a fixed two-level URL convention:
//! `/{bucket}/{key/with/slashes}`. Parsing never fails; malformed
//! input degrades to empty outputs.

/// Split a request path into (bucket name, object key).
///
/// - Paths that do not start with `/` yield `("", "")`.
/// - `/bucket` yields `("bucket", "")`.
/// - `/bucket/a/b/c` yields `("bucket", "a/b/c")` with internal
///   separators preserved verbatim.
///
/// No normalization happens here; `..` and redundant separators are
/// resolved later when matching against listed keys.
pub fn split_target(path: &str) -> (String, String) {
    if !path.starts_with('/') {
        return (String::new(), String::new());
    }

    let parts: Vec<&str> = path.split('/').collect();
    let bucket = if parts.len() >= 2 {
        parts[1].to_string()
    } else {
        String::new()
    };
    let key = if parts.len() > 2 {
        parts[2..].join("/")
    } else {
        String::new()
    };

    (bucket, key)
}

/// Canonical path cleaning for key comparison.
///
/// Collapses repeated separators, drops `.` segments, and resolves
/// `..` against earlier segments. An empty path cleans to `.`; rooted
/// paths stay rooted and `..` cannot escape the root.
pub fn clean(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let rooted = path.starts_with('/');
    let mut out: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if out.last().is_some_and(|s| *s != "..") {
                    out.pop();
                } else if !rooted {
                    out.push("..");
                }
            }
            _ => out.push(segment),
        }
    }

    let joined = out.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}
