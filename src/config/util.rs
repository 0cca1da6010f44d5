//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Split a site URL into its origin and base path.
///
/// Uses the `url` crate for parsing, so ports, auth info, query strings
/// and fragments are handled. The origin has no trailing slash; the base
/// always starts and ends with `/`.
///
/// Returns `None` if the URL is invalid or has no host.
///
/// # Examples
/// ```ignore
/// split_site_url("https://example.github.io/my-project") -> Some(("https://example.github.io", "/my-project/"))
/// split_site_url("https://example.com:8080/")            -> Some(("https://example.com:8080", "/"))
/// split_site_url("invalid")                              -> None
/// ```
pub fn split_site_url(url_str: &str) -> Option<(String, String)> {
    let parsed = url::Url::parse(url_str).ok()?;
    let host = parsed.host_str()?;

    let origin = match parsed.port() {
        Some(port) => format!("{}://{host}:{port}", parsed.scheme()),
        None => format!("{}://{host}", parsed.scheme()),
    };

    let path = parsed.path().trim_matches('/');
    let base = if path.is_empty() {
        "/".to_string()
    } else {
        format!("/{path}/")
    };

    Some((origin, base))
}

/// Find config file by searching upward from current directory
///
/// Starts from cwd and walks up parent directories until finding `config_name`
/// Returns the absolute path to the config file if found
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let cwd = std::env::current_dir().ok()?;
    cwd.ancestors()
        .map(|dir| dir.join(config_name))
        .find(|candidate| candidate.exists())
}

/// Resolve a config path against the project root, expanding `~`.
pub fn resolve_path(path: &Path, root: &Path) -> PathBuf {
    let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
    let path = PathBuf::from(expanded);
    if path.is_relative() {
        root.join(path)
    } else {
        path
    }
}

// ============================================================================
// tests
// ============================================================================
