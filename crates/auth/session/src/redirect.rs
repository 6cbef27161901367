//! Post-login and gate redirect targets.

use url::form_urlencoded;

/// Path of the login page.
pub const LOGIN_PATH: &str = "/login";

/// Restricts a post-login redirect to a local path.
///
/// Anything that is not an absolute path on this host (including
/// protocol-relative `//host` and `/\host`) becomes `/`.
pub fn safe_redirect(target: &str) -> &str {
    let local = target.starts_with('/')
        && !target.starts_with("//")
        && !target.starts_with("/\\");
    if local { target } else { "/" }
}

/// The login URL remembering where the visitor wanted to go.
///
/// `path` is the request path and `query` its raw query string without `?`.
pub fn login_redirect(path: &str, query: Option<&str>) -> String {
    let wanted = match query {
        Some(q) if !q.is_empty() => format!("{path}?{q}"),
        _ => path.to_string(),
    };
    if wanted == "/" {
        return LOGIN_PATH.to_string();
    }
    let encoded: String = form_urlencoded::byte_serialize(wanted.as_bytes()).collect();
    format!("{LOGIN_PATH}?redirect={encoded}")
}

/// Returns true when the raw query carries the `tv` flag (`?tv`, `?tv=1`).
pub fn has_tv_flag(query: Option<&str>) -> bool {
    query
        .unwrap_or_default()
        .split('&')
        .any(|pair| pair == "tv" || pair.starts_with("tv="))
}

/// Where a valid `?key=` visit lands: the same path, keeping only `?tv`.
pub fn key_login_target(path: &str, query: Option<&str>) -> String {
    if has_tv_flag(query) {
        format!("{path}?tv")
    } else {
        path.to_string()
    }
}

/// Reads one parameter from a raw query string.
pub fn query_param(query: Option<&str>, name: &str) -> Option<String> {
    form_urlencoded::parse(query.unwrap_or_default().as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}
