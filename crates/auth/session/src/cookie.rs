//! Session cookie header helpers.

/// Name of the session cookie.
pub const SESSION_COOKIE_NAME: &str = "dash_session";

/// Cookie lifetime: 30 days.
pub const SESSION_MAX_AGE_SECS: u64 = 30 * 24 * 60 * 60;

/// Attributes of the issued session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookieOptions {
    /// Adds `Secure`; on in production.
    pub secure: bool,
    pub max_age_secs: u64,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            secure: false,
            max_age_secs: SESSION_MAX_AGE_SECS,
        }
    }
}

impl CookieOptions {
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }
}

/// A `Set-Cookie` header value carrying the session token.
pub fn session_cookie(token: &str, options: CookieOptions) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={token}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        options.max_age_secs
    );
    if options.secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Finds a cookie value in a `Cookie` request header.
pub fn find_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .map(str::trim)
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// The session token from a `Cookie` request header.
pub fn session_token(header: &str) -> Option<&str> {
    find_cookie(header, SESSION_COOKIE_NAME).filter(|v| !v.is_empty())
}
