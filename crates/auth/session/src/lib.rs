//! # Weekboard Session
//!
//! Password login for the dashboard. A single shared secret gates every
//! page; logging in with it issues a cookie holding an HMAC of a fixed
//! message under that secret, so the server keeps no session state.
//!
//! ## Example
//!
//! ```rust,ignore
//! use weekboard_session::{session_cookie, CookieOptions, SessionSigner};
//!
//! let signer = SessionSigner::new(secret)?;
//! let token = signer.login(&password)?;
//! let header = session_cookie(token, CookieOptions::default().secure(true));
//! ```

mod cookie;
mod error;
mod redirect;
mod signer;

pub use cookie::{
    find_cookie, session_cookie, session_token, CookieOptions, SESSION_COOKIE_NAME,
    SESSION_MAX_AGE_SECS,
};
pub use error::{SessionError, SessionResult};
pub use redirect::{
    has_tv_flag, key_login_target, login_redirect, query_param, safe_redirect, LOGIN_PATH,
};
pub use signer::{constant_time_compare, SessionSigner, SESSION_MESSAGE};
