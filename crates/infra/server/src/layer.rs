//! Session gate middleware.

use axum::body::Body;
use axum::response::{AppendHeaders, IntoResponse, Redirect};
use http::header::{COOKIE, SET_COOKIE};
use http::{Method, Request, Response};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::{debug, warn};
use weekboard_core::BoardError;
use weekboard_session::{
    key_login_target, login_redirect, query_param, session_cookie, session_token, CookieOptions,
    SessionSigner, LOGIN_PATH,
};

use crate::error::ApiError;

/// Layer that puts the dashboard behind the session cookie.
#[derive(Clone)]
pub struct SessionLayer {
    signer: Option<SessionSigner>,
    cookie: CookieOptions,
}

impl SessionLayer {
    /// Creates a gate; without a signer every request passes.
    pub fn new(signer: Option<SessionSigner>, cookie: CookieOptions) -> Self {
        Self { signer, cookie }
    }
}

impl<S> Layer<S> for SessionLayer {
    type Service = SessionMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SessionMiddleware {
            inner,
            signer: self.signer.clone(),
            cookie: self.cookie,
        }
    }
}

/// Middleware service that checks the `?key=` parameter and the session cookie.
#[derive(Clone)]
pub struct SessionMiddleware<S> {
    inner: S,
    signer: Option<SessionSigner>,
    cookie: CookieOptions,
}

/// What the gate decided for one request.
#[derive(Debug, PartialEq, Eq)]
enum GateDecision {
    Pass,
    /// Valid key: set the cookie and redirect to the clean URL.
    KeyLogin { target: String },
    LoginRedirect { target: String },
    Unauthorized,
}

impl<S> Service<Request<Body>> for SessionMiddleware<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let decision = decide(&req, self.signer.as_ref());
        let token = self.signer.as_ref().map(|s| s.token().to_string());
        let cookie = self.cookie;
        let mut inner = self.inner.clone();

        Box::pin(async move {
            match decision {
                GateDecision::Pass => inner.call(req).await,
                GateDecision::KeyLogin { target } => {
                    let token = token.unwrap_or_default();
                    Ok((
                        AppendHeaders([(SET_COOKIE, session_cookie(&token, cookie))]),
                        Redirect::temporary(&target),
                    )
                        .into_response())
                }
                GateDecision::LoginRedirect { target } => {
                    Ok(Redirect::temporary(&target).into_response())
                }
                GateDecision::Unauthorized => Ok(ApiError(BoardError::Unauthorized).into_response()),
            }
        })
    }
}

fn decide(req: &Request<Body>, signer: Option<&SessionSigner>) -> GateDecision {
    let path = req.uri().path();
    let query = req.uri().query();

    if path == LOGIN_PATH {
        return GateDecision::Pass;
    }

    // Collector writes carry their own bearer secret.
    if req.method() == Method::POST && path.starts_with("/api/") {
        return GateDecision::Pass;
    }

    let Some(signer) = signer else {
        warn!(path, "DASHBOARD_SECRET not set, allowing all requests");
        return GateDecision::Pass;
    };

    if let Some(key) = query_param(query, "key").filter(|k| !k.is_empty()) {
        if signer.check_password(&key) {
            debug!(path, "key login");
            return GateDecision::KeyLogin {
                target: key_login_target(path, query),
            };
        }
        warn!(path, "invalid dashboard key");
        return GateDecision::LoginRedirect {
            target: login_redirect(path, query),
        };
    }

    let valid_cookie = req
        .headers()
        .get(COOKIE)
        .and_then(|h| h.to_str().ok())
        .and_then(session_token)
        .is_some_and(|token| signer.verify(token));
    if valid_cookie {
        return GateDecision::Pass;
    }

    if path.starts_with("/api/") {
        GateDecision::Unauthorized
    } else {
        GateDecision::LoginRedirect {
            target: login_redirect(path, query),
        }
    }
}
