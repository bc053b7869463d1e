use std::sync::Arc;

use chrono::Utc;
use poem::http::StatusCode;
use poem::web::Redirect;
use poem::{Endpoint, IntoResponse, Middleware, Request, Response, Result};
use serde_json::json;

use crate::app_data::AppData;
use crate::audit::AuditLogger;
use crate::config::{GateSettings, GuardFailurePolicy};
use crate::providers::SessionReader;
use crate::types::internal::auth::{GuardedSession, SessionLookup};
use crate::types::internal::context::RequestContext;
use crate::types::internal::context::request_context::session_token;

/// Prefixes that are always served without a session check
const STATIC_PREFIXES: &[&str] = &["/static/", "/swagger/"];
const STATIC_PATHS: &[&str] = &["/swagger", "/favicon.ico"];
/// API routes a signed-out client must reach; configured public paths add to these
pub const API_PUBLIC_PATHS: &[&str] = &["/api/health", "/api/auth/sign-in", "/api/auth/sign-up"];

/// Route guard middleware
///
/// Every request outside the public and static paths must present a valid session.
/// The session lookup is bounded by `guard_timeout`; what happens when it runs out is
/// decided by the configured [`GuardFailurePolicy`].
#[derive(Clone)]
pub struct RouteGuard {
    reader: Arc<dyn SessionReader>,
    audit_logger: Arc<AuditLogger>,
    settings: Arc<GateSettings>,
}

impl RouteGuard {
    pub fn new(reader: Arc<dyn SessionReader>, audit_logger: Arc<AuditLogger>, settings: Arc<GateSettings>) -> Self {
        Self {
            reader,
            audit_logger,
            settings,
        }
    }

    /// Guard backed by the application's token provider and settings
    pub fn from_app_data(app_data: &AppData) -> Self {
        Self::new(
            app_data.token_provider.clone(),
            app_data.audit_logger.clone(),
            app_data.settings.clone(),
        )
    }
}

impl<E: Endpoint> Middleware<E> for RouteGuard {
    type Output = RouteGuardEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        RouteGuardEndpoint {
            inner: ep,
            guard: self.clone(),
        }
    }
}

pub struct RouteGuardEndpoint<E> {
    inner: E,
    guard: RouteGuard,
}

/// Why the guard turned a request away
enum Rejection {
    Unauthenticated,
    AuthTimeout,
}

impl Rejection {
    fn code(&self) -> &'static str {
        match self {
            Rejection::Unauthenticated => "unauthenticated",
            Rejection::AuthTimeout => "auth_timeout",
        }
    }
}

impl<E: Endpoint> RouteGuardEndpoint<E> {
    fn is_public(&self, path: &str) -> bool {
        let settings = &self.guard.settings;
        STATIC_PATHS.contains(&path)
            || API_PUBLIC_PATHS.contains(&path)
            || STATIC_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
            || path == settings.sign_in_path
            || path == settings.sign_up_path
            || settings.public_paths.iter().any(|p| p == path)
    }

    async fn forward(&self, mut req: Request, session: GuardedSession) -> Result<Response> {
        req.extensions_mut().insert(session);
        self.inner.call(req).await.map(IntoResponse::into_response)
    }

    /// Redirect browsers to sign-in, answer API clients with a JSON 401
    fn reject(&self, path: &str, callback: &str, rejection: Rejection) -> Response {
        if path.starts_with("/api/") {
            let message = match rejection {
                Rejection::Unauthenticated => "Authentication required",
                Rejection::AuthTimeout => "Session check timed out, please sign in again",
            };
            let body = json!({
                "error": rejection.code(),
                "message": message,
                "status_code": 401,
                "callback_url": callback,
            });
            return Response::builder()
                .status(StatusCode::UNAUTHORIZED)
                .content_type("application/json")
                .body(body.to_string());
        }

        let encoded: String = url::form_urlencoded::byte_serialize(callback.as_bytes()).collect();
        let mut location = format!("{}?callbackUrl={}", self.guard.settings.sign_in_path, encoded);
        if let Rejection::AuthTimeout = rejection {
            location.push_str("&reason=auth_timeout");
        }
        Redirect::temporary(location).into_response()
    }
}

/// Callback kept on this site: `//host/x` and `/\host/x` collapse to `/host/x`
fn same_origin_callback(path_and_query: &str) -> String {
    format!("/{}", path_and_query.trim_start_matches(['/', '\\']))
}

impl<E: Endpoint> Endpoint for RouteGuardEndpoint<E> {
    type Output = Response;

    async fn call(&self, req: Request) -> Result<Self::Output> {
        let path = req.uri().path().to_string();

        if self.is_public(&path) {
            return self.forward(req, GuardedSession::Anonymous).await;
        }

        let callback = same_origin_callback(
            req.uri()
                .path_and_query()
                .map(|pq| pq.as_str())
                .unwrap_or(path.as_str()),
        );

        let settings = &self.guard.settings;
        let Some(token) = session_token(&req, settings.cookie_secure) else {
            tracing::debug!("No session presented for {}", path);
            return Ok(self.reject(&path, &callback, Rejection::Unauthenticated));
        };

        let lookup = tokio::time::timeout(settings.guard_timeout, self.guard.reader.read_session(&token)).await;

        let failure = match lookup {
            Ok(Ok(SessionLookup::Valid(claims))) => {
                return self.forward(req, GuardedSession::Authenticated(claims)).await;
            }
            Ok(Ok(SessionLookup::LoggedOut(reason))) => {
                tracing::debug!("Session for {} rejected: {}", path, reason.as_str());
                return Ok(self.reject(&path, &callback, Rejection::Unauthenticated));
            }
            Ok(Err(e)) => format!("session lookup failed: {}", e),
            Err(_) => format!("session lookup exceeded {}ms", settings.guard_timeout.as_millis()),
        };

        let now = Utc::now();
        match &settings.failure_policy {
            GuardFailurePolicy::FailOpen { until } if settings.failure_policy.is_fail_open_at(now) => {
                tracing::warn!("Forwarding {} without identity under fail-open override: {}", path, failure);

                let ctx = RequestContext::for_api(RequestContext::extract_ip_address(&req));
                if let Err(audit_err) = self
                    .guard
                    .audit_logger
                    .log_guard_fail_open(
                        &ctx,
                        &path,
                        settings.guard_timeout.as_millis() as u64,
                        &until.to_rfc3339(),
                    )
                    .await
                {
                    tracing::error!("Failed to log fail-open forward: {:?}", audit_err);
                }

                self.forward(req, GuardedSession::Degraded).await
            }
            _ => {
                tracing::warn!("Failing closed for {}: {}", path, failure);
                Ok(self.reject(&path, &callback, Rejection::AuthTimeout))
            }
        }
    }
}
