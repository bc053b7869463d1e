use std::net::IpAddr;
use std::time::Duration;

use poem::Request;
use poem::http::header;

use crate::providers::SessionReader;
use crate::types::internal::auth::{Claims, GuardedSession, SessionLookup, session_cookie_name};

use super::{request_id::RequestId, request_source::RequestSource};

/// Request context that flows through all layers
///
/// Contains contextual information about the current request that is needed
/// for logging, auditing, and tracing across API, provider, and store layers.
/// Claims here only prove a session exists; role and tenant are reloaded before
/// any authorization decision.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    /// IP address of the client making the request
    pub ip_address: Option<IpAddr>,

    /// Unique identifier for this request (for tracing across layers)
    pub request_id: RequestId,

    /// Whether a valid session was presented
    pub authenticated: bool,

    /// Session claims if authenticated
    pub claims: Option<Claims>,

    /// Source of the request (API, CLI, or System)
    pub source: RequestSource,

    /// Actor who initiated the operation
    pub actor_id: String,
}

impl RequestContext {
    /// Unauthenticated API context; an established session is attached later
    pub fn for_api(ip_address: Option<IpAddr>) -> Self {
        Self {
            ip_address,
            request_id: RequestId::new(),
            authenticated: false,
            claims: None,
            source: RequestSource::API,
            actor_id: "anonymous".to_string(),
        }
    }

    /// Operator context for an admin command; never carries a session
    pub fn for_cli(command_name: &str) -> Self {
        Self {
            ip_address: None,
            request_id: RequestId::new(),
            authenticated: false,
            claims: None,
            source: RequestSource::CLI,
            actor_id: format!("cli:{}", command_name),
        }
    }

    /// Build the context for an API request
    ///
    /// Uses the session the route guard already established when present. Otherwise
    /// reads the presented token within `budget`; a timeout or read error leaves the
    /// context unauthenticated.
    pub async fn from_request(
        req: &Request,
        reader: &dyn SessionReader,
        budget: Duration,
        cookie_secure: bool,
    ) -> Self {
        let ip_address = Self::extract_ip_address(req);
        let ctx = Self::for_api(ip_address);

        match req.extensions().get::<GuardedSession>() {
            Some(GuardedSession::Authenticated(claims)) => return ctx.with_session(claims.clone()),
            Some(GuardedSession::Degraded) => return ctx,
            Some(GuardedSession::Anonymous) | None => {}
        }

        let Some(token) = session_token(req, cookie_secure) else {
            return ctx;
        };

        match tokio::time::timeout(budget, reader.read_session(&token)).await {
            Ok(Ok(SessionLookup::Valid(claims))) => ctx.with_session(claims),
            Ok(Ok(SessionLookup::LoggedOut(reason))) => {
                tracing::debug!("Presented session not accepted: {}", reason.as_str());
                ctx
            }
            Ok(Err(e)) => {
                tracing::error!("Session lookup failed: {}", e);
                ctx
            }
            Err(_) => {
                tracing::warn!("Session lookup exceeded {}ms", budget.as_millis());
                ctx
            }
        }
    }

    /// Extract IP address from request headers
    ///
    /// Checks X-Forwarded-For, X-Real-IP, and falls back to remote address.
    pub fn extract_ip_address(req: &Request) -> Option<IpAddr> {
        if let Some(forwarded) = req.header("X-Forwarded-For") {
            if let Some(ip) = forwarded.split(',').next() {
                return ip.trim().parse().ok();
            }
        }

        if let Some(real_ip) = req.header("X-Real-IP") {
            return real_ip.parse().ok();
        }

        req.remote_addr().as_socket_addr().map(|addr| addr.ip())
    }

    fn with_session(self, claims: Claims) -> Self {
        let sub = claims.sub.clone();
        self.with_auth(claims).with_actor_id(sub)
    }

    /// Set the ip_address
    pub fn with_ip_address(mut self, ip_address: IpAddr) -> Self {
        self.ip_address = Some(ip_address);
        self
    }

    /// Set authentication state with claims
    pub fn with_auth(mut self, claims: Claims) -> Self {
        self.authenticated = true;
        self.claims = Some(claims);
        self
    }

    /// Set the actor_id
    pub fn with_actor_id(mut self, actor_id: impl Into<String>) -> Self {
        self.actor_id = actor_id.into();
        self
    }

    pub fn jwt_id(&self) -> Option<String> {
        self.claims.as_ref().map(|c| c.jti.clone())
    }
}

/// Session token from the session cookie, or an `Authorization: Bearer` header
///
/// Reads the request's cookie jar, so the route must sit behind `CookieJarManager`.
pub fn session_token(req: &Request, cookie_secure: bool) -> Option<String> {
    let from_cookie = req
        .cookie()
        .get(session_cookie_name(cookie_secure))
        .map(|cookie| cookie.value_str().trim().to_string())
        .filter(|value| !value.is_empty());

    from_cookie.or_else(|| {
        req.header(header::AUTHORIZATION)
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
    })
}
