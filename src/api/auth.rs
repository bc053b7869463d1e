use std::sync::Arc;
use std::time::Duration;

use poem::Request;
use poem::web::cookie::{Cookie, SameSite};
use poem_openapi::{OpenApi, Tags, payload::Json};

use crate::app_data::AppData;
use crate::api::helpers;
use crate::coordinators::SessionCoordinator;
use crate::errors::{AccessError, AuthError};
use crate::types::dto::auth::{
    SessionResponse, SignInApiResponse, SignInRequest, SignInResponse, SignOutApiResponse, SignOutResponse,
    SignUpApiResponse, SignUpRequest, SignUpResponse,
};
use crate::types::internal::auth::session_cookie_name;

/// Authentication API endpoints
pub struct AuthApi {
    app_data: Arc<AppData>,
    session_coordinator: SessionCoordinator,
}

impl AuthApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            session_coordinator: SessionCoordinator::new(app_data.clone()),
            app_data,
        }
    }

    fn cookie_secure(&self) -> bool {
        self.app_data.settings.cookie_secure
    }
}

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Authentication endpoints
    Authentication,
}

/// Set-Cookie value carrying the session token
pub fn session_cookie(token: &str, secure: bool, max_age: Duration) -> String {
    let mut cookie = Cookie::new_with_str(session_cookie_name(secure), token);
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_secure(secure);
    cookie.set_path("/");
    cookie.set_max_age(max_age);
    cookie.to_string()
}

/// Set-Cookie value that removes the session cookie
pub fn cleared_session_cookie(secure: bool) -> String {
    session_cookie("", secure, Duration::ZERO)
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Create an identity with the USER role
    #[oai(path = "/sign-up", method = "post", tag = "AuthTags::Authentication")]
    async fn sign_up(&self, req: &Request, body: Json<SignUpRequest>) -> Result<SignUpApiResponse, AuthError> {
        let ctx = helpers::request_context(&self.app_data, req).await;

        let created = self
            .session_coordinator
            .sign_up(&ctx, &body.email, &body.password)
            .await?;

        Ok(SignUpApiResponse::Created(Json(SignUpResponse {
            user_id: created.id,
            email: created.email,
        })))
    }

    /// Sign in with email and password
    ///
    /// Sets the session cookie and also returns the token for bearer clients.
    #[oai(path = "/sign-in", method = "post", tag = "AuthTags::Authentication")]
    async fn sign_in(&self, req: &Request, body: Json<SignInRequest>) -> Result<SignInApiResponse, AuthError> {
        let ctx = helpers::request_context(&self.app_data, req).await;

        let session = self
            .session_coordinator
            .sign_in(&ctx, &body.email, &body.password)
            .await?
            .ok_or_else(AuthError::invalid_credentials)?;

        let cookie = session_cookie(
            &session.token,
            self.cookie_secure(),
            self.app_data.settings.session_max_age,
        );

        Ok(SignInApiResponse::Ok(
            Json(SignInResponse {
                user_id: session.claims.sub,
                email: session.claims.email,
                role: session.claims.role.to_string(),
                token: session.token,
                expires_at: session.claims.exp,
            }),
            cookie,
        ))
    }

    /// Revoke the current session and clear the cookie
    #[oai(path = "/sign-out", method = "post", tag = "AuthTags::Authentication")]
    async fn sign_out(&self, req: &Request) -> Result<SignOutApiResponse, AuthError> {
        let ctx = helpers::request_context(&self.app_data, req).await;

        self.session_coordinator.sign_out(&ctx).await?;

        Ok(SignOutApiResponse::Ok(
            Json(SignOutResponse {
                message: "Signed out".to_string(),
            }),
            cleared_session_cookie(self.cookie_secure()),
        ))
    }

    /// Current identity and tenant as stored now, not as embedded in the token
    #[oai(path = "/session", method = "get", tag = "AuthTags::Authentication")]
    async fn session(&self, req: &Request) -> Result<Json<SessionResponse>, AccessError> {
        let ctx = helpers::request_context(&self.app_data, req).await;

        let (actor, claims) = self.session_coordinator.current_session(&ctx).await?;

        Ok(Json(SessionResponse {
            user_id: actor.identity.id.clone(),
            email: actor.identity.email.clone(),
            role: actor.identity.role.to_string(),
            tenant_kind: actor.tenant.kind().map(|k| k.to_string()),
            studio_id: actor.tenant.studio_id().map(str::to_string),
            profile_id: actor.tenant.profile_id().map(str::to_string),
            expires_at: claims.exp,
        }))
    }
}
