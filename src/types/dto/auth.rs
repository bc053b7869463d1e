use poem_openapi::{ApiResponse, Object, payload::Json};
use serde::{Deserialize, Serialize};

/// Request model for sign-up
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct SignUpRequest {
    pub email: String,

    /// At least 8 characters
    pub password: String,
}

/// Request model for sign-in
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Newly created identity
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct SignUpResponse {
    pub user_id: String,
    pub email: String,
}

/// Issued session. The token is also set as an HttpOnly cookie.
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct SignInResponse {
    pub user_id: String,
    pub email: String,
    pub role: String,

    /// Session token for clients that send `Authorization: Bearer`
    pub token: String,

    /// Expiry (Unix timestamp)
    pub expires_at: i64,
}

/// Current identity and tenant, read from the store on every call
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub user_id: String,
    pub email: String,
    pub role: String,

    /// STUDIO or TALENT, absent until a tenant exists
    pub tenant_kind: Option<String>,
    pub studio_id: Option<String>,
    pub profile_id: Option<String>,

    /// Expiry of the presented session (Unix timestamp)
    pub expires_at: i64,
}

#[derive(Object, Debug, Serialize, Deserialize)]
pub struct SignOutResponse {
    pub message: String,
}

/// Sign-in success with the session cookie
#[derive(ApiResponse)]
pub enum SignInApiResponse {
    #[oai(status = 200)]
    Ok(Json<SignInResponse>, #[oai(header = "Set-Cookie")] String),
}

/// Sign-out success with an expired session cookie
#[derive(ApiResponse)]
pub enum SignOutApiResponse {
    #[oai(status = 200)]
    Ok(Json<SignOutResponse>, #[oai(header = "Set-Cookie")] String),
}

#[derive(ApiResponse)]
pub enum SignUpApiResponse {
    #[oai(status = 201)]
    Created(Json<SignUpResponse>),
}
