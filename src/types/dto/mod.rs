// Request and response bodies for the HTTP API
pub mod admin;
pub mod auth;
pub mod casting;
pub mod common;
pub mod tenant;
