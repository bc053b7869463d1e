// Middleware layer - request gating ahead of the API
pub mod route_guard;

pub use route_guard::{RouteGuard, RouteGuardEndpoint};
