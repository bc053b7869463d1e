use poem::Request;

use crate::app_data::AppData;
use crate::types::internal::context::RequestContext;

/// Build the RequestContext for an endpoint call
///
/// Reuses the session the route guard attached. Called without the guard (tests,
/// public paths) it reads the presented token itself within the guard budget.
pub async fn request_context(app_data: &AppData, req: &Request) -> RequestContext {
    RequestContext::from_request(
        req,
        app_data.token_provider.as_ref(),
        app_data.settings.guard_timeout,
        app_data.settings.cookie_secure,
    )
    .await
}
