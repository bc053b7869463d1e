use poem_openapi::Object;

/// Response model for health check endpoint
#[derive(Object, Debug)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,

    /// Timestamp of the health check (ISO 8601 format)
    pub timestamp: String,
}

/// Confirmation of a completed delete
#[derive(Object, Debug)]
pub struct DeletedResponse {
    pub id: String,
    pub message: String,
}
