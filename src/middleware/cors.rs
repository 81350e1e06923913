use axum::http::{HeaderName, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

const ALLOWED_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::OPTIONS,
];

/// Create CORS layer with configurable origins from settings
pub fn create_cors_layer(allowed_origins: Vec<String>) -> CorsLayer {
    let allowed_headers = vec![
        HeaderName::from_static("content-type"),
        HeaderName::from_static("x-requested-with"),
    ];

    if allowed_origins.is_empty() || allowed_origins.contains(&"*".to_string()) {
        // Development mode - mirror the request origin
        tracing::debug!("CORS: allowing all origins");
        CorsLayer::new()
            .allow_origin(AllowOrigin::mirror_request())
            .allow_methods(ALLOWED_METHODS)
            .allow_headers(allowed_headers)
    } else {
        let origins: Vec<_> = allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    tracing::warn!("CORS: invalid origin '{}': {}", origin, e);
                    None
                }
            })
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(ALLOWED_METHODS)
            .allow_headers(allowed_headers)
    }
}
