use axum::{Router, http};
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::adapters::{self, http::app_state::AppState, http::middleware::AUTH_TOKEN_HEADER};

pub fn create_app(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(app_state.config.cors_origin.clone())
        .allow_methods([http::Method::GET, http::Method::POST])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .expose_headers([AUTH_TOKEN_HEADER]);

    Router::new()
        .nest("/api", adapters::http::routes::router())
        .with_state(app_state)
        .layer(cors)
        .layer(SetResponseHeaderLayer::if_not_present(
            http::header::X_CONTENT_TYPE_OPTIONS,
            http::HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            http::header::X_FRAME_OPTIONS,
            http::HeaderValue::from_static("DENY"),
        ))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &http::Request<_>| {
                let request_id = Uuid::new_v4();
                tracing::info_span!(
                    "http-request",
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                    request_id = %request_id
                )
            }),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{TestAppStateBuilder, create_test_user};
    use axum::http::StatusCode;
    use axum_test::TestServer;

    #[tokio::test]
    async fn routes_are_mounted_under_api_with_security_headers() {
        let app_state = TestAppStateBuilder::new()
            .with_user(create_test_user(|_| {}))
            .build();
        let server = TestServer::new(create_app(app_state)).unwrap();

        let response = server.get("/api/context").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(response.header("x-content-type-options"), "nosniff");
        assert_eq!(response.header("x-frame-options"), "DENY");

        server.get("/context").await.assert_status(StatusCode::NOT_FOUND);
    }
}
