use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::shared::AppState;
use crate::{auth, posts, token};

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Builds the application router with all routes and the trace layer
pub fn build_router(state: AppState) -> Router {
    let require_bearer = middleware::from_fn_with_state(state.clone(), token::jwt_auth);

    Router::new()
        .route("/health", get(health))
        // Auth
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/token", post(token::refresh_token))
        .route("/token/logout", post(token::logout))
        // Posts; only creation needs a bearer token
        .route(
            "/posts",
            get(posts::list_posts).merge(post(posts::create_post).route_layer(require_bearer)),
        )
        .route("/posts/amount", get(posts::count_posts))
        .route("/posts/:page", get(posts::list_posts_page))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_utils::AppStateBuilder;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt; // for `oneshot`

    #[tokio::test]
    async fn test_health() {
        let app = build_router(AppStateBuilder::new().build());

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_listing_posts_needs_no_token() {
        let app = build_router(AppStateBuilder::new().build());

        let response = app
            .oneshot(Request::builder().uri("/posts").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_creating_post_needs_token() {
        let app = build_router(AppStateBuilder::new().build());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/posts")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"title": "t", "content": "c"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
