use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    models::PostModel,
    service::PostService,
    types::{CreatePostRequest, PostCountResponse, PostsResponse},
};
use crate::extract::JsonBody;
use crate::shared::{AppError, AppState};
use crate::token::AuthenticatedUser;

fn post_service(state: &AppState) -> PostService {
    PostService::new(Arc::clone(&state.post_repository))
}

/// HTTP handler for creating a post
///
/// POST /posts (requires bearer access token)
#[instrument(name = "create_post", skip(state, user, request))]
pub async fn create_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    JsonBody(request): JsonBody<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostModel>), AppError> {
    let post = post_service(&state)
        .create_post(request, &user.username)
        .await?;

    info!(post_id = post.id, author = %user.username, "Post created successfully");

    Ok((StatusCode::CREATED, Json(post)))
}

/// GET /posts
#[instrument(name = "list_posts", skip(state))]
pub async fn list_posts(State(state): State<AppState>) -> Result<Json<PostsResponse>, AppError> {
    let posts = post_service(&state).list_posts().await?;
    Ok(Json(posts))
}

/// GET /posts/amount
#[instrument(name = "count_posts", skip(state))]
pub async fn count_posts(
    State(state): State<AppState>,
) -> Result<Json<PostCountResponse>, AppError> {
    let count = post_service(&state).count_posts().await?;
    Ok(Json(count))
}

/// HTTP handler for a page of posts
///
/// GET /posts/{page}
/// Pages are 1-indexed; 404 past the last page, 400 if not an integer
#[instrument(name = "list_posts_page", skip(state))]
pub async fn list_posts_page(
    State(state): State<AppState>,
    Path(page): Path<String>,
) -> Result<Json<PostsResponse>, AppError> {
    let page: i64 = page
        .parse()
        .map_err(|e: std::num::ParseIntError| AppError::bad_request("Invalid page", e.to_string()))?;

    let posts = post_service(&state).list_page(page).await?;
    Ok(Json(posts))
}
