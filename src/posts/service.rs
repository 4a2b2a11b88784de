use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::{
    models::{NewPost, PostModel},
    repository::PostRepository,
    types::{CreatePostRequest, PostCountResponse, PostsResponse, POSTS_PER_PAGE},
};
use crate::shared::AppError;

/// Service for handling post business logic
pub struct PostService {
    repository: Arc<dyn PostRepository + Send + Sync>,
}

/// Offset of the first post on a 1-indexed page, or None if the page
/// is not positive or starts past the last post
pub fn page_offset(page: i64, total: i64) -> Option<i64> {
    if page <= 0 {
        return None;
    }
    let first = page.checked_sub(1)?.checked_mul(POSTS_PER_PAGE)?;
    (first < total).then_some(first)
}

impl PostService {
    pub fn new(repository: Arc<dyn PostRepository + Send + Sync>) -> Self {
        Self { repository }
    }

    /// Creates a post authored by the authenticated user.
    /// Title and content are trimmed and must not be empty.
    #[instrument(skip(self, request))]
    pub async fn create_post(
        &self,
        request: CreatePostRequest,
        author: &str,
    ) -> Result<PostModel, AppError> {
        let title = request.title.trim();
        let content = request.content.trim();

        if title.is_empty() {
            return Err(AppError::bad_request("Invalid post", "Title must not be empty"));
        }
        if content.is_empty() {
            return Err(AppError::bad_request(
                "Invalid post",
                "Content must not be empty",
            ));
        }

        let post = self
            .repository
            .create_post(NewPost::new(
                title.to_string(),
                content.to_string(),
                author.to_string(),
            ))
            .await?;

        info!(post_id = post.id, author = %post.author, "Post created");
        Ok(post)
    }

    #[instrument(skip(self))]
    pub async fn list_posts(&self) -> Result<PostsResponse, AppError> {
        let posts = self.repository.list_posts().await?;
        debug!(post_count = posts.len(), "Posts listed");
        Ok(PostsResponse::from(posts))
    }

    /// Lists the posts on a 1-indexed page of `POSTS_PER_PAGE`
    #[instrument(skip(self))]
    pub async fn list_page(&self, page: i64) -> Result<PostsResponse, AppError> {
        if page <= 0 {
            return Err(AppError::NotFound(
                "Page must be an integer greater than zero".to_string(),
            ));
        }

        let total = self.repository.count_posts().await?;
        let offset = page_offset(page, total)
            .ok_or_else(|| AppError::NotFound(format!("Page {} does not exist", page)))?;

        let posts = self
            .repository
            .list_posts_range(offset, POSTS_PER_PAGE)
            .await?;

        debug!(page, total, post_count = posts.len(), "Posts page listed");
        Ok(PostsResponse::from(posts))
    }

    #[instrument(skip(self))]
    pub async fn count_posts(&self) -> Result<PostCountResponse, AppError> {
        let count = self.repository.count_posts().await?;
        Ok(PostCountResponse { count })
    }
}
