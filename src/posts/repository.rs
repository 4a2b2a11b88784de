use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::{NewPost, PostModel};
use crate::shared::AppError;

/// Trait for post repository operations. Listings are ordered by id.
#[async_trait]
pub trait PostRepository {
    async fn create_post(&self, post: NewPost) -> Result<PostModel, AppError>;
    async fn list_posts(&self) -> Result<Vec<PostModel>, AppError>;
    async fn list_posts_range(&self, offset: i64, limit: i64) -> Result<Vec<PostModel>, AppError>;
    async fn count_posts(&self) -> Result<i64, AppError>;
}

/// In-memory implementation of PostRepository for development and testing
pub struct InMemoryPostRepository {
    posts: Mutex<Vec<PostModel>>,
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            posts: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<PostModel>>, AppError> {
        self.posts
            .lock()
            .map_err(|_| AppError::DatabaseError("post store poisoned".to_string()))
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    #[instrument(skip(self, post))]
    async fn create_post(&self, post: NewPost) -> Result<PostModel, AppError> {
        let mut posts = self.lock()?;
        let id = posts.last().map(|p| p.id + 1).unwrap_or(1);
        let model = post.into_model(id);
        posts.push(model.clone());

        debug!(post_id = id, author = %model.author, "Post created in memory");
        Ok(model)
    }

    #[instrument(skip(self))]
    async fn list_posts(&self) -> Result<Vec<PostModel>, AppError> {
        Ok(self.lock()?.clone())
    }

    #[instrument(skip(self))]
    async fn list_posts_range(&self, offset: i64, limit: i64) -> Result<Vec<PostModel>, AppError> {
        let posts = self.lock()?;
        Ok(posts
            .iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    #[instrument(skip(self))]
    async fn count_posts(&self) -> Result<i64, AppError> {
        Ok(self.lock()?.len() as i64)
    }
}

/// PostgreSQL implementation of post repository
pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    #[instrument(skip(self, post))]
    async fn create_post(&self, post: NewPost) -> Result<PostModel, AppError> {
        debug!(author = %post.author, "Creating post in database");

        sqlx::query_as::<_, PostModel>(
            "INSERT INTO posts (title, content, author, created_at) VALUES ($1, $2, $3, $4) \
             RETURNING id, title, content, author, created_at",
        )
        .bind(&post.title)
        .bind(&post.content)
        .bind(&post.author)
        .bind(post.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_error) if db_error.is_foreign_key_violation() => {
                warn!(author = %post.author, "Post author does not exist");
                AppError::Unauthorized("Unknown author".to_string())
            }
            _ => {
                warn!(error = %e, "Failed to create post in database");
                AppError::DatabaseError(e.to_string())
            }
        })
    }

    #[instrument(skip(self))]
    async fn list_posts(&self) -> Result<Vec<PostModel>, AppError> {
        sqlx::query_as::<_, PostModel>(
            "SELECT id, title, content, author, created_at FROM posts ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to list posts");
            AppError::DatabaseError(e.to_string())
        })
    }

    #[instrument(skip(self))]
    async fn list_posts_range(&self, offset: i64, limit: i64) -> Result<Vec<PostModel>, AppError> {
        sqlx::query_as::<_, PostModel>(
            "SELECT id, title, content, author, created_at FROM posts ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, offset, limit, "Failed to list posts page");
            AppError::DatabaseError(e.to_string())
        })
    }

    #[instrument(skip(self))]
    async fn count_posts(&self) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to count posts");
                AppError::DatabaseError(e.to_string())
            })
    }
}
