// Public API - what other modules can use
pub use handlers::{count_posts, create_post, list_posts, list_posts_page};
pub use service::PostService;
pub use types::{CreatePostRequest, PostCountResponse, PostsResponse, POSTS_PER_PAGE};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
mod service;
mod types;
