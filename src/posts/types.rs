use serde::{Deserialize, Serialize};

use super::models::PostModel;

pub const POSTS_PER_PAGE: i64 = 10;

/// Request payload for creating a post; the author comes from the access token
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
}

/// Response listing posts along with how many were returned
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PostsResponse {
    pub posts: Vec<PostModel>,
    pub count: usize,
}

impl From<Vec<PostModel>> for PostsResponse {
    fn from(posts: Vec<PostModel>) -> Self {
        Self {
            count: posts.len(),
            posts,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PostCountResponse {
    pub count: i64,
}
