use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for the posts table.
/// Serialized as `{id, title, content, user, date}` with `date` in Unix seconds.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct PostModel {
    pub id: i64,
    pub title: String,
    pub content: String,
    #[serde(rename = "user")]
    pub author: String,
    #[serde(rename = "date", with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
}

/// A post that has not been assigned an id yet
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

impl NewPost {
    pub fn new(title: String, content: String, author: String) -> Self {
        Self {
            title,
            content,
            author,
            created_at: Utc::now(),
        }
    }

    pub fn into_model(self, id: i64) -> PostModel {
        PostModel {
            id,
            title: self.title,
            content: self.content,
            author: self.author,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let created_at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let post = NewPost {
            title: "Hello".to_string(),
            content: "First post".to_string(),
            author: "alice".to_string(),
            created_at,
        }
        .into_model(7);

        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["title"], "Hello");
        assert_eq!(json["content"], "First post");
        assert_eq!(json["user"], "alice");
        assert_eq!(json["date"], 1_700_000_000);
        assert!(json.get("author").is_none());
    }
}
