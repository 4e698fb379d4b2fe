use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields of a post that does not exist yet; the repository assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
}

/// Changes applied by an update. `image_url: None` keeps the stored image.
#[derive(Debug, Clone)]
pub struct PostChanges {
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
}

/// Public JSON projection of a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostView {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
}

impl From<&Post> for PostView {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            description: post.description.clone(),
            image_url: post.image_url.clone(),
        }
    }
}

impl From<Post> for PostView {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            description: post.description,
            image_url: post.image_url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deleted {
    pub message: String,
}

impl Deleted {
    pub fn new() -> Self {
        Self {
            message: "deleted".to_string(),
        }
    }
}

impl Default for Deleted {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample(image_url: Option<&str>) -> Post {
        Post {
            id: 7,
            title: "Some title".into(),
            description: "description".into(),
            image_url: image_url.map(String::from),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn view_exposes_only_public_fields() {
        let view = PostView::from(&sample(Some("images/abc.jpg")));
        let value = serde_json::to_value(&view).unwrap();

        assert_eq!(
            value,
            json!({
                "id": 7,
                "title": "Some title",
                "description": "description",
                "image_url": "images/abc.jpg",
            })
        );
    }

    #[test]
    fn view_renders_missing_image_as_null() {
        let value = serde_json::to_value(PostView::from(sample(None))).unwrap();
        assert!(value["image_url"].is_null());
    }

    #[test]
    fn deleted_marker_shape() {
        let value = serde_json::to_value(Deleted::new()).unwrap();
        assert_eq!(value, json!({ "message": "deleted" }));
    }
}
