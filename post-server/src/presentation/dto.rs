use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::validation::{ImageInput, PostInput, TextInput};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

impl AuthResponse {
    pub fn bearer(access_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            expires_in,
            token_type: "Bearer".to_string(),
        }
    }
}

// ======================= POSTS =======================

/// JSON variant of the create/update payload. Fields stay untyped so a wrong
/// type surfaces as a field error rather than a body rejection; any non-null
/// `image` is a scalar, never a file.
#[derive(Debug, Default, Deserialize)]
pub struct PostJsonRequest {
    #[serde(default)]
    pub title: Option<Value>,
    #[serde(default)]
    pub description: Option<Value>,
    #[serde(default)]
    pub image: Option<Value>,
}

impl From<PostJsonRequest> for PostInput {
    fn from(req: PostJsonRequest) -> Self {
        let image = req.image.and_then(|value| match value {
            Value::Null => None,
            Value::String(text) => Some(ImageInput::Text(text)),
            other => Some(ImageInput::Text(other.to_string())),
        });
        PostInput {
            title: req.title.and_then(text_input),
            description: req.description.and_then(text_input),
            image,
        }
    }
}

fn text_input(value: Value) -> Option<TextInput> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(TextInput::Text(text)),
        _ => Some(TextInput::NotString),
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}
