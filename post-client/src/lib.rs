mod error;

use std::path::Path;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use error::ClientError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
}

impl std::fmt::Display for Post {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.id, self.title, self.description)?;
        if let Some(url) = &self.image_url {
            write!(f, " ({url})")?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    access_token: String,
}

/// HTTP client for the post API.
#[derive(Clone)]
pub struct PostClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl PostClient {
    pub fn new(endpoint: &str) -> Result<Self, ClientError> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: endpoint.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send<T: for<'de> Deserialize<'de>>(req: RequestBuilder) -> Result<T, ClientError> {
        let resp = req.send().await?;
        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            Err(ClientError::from_http_response(resp).await)
        }
    }

    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<String, ClientError> {
        let req = self.client.post(self.url("/auth/register")).json(&serde_json::json!({
            "name": name,
            "email": email,
            "password": password,
        }));
        let auth: AuthResponse = Self::send(req).await?;
        self.token = Some(auth.access_token.clone());
        Ok(auth.access_token)
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<String, ClientError> {
        let req = self.client.post(self.url("/auth/login")).json(&serde_json::json!({
            "email": email,
            "password": password,
        }));
        let auth: AuthResponse = Self::send(req).await?;
        self.token = Some(auth.access_token.clone());
        Ok(auth.access_token)
    }

    pub async fn list_posts(&self) -> Result<Vec<Post>, ClientError> {
        Self::send(self.client.get(self.url("/posts"))).await
    }

    pub async fn get_post(&self, id: i64) -> Result<Post, ClientError> {
        Self::send(self.client.get(self.url(&format!("/posts/{id}")))).await
    }

    pub async fn create_post(
        &self,
        title: &str,
        description: &str,
        image: Option<&Path>,
    ) -> Result<Post, ClientError> {
        let form = post_form(title, description, image).await?;
        let req = self.client.post(self.url("/posts")).multipart(form);
        Self::send(self.authorized(req)).await
    }

    pub async fn update_post(
        &self,
        id: i64,
        title: &str,
        description: &str,
        image: Option<&Path>,
    ) -> Result<Post, ClientError> {
        let form = post_form(title, description, image).await?;
        let req = self
            .client
            .patch(self.url(&format!("/posts/{id}")))
            .multipart(form);
        Self::send(self.authorized(req)).await
    }

    pub async fn delete_post(&self, id: i64) -> Result<(), ClientError> {
        let req = self.client.delete(self.url(&format!("/posts/{id}")));
        let resp = self.authorized(req).send().await?;
        if resp.status().is_success() {
            debug!(post_id = id, "post deleted");
            Ok(())
        } else {
            Err(ClientError::from_http_response(resp).await)
        }
    }
}

async fn post_form(
    title: &str,
    description: &str,
    image: Option<&Path>,
) -> Result<Form, ClientError> {
    let mut form = Form::new()
        .text("title", title.to_string())
        .text("description", description.to_string());

    if let Some(path) = image {
        let bytes = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        form = form.part("image", Part::bytes(bytes).file_name(filename));
    }

    Ok(form)
}
