use std::sync::Arc;

use crate::data::post_repository::PostRepository;
use crate::data::storage::Storage;
use crate::domain::error::DomainError;
use crate::domain::post::{Deleted, NewPost, PostChanges, PostView};
use crate::domain::upload::{IMAGES_DIR, UploadedFile};
use crate::domain::user::Principal;
use crate::domain::validation::{PostInput, validate_post};
use tracing::{info, instrument};

pub struct PostService<R: PostRepository + 'static, S: Storage + 'static> {
    repo: Arc<R>,
    storage: Arc<S>,
    max_upload_bytes: usize,
}

impl<R, S> Clone for PostService<R, S>
where
    R: PostRepository + 'static,
    S: Storage + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            storage: Arc::clone(&self.storage),
            max_upload_bytes: self.max_upload_bytes,
        }
    }
}

impl<R, S> PostService<R, S>
where
    R: PostRepository + 'static,
    S: Storage + 'static,
{
    pub fn new(repo: Arc<R>, storage: Arc<S>, max_upload_bytes: usize) -> Self {
        Self {
            repo,
            storage,
            max_upload_bytes,
        }
    }

    pub async fn list(&self) -> Result<Vec<PostView>, DomainError> {
        let posts = self.repo.find_all().await?;
        Ok(posts.into_iter().map(PostView::from).collect())
    }

    pub async fn get(&self, id: i64) -> Result<PostView, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .map(PostView::from)
            .ok_or(DomainError::PostNotFound(id))
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: PostInput) -> Result<PostView, DomainError> {
        let post = validate_post(input, self.max_upload_bytes)?;

        let image_url = match &post.image {
            Some(image) => Some(self.store_image(image).await?),
            None => None,
        };

        let created = self
            .repo
            .create(NewPost {
                title: post.title,
                description: post.description,
                image_url,
            })
            .await?;

        Ok(PostView::from(created))
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i64, input: PostInput) -> Result<PostView, DomainError> {
        let post = validate_post(input, self.max_upload_bytes)?;

        if self.repo.find_by_id(id).await?.is_none() {
            return Err(DomainError::PostNotFound(id));
        }

        let image_url = match &post.image {
            Some(image) => Some(self.store_image(image).await?),
            None => None,
        };

        self.repo
            .update(
                id,
                PostChanges {
                    title: post.title,
                    description: post.description,
                    image_url,
                },
            )
            .await?
            .map(PostView::from)
            .ok_or(DomainError::PostNotFound(id))
    }

    #[instrument(skip(self, principal))]
    pub async fn delete(
        &self,
        id: i64,
        principal: Option<&Principal>,
    ) -> Result<Deleted, DomainError> {
        let principal = principal.ok_or(DomainError::Unauthorized)?;

        if !self.repo.delete(id).await? {
            return Err(DomainError::PostNotFound(id));
        }

        info!(post_id = id, user_id = %principal.id, "post removed by user");
        Ok(Deleted::new())
    }

    /// The file must be persisted before any record references it.
    async fn store_image(&self, image: &UploadedFile) -> Result<String, DomainError> {
        let path = self.storage.put(IMAGES_DIR, image).await?;
        info!(path = %path, bytes = image.len(), "image stored");
        Ok(path)
    }
}
