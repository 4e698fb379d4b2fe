#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use post_server::application::auth_service::AuthService;
use post_server::application::post_service::PostService;
use post_server::data::post_repository::PostRepository;
use post_server::data::storage::Storage;
use post_server::data::user_repository::UserRepository;
use post_server::domain::error::DomainError;
use post_server::domain::post::{NewPost, Post, PostChanges};
use post_server::domain::upload::UploadedFile;
use post_server::domain::user::User;
use post_server::infrastructure::security::JwtKeys;
use tokio::sync::Mutex;
use uuid::Uuid;

pub const MAX_UPLOAD: usize = 1024 * 1024;

#[derive(Default)]
struct PostTable {
    next_id: i64,
    rows: Vec<Post>,
}

#[derive(Default)]
pub struct InMemoryPostRepository {
    table: Mutex<PostTable>,
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, post: NewPost) -> Result<Post, DomainError> {
        let mut table = self.table.lock().await;
        table.next_id += 1;
        let now = Utc::now();
        let post = Post {
            id: table.next_id,
            title: post.title,
            description: post.description,
            image_url: post.image_url,
            created_at: now,
            updated_at: now,
        };
        table.rows.push(post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let table = self.table.lock().await;
        Ok(table.rows.iter().find(|p| p.id == id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.table.lock().await.rows.clone())
    }

    async fn update(&self, id: i64, changes: PostChanges) -> Result<Option<Post>, DomainError> {
        let mut table = self.table.lock().await;
        let Some(post) = table.rows.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        post.title = changes.title;
        post.description = changes.description;
        if let Some(url) = changes.image_url {
            post.image_url = Some(url);
        }
        post.updated_at = Utc::now();
        Ok(Some(post.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let mut table = self.table.lock().await;
        let before = table.rows.len();
        table.rows.retain(|p| p.id != id);
        Ok(table.rows.len() < before)
    }

    async fn count(&self) -> Result<i64, DomainError> {
        Ok(self.table.lock().await.rows.len() as i64)
    }
}

/// Records writes in memory, like a faked storage disk.
#[derive(Default)]
pub struct FakeStorage {
    files: Mutex<HashMap<String, Vec<u8>>>,
    writes: Mutex<usize>,
}

impl FakeStorage {
    pub async fn writes(&self) -> usize {
        *self.writes.lock().await
    }

    pub async fn read(&self, path: &str) -> Option<Vec<u8>> {
        self.files.lock().await.get(path).cloned()
    }
}

#[async_trait]
impl Storage for FakeStorage {
    async fn put(&self, directory: &str, file: &UploadedFile) -> Result<String, DomainError> {
        let path = format!("{}/{}", directory.trim_matches('/'), file.hash_name());
        self.files
            .lock()
            .await
            .insert(path.clone(), file.bytes.to_vec());
        *self.writes.lock().await += 1;
        Ok(path)
    }

    async fn exists(&self, path: &str) -> Result<bool, DomainError> {
        Ok(self.files.lock().await.contains_key(path))
    }
}

/// Storage whose every write fails.
#[derive(Default)]
pub struct BrokenStorage;

#[async_trait]
impl Storage for BrokenStorage {
    async fn put(&self, _directory: &str, _file: &UploadedFile) -> Result<String, DomainError> {
        Err(DomainError::Storage("disk full".into()))
    }

    async fn exists(&self, _path: &str) -> Result<bool, DomainError> {
        Ok(false)
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
    id_lookups: AtomicUsize,
}

impl InMemoryUserRepository {
    pub fn id_lookups(&self) -> usize {
        self.id_lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.lock().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(DomainError::UserAlreadyExists(
                "email already registered".to_string(),
            ));
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.lock().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        self.id_lookups.fetch_add(1, Ordering::SeqCst);
        let users = self.users.lock().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }
}

pub struct Fixture<S: Storage + 'static = FakeStorage> {
    pub repo: Arc<InMemoryPostRepository>,
    pub storage: Arc<S>,
    pub users: Arc<InMemoryUserRepository>,
    pub posts: PostService<InMemoryPostRepository, S>,
    pub auth: AuthService<InMemoryUserRepository>,
}

impl Fixture<FakeStorage> {
    pub fn new() -> Self {
        Self::with_storage(FakeStorage::default())
    }
}

impl<S: Storage + 'static> Fixture<S> {
    pub fn with_storage(storage: S) -> Self {
        let repo = Arc::new(InMemoryPostRepository::default());
        let storage = Arc::new(storage);
        let users = Arc::new(InMemoryUserRepository::default());
        let posts = PostService::new(Arc::clone(&repo), Arc::clone(&storage), MAX_UPLOAD);
        let auth = AuthService::new(
            Arc::clone(&users),
            JwtKeys::new("test-secret".to_string(), 3600),
        );
        Self {
            repo,
            storage,
            users,
            posts,
            auth,
        }
    }

    pub async fn count(&self) -> i64 {
        self.repo.count().await.unwrap()
    }

    /// Registers a user and returns a bearer token for it.
    pub async fn token(&self) -> String {
        let user = self
            .auth
            .register(
                "Tester".to_string(),
                "tester@example.com".to_string(),
                "password123".to_string(),
            )
            .await
            .unwrap();
        self.auth.issue_token(&user).unwrap()
    }
}

pub fn jpeg(name: &str, bytes: &[u8]) -> UploadedFile {
    UploadedFile::new(name, bytes.to_vec())
}

pub fn expected_image_url(bytes: &[u8], ext: &str) -> String {
    use sha2::{Digest, Sha256};
    format!("images/{}.{}", hex::encode(Sha256::digest(bytes)), ext)
}
