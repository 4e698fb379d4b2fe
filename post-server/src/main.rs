use std::sync::Arc;

use post_server::application::auth_service::AuthService;
use post_server::application::post_service::PostService;
use post_server::data::post_repository::PostgresPostRepository;
use post_server::data::storage::LocalStorage;
use post_server::data::user_repository::PostgresUserRepository;
use post_server::infrastructure::config::AppConfig;
use post_server::infrastructure::database::{create_pool, run_migrations};
use post_server::infrastructure::logging::init_logging;
use post_server::infrastructure::security::JwtKeys;
use post_server::server::start_rest_server;
use tracing::info;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::from_env()?;
    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    let user_repo = Arc::new(PostgresUserRepository::new(pool.clone()));
    let post_repo = Arc::new(PostgresPostRepository::new(pool));
    let storage = Arc::new(LocalStorage::new(config.storage_root.clone()));
    info!(root = %storage.root().display(), "using local storage");

    let auth_service = AuthService::new(
        user_repo,
        JwtKeys::new(config.jwt_secret.clone(), config.token_ttl_secs),
    );
    let post_service = PostService::new(post_repo, storage, config.max_upload_bytes);

    start_rest_server(config, post_service, auth_service).await
}
