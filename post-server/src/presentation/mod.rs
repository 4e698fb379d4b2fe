pub mod dto;
pub mod form;
pub mod handlers;
pub mod middleware;
pub mod utils;

use actix_web::web;

use crate::data::post_repository::PostRepository;
use crate::data::storage::Storage;
use crate::data::user_repository::UserRepository;

/// Registers every route. The caller provides `PostService<R, S>` and
/// `AuthService<U>` as app data and wraps the app in `JwtAuthMiddleware`.
pub fn configure<R, S, U>(cfg: &mut web::ServiceConfig)
where
    R: PostRepository + 'static,
    S: Storage + 'static,
    U: UserRepository + 'static,
{
    cfg.route("/health", web::get().to(handlers::health))
        .service(handlers::post::scope::<R, S>())
        .service(handlers::auth::scope::<U>());
}
