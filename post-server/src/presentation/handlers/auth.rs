use crate::application::auth_service::AuthService;
use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::validation::validate_registration;
use crate::presentation::dto::{AuthResponse, LoginRequest, RegisterRequest};
use actix_web::{HttpResponse, Scope, web};
use tracing::info;

pub fn scope<U>() -> Scope
where
    U: UserRepository + 'static,
{
    web::scope("/auth")
        .route("/register", web::post().to(register::<U>))
        .route("/login", web::post().to(login::<U>))
}

async fn register<U>(
    service: web::Data<AuthService<U>>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, DomainError>
where
    U: UserRepository + 'static,
{
    let RegisterRequest {
        name,
        email,
        password,
    } = payload.into_inner();
    let input = validate_registration(name, email, password)?;

    let user = service
        .register(input.name, input.email, input.password)
        .await?;
    let token = service.issue_token(&user)?;

    info!(user_id = %user.id, email = %user.email, "user registered");

    Ok(HttpResponse::Created().json(AuthResponse::bearer(
        token,
        service.keys().ttl_secs(),
    )))
}

async fn login<U>(
    service: web::Data<AuthService<U>>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, DomainError>
where
    U: UserRepository + 'static,
{
    let token = service.login(&payload.email, &payload.password).await?;

    info!(email = %payload.email, "user logged in");

    Ok(HttpResponse::Ok().json(AuthResponse::bearer(
        token,
        service.keys().ttl_secs(),
    )))
}
