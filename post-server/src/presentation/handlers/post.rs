use crate::application::post_service::PostService;
use crate::data::post_repository::PostRepository;
use crate::data::storage::Storage;
use crate::domain::error::DomainError;
use crate::domain::user::Principal;
use crate::presentation::form::PostForm;
use crate::presentation::utils::request_id;
use actix_web::{HttpRequest, HttpResponse, Scope, web};
use tracing::info;

pub fn scope<R, S>() -> Scope
where
    R: PostRepository + 'static,
    S: Storage + 'static,
{
    web::scope("/posts")
        .route("", web::get().to(list_posts::<R, S>))
        .route("", web::post().to(create_post::<R, S>))
        .route("/{id}", web::get().to(get_post::<R, S>))
        .route("/{id}", web::patch().to(update_post::<R, S>))
        .route("/{id}", web::delete().to(delete_post::<R, S>))
}

async fn list_posts<R, S>(
    req: HttpRequest,
    posts: web::Data<PostService<R, S>>,
) -> Result<HttpResponse, DomainError>
where
    R: PostRepository + 'static,
    S: Storage + 'static,
{
    let views = posts.list().await?;

    info!(
        request_id = %request_id(&req),
        count = views.len(),
        "posts retrieved"
    );

    Ok(HttpResponse::Ok().json(views))
}

async fn get_post<R, S>(
    posts: web::Data<PostService<R, S>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, DomainError>
where
    R: PostRepository + 'static,
    S: Storage + 'static,
{
    let view = posts.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(view))
}

async fn create_post<R, S>(
    req: HttpRequest,
    posts: web::Data<PostService<R, S>>,
    form: PostForm,
) -> Result<HttpResponse, DomainError>
where
    R: PostRepository + 'static,
    S: Storage + 'static,
{
    let view = posts.create(form.into_inner()).await?;

    info!(
        request_id = %request_id(&req),
        post_id = view.id,
        has_image = view.image_url.is_some(),
        "post created"
    );

    Ok(HttpResponse::Created().json(view))
}

async fn update_post<R, S>(
    req: HttpRequest,
    posts: web::Data<PostService<R, S>>,
    path: web::Path<i64>,
    form: PostForm,
) -> Result<HttpResponse, DomainError>
where
    R: PostRepository + 'static,
    S: Storage + 'static,
{
    let view = posts.update(path.into_inner(), form.into_inner()).await?;

    info!(
        request_id = %request_id(&req),
        post_id = view.id,
        "post updated"
    );

    Ok(HttpResponse::Ok().json(view))
}

async fn delete_post<R, S>(
    req: HttpRequest,
    principal: Option<Principal>,
    posts: web::Data<PostService<R, S>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, DomainError>
where
    R: PostRepository + 'static,
    S: Storage + 'static,
{
    let post_id = path.into_inner();
    let deleted = posts.delete(post_id, principal.as_ref()).await?;

    info!(
        request_id = %request_id(&req),
        post_id,
        "post deleted"
    );

    Ok(HttpResponse::Ok().json(deleted))
}
