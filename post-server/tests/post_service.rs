mod common;

use common::{BrokenStorage, Fixture, expected_image_url, jpeg};
use post_server::data::storage::Storage;
use post_server::domain::error::DomainError;
use post_server::domain::post::Deleted;
use post_server::domain::user::Principal;
use post_server::domain::validation::PostInput;
use uuid::Uuid;

fn principal() -> Principal {
    Principal {
        id: Uuid::new_v4(),
        email: "admin@example.com".into(),
    }
}

#[tokio::test]
async fn post_without_image_has_null_image_url() {
    let fx = Fixture::new();

    let created = fx
        .posts
        .create(PostInput::new("Some title", "description"))
        .await
        .unwrap();
    let fetched = fx.posts.get(created.id).await.unwrap();

    assert_eq!(fetched, created);
    assert_eq!(fetched.image_url, None);
    assert_eq!(fx.storage.writes().await, 0);
}

#[tokio::test]
async fn post_can_be_stored_with_image() {
    let fx = Fixture::new();
    let bytes = b"\xff\xd8\xff fake jpeg";

    let view = fx
        .posts
        .create(PostInput::new("Some title", "description").with_image(jpeg("my_image.jpg", bytes)))
        .await
        .unwrap();

    assert_eq!(fx.count().await, 1);
    assert_eq!(view.title, "Some title");
    assert_eq!(view.description, "description");

    let url = view.image_url.expect("image_url set");
    assert_eq!(url, expected_image_url(bytes, "jpg"));
    assert!(fx.storage.exists(&url).await.unwrap());
    assert_eq!(fx.storage.read(&url).await.unwrap(), bytes.to_vec());
}

#[tokio::test]
async fn title_is_required_for_storing_post() {
    let fx = Fixture::new();

    let err = fx
        .posts
        .create(PostInput::new("", "description").with_image_text(""))
        .await
        .unwrap_err();

    match err {
        DomainError::Validation(errors) => assert_eq!(errors.fields(), vec!["title"]),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(fx.count().await, 0);
}

#[tokio::test]
async fn image_must_be_a_file_for_storing_post() {
    let fx = Fixture::new();

    let err = fx
        .posts
        .create(PostInput::new("Title", "description").with_image_text("sdfsdf"))
        .await
        .unwrap_err();

    match err {
        DomainError::Validation(errors) => {
            assert_eq!(errors.get("image"), Some("The image field must be a file."))
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(fx.count().await, 0);
    assert_eq!(fx.storage.writes().await, 0);
}

#[tokio::test]
async fn post_can_be_updated() {
    let fx = Fixture::new();
    let original = fx
        .posts
        .create(PostInput::new("Title", "description"))
        .await
        .unwrap();
    let bytes = b"new image";

    let updated = fx
        .posts
        .update(
            original.id,
            PostInput::new("Title edited", "description edited").with_image(jpeg("image.jpg", bytes)),
        )
        .await
        .unwrap();

    assert_eq!(updated.id, original.id);
    assert_eq!(updated.title, "Title edited");
    assert_eq!(updated.description, "description edited");
    assert_eq!(updated.image_url, Some(expected_image_url(bytes, "jpg")));
    assert_eq!(fx.posts.get(original.id).await.unwrap(), updated);
}

#[tokio::test]
async fn update_without_image_keeps_previous_image() {
    let fx = Fixture::new();
    let original = fx
        .posts
        .create(PostInput::new("Title", "description").with_image(jpeg("a.png", b"png")))
        .await
        .unwrap();

    let updated = fx
        .posts
        .update(original.id, PostInput::new("Other", "text"))
        .await
        .unwrap();

    assert_eq!(updated.image_url, original.image_url);
    assert_eq!(updated.title, "Other");
}

#[tokio::test]
async fn update_of_missing_post_is_not_found_and_stores_nothing() {
    let fx = Fixture::new();

    let err = fx
        .posts
        .update(42, PostInput::new("Title", "description").with_image(jpeg("a.jpg", b"x")))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::PostNotFound(42)));
    assert_eq!(fx.storage.writes().await, 0);
}

#[tokio::test]
async fn update_is_validated_like_create() {
    let fx = Fixture::new();
    let post = fx
        .posts
        .create(PostInput::new("Title", "description"))
        .await
        .unwrap();

    let err = fx
        .posts
        .update(post.id, PostInput::new("Title", ""))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Validation(_)));
    assert_eq!(fx.posts.get(post.id).await.unwrap(), post);
}

#[tokio::test]
async fn list_returns_every_post_in_insertion_order() {
    let fx = Fixture::new();
    for i in 0..10 {
        fx.posts
            .create(PostInput::new(format!("Title {i}"), format!("description {i}")))
            .await
            .unwrap();
    }

    let views = fx.posts.list().await.unwrap();

    assert_eq!(views.len(), 10);
    for (i, view) in views.iter().enumerate() {
        assert_eq!(view.title, format!("Title {i}"));
        assert_eq!(view, &fx.posts.get(view.id).await.unwrap());
    }
}

#[tokio::test]
async fn get_missing_post_is_not_found() {
    let fx = Fixture::new();
    assert!(matches!(
        fx.posts.get(1).await,
        Err(DomainError::PostNotFound(1))
    ));
}

#[tokio::test]
async fn delete_requires_principal() {
    let fx = Fixture::new();
    let post = fx
        .posts
        .create(PostInput::new("Title", "description"))
        .await
        .unwrap();

    let err = fx.posts.delete(post.id, None).await.unwrap_err();

    assert!(matches!(err, DomainError::Unauthorized));
    assert_eq!(fx.count().await, 1);
}

#[tokio::test]
async fn delete_with_principal_removes_post() {
    let fx = Fixture::new();
    let post = fx
        .posts
        .create(PostInput::new("Title", "description"))
        .await
        .unwrap();

    let result = fx.posts.delete(post.id, Some(&principal())).await.unwrap();

    assert_eq!(result, Deleted::new());
    assert_eq!(fx.count().await, 0);
    assert!(matches!(
        fx.posts.delete(post.id, Some(&principal())).await,
        Err(DomainError::PostNotFound(_))
    ));
}

#[tokio::test]
async fn same_bytes_reuse_the_same_image_url() {
    let fx = Fixture::new();
    let bytes = b"identical";

    let first = fx
        .posts
        .create(PostInput::new("One", "first").with_image(jpeg("one.jpg", bytes)))
        .await
        .unwrap();
    let second = fx
        .posts
        .create(PostInput::new("Two", "second").with_image(jpeg("two.jpg", bytes)))
        .await
        .unwrap();

    assert_eq!(first.image_url, second.image_url);
    assert_ne!(first.id, second.id);
    assert_eq!(fx.storage.writes().await, 2);
}

#[tokio::test]
async fn storage_failure_prevents_record_write() {
    let fx = Fixture::with_storage(BrokenStorage);

    let err = fx
        .posts
        .create(PostInput::new("Title", "description").with_image(jpeg("a.jpg", b"x")))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Storage(_)));
    assert_eq!(fx.count().await, 0);
}
