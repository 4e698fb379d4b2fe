use actix_multipart::{Field, Multipart};
use actix_web::dev::Payload;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::{Error, FromRequest, HttpRequest, web};
use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use futures_util::future::LocalBoxFuture;

use crate::domain::upload::UploadedFile;
use crate::domain::validation::{ImageInput, PostInput, TextInput};
use crate::presentation::dto::PostJsonRequest;

const DEFAULT_UPLOAD_LIMIT: usize = 10 * 1024 * 1024;

/// Maximum number of bytes buffered per multipart field, registered as app data.
#[derive(Debug, Clone, Copy)]
pub struct UploadLimit(pub usize);

/// Create/update payload decoded from either `multipart/form-data` or JSON.
#[derive(Debug)]
pub struct PostForm(pub PostInput);

impl PostForm {
    pub fn into_inner(self) -> PostInput {
        self.0
    }
}

impl FromRequest for PostForm {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        if is_multipart(req) {
            let limit = req
                .app_data::<UploadLimit>()
                .map(|l| l.0)
                .unwrap_or(DEFAULT_UPLOAD_LIMIT);
            let multipart = Multipart::new(req.headers(), payload.take());
            Box::pin(async move { read_multipart(multipart, limit).await.map(PostForm) })
        } else {
            let json = web::Json::<PostJsonRequest>::from_request(req, payload);
            Box::pin(async move { Ok(PostForm(json.await?.into_inner().into())) })
        }
    }
}

fn is_multipart(req: &HttpRequest) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim_start().to_ascii_lowercase().starts_with("multipart/form-data"))
        .unwrap_or(false)
}

async fn read_multipart(mut multipart: Multipart, limit: usize) -> Result<PostInput, Error> {
    let mut input = PostInput::default();

    while let Some(field) = multipart.next().await {
        let mut field = field?;
        let name = field.name().unwrap_or_default().to_owned();
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_owned);
        let content_type = field.content_type().map(|m| m.to_string());

        // one byte past the limit is enough for validation to notice
        let cap = limit.saturating_add(1);
        let (data, complete) = read_field(&mut field, cap).await?;

        match (name.as_str(), filename) {
            ("image", Some(filename)) => {
                input.image = Some(ImageInput::File(UploadedFile {
                    filename,
                    content_type,
                    bytes: data,
                }));
            }
            ("image", None) => {
                input.image = Some(ImageInput::Text(
                    String::from_utf8_lossy(&data).into_owned(),
                ));
            }
            ("title", _) => input.title = Some(text_input(data, complete, limit)),
            ("description", _) => input.description = Some(text_input(data, complete, limit)),
            _ => {}
        }
    }

    Ok(input)
}

/// Buffers at most `cap` bytes but always drains the field. The flag is false
/// when bytes were dropped.
async fn read_field(field: &mut Field, cap: usize) -> Result<(Bytes, bool), Error> {
    let mut buf = BytesMut::new();
    let mut complete = true;
    while let Some(chunk) = field.next().await {
        let chunk = chunk?;
        let room = cap.saturating_sub(buf.len());
        if chunk.len() > room {
            complete = false;
        }
        buf.extend_from_slice(&chunk[..chunk.len().min(room)]);
    }
    Ok((buf.freeze(), complete))
}

fn text_input(data: Bytes, complete: bool, limit: usize) -> TextInput {
    if !complete || data.len() > limit {
        return TextInput::TooLarge { limit };
    }
    match String::from_utf8(data.to_vec()) {
        Ok(text) => TextInput::Text(text),
        Err(_) => TextInput::NotString,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_within_limit_is_kept_whole() {
        let text = "é".repeat(40_000);
        let input = text_input(Bytes::from(text.clone()), true, 1024 * 1024);
        assert_eq!(input, TextInput::Text(text));
    }

    #[test]
    fn truncated_text_is_reported_not_cut() {
        let input = text_input(Bytes::from(vec![b'a'; 2049]), false, 2048);
        assert_eq!(input, TextInput::TooLarge { limit: 2048 });
    }

    #[test]
    fn invalid_utf8_is_not_a_string() {
        let input = text_input(Bytes::from_static(&[0xff, 0xfe, 0x41]), true, 2048);
        assert_eq!(input, TextInput::NotString);
    }
}
