use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("not found")]
    NotFound,
    #[error("unauthorized")]
    Unauthorized,
    #[error("invalid data: {}", format_fields(.0))]
    Validation(BTreeMap<String, String>),
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
}

#[derive(Deserialize)]
struct ValidationBody {
    #[serde(default)]
    errors: BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl ClientError {
    pub async fn from_http_response(resp: reqwest::Response) -> Self {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();

        match status.as_u16() {
            401 => ClientError::Unauthorized,
            404 => ClientError::NotFound,
            422 => match serde_json::from_str::<ValidationBody>(&text) {
                Ok(body) => ClientError::Validation(body.errors),
                Err(_) => ClientError::Server {
                    status: 422,
                    message: text,
                },
            },
            code => ClientError::Server {
                status: code,
                message: serde_json::from_str::<ErrorBody>(&text)
                    .map(|b| b.error)
                    .unwrap_or(text),
            },
        }
    }
}

fn format_fields(fields: &BTreeMap<String, String>) -> String {
    fields
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}
