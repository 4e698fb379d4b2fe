use serde::Serialize;
use serde::ser::SerializeMap;

use crate::domain::upload::UploadedFile;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Field-level validation failures, in the order the fields were checked.
/// Serializes as `{ "<field>": "<message>", ... }`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn fields(&self) -> Vec<&'static str> {
        self.0.iter().map(|e| e.field).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for error in &self.0 {
            map.serialize_entry(error.field, &error.message)?;
        }
        map.end()
    }
}

/// Raw value of the `image` field as it arrived.
#[derive(Debug, Clone)]
pub enum ImageInput {
    File(UploadedFile),
    Text(String),
}

/// Raw value of a text field as it arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextInput {
    Text(String),
    /// A JSON number, bool, array or object, or multipart bytes that are not UTF-8.
    NotString,
    /// Longer than the transport was willing to buffer.
    TooLarge { limit: usize },
}

impl From<String> for TextInput {
    fn from(text: String) -> Self {
        TextInput::Text(text)
    }
}

impl From<&str> for TextInput {
    fn from(text: &str) -> Self {
        TextInput::Text(text.to_owned())
    }
}

/// Unvalidated create/update payload.
#[derive(Debug, Clone, Default)]
pub struct PostInput {
    pub title: Option<TextInput>,
    pub description: Option<TextInput>,
    pub image: Option<ImageInput>,
}

impl PostInput {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: Some(TextInput::Text(title.into())),
            description: Some(TextInput::Text(description.into())),
            image: None,
        }
    }

    pub fn with_image(mut self, file: UploadedFile) -> Self {
        self.image = Some(ImageInput::File(file));
        self
    }

    pub fn with_image_text(mut self, text: impl Into<String>) -> Self {
        self.image = Some(ImageInput::Text(text.into()));
        self
    }
}

#[derive(Debug, Clone)]
pub struct ValidatedPost {
    pub title: String,
    pub description: String,
    pub image: Option<UploadedFile>,
}

pub fn validate_post(
    input: PostInput,
    max_upload_bytes: usize,
) -> Result<ValidatedPost, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let title = required_text(&mut errors, "title", input.title);
    let description = required_text(&mut errors, "description", input.description);

    let image = match input.image {
        None => None,
        Some(ImageInput::Text(text)) if text.trim().is_empty() => None,
        Some(ImageInput::Text(_)) => {
            errors.add("image", "The image field must be a file.");
            None
        }
        Some(ImageInput::File(file)) if file.is_blank() => None,
        Some(ImageInput::File(file)) if file.len() > max_upload_bytes => {
            errors.add(
                "image",
                format!(
                    "The image field must not be greater than {} kilobytes.",
                    max_upload_bytes / 1024
                ),
            );
            None
        }
        Some(ImageInput::File(file)) => Some(file),
    };

    errors.into_result(ValidatedPost {
        title,
        description,
        image,
    })
}

#[derive(Debug, Clone)]
pub struct ValidatedRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
}

pub fn validate_registration(
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> Result<ValidatedRegistration, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let name = required(&mut errors, "name", name);

    let email = email.map(|e| e.trim().to_lowercase()).unwrap_or_default();
    if email.is_empty() {
        errors.add("email", "The email field is required.");
    } else if !email.contains('@') {
        errors.add("email", "The email field must be a valid email address.");
    }

    let password = password.unwrap_or_default();
    if password.chars().count() < 8 {
        errors.add(
            "password",
            "The password field must be at least 8 characters.",
        );
    }

    errors.into_result(ValidatedRegistration {
        name,
        email,
        password,
    })
}

fn required_text(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<TextInput>,
) -> String {
    match value {
        None => required(errors, field, None),
        Some(TextInput::Text(text)) => required(errors, field, Some(text)),
        Some(TextInput::NotString) => {
            errors.add(field, format!("The {field} field must be a string."));
            String::new()
        }
        Some(TextInput::TooLarge { limit }) => {
            errors.add(
                field,
                format!(
                    "The {field} field must not be greater than {} kilobytes.",
                    limit / 1024
                ),
            );
            String::new()
        }
    }
}

fn required(errors: &mut ValidationErrors, field: &'static str, value: Option<String>) -> String {
    let value = value.map(|v| v.trim().to_string()).unwrap_or_default();
    if value.is_empty() {
        errors.add(field, format!("The {field} field is required."));
    }
    value
}
