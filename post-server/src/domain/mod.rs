pub mod error;
pub mod post;
pub mod upload;
pub mod user;
pub mod validation;
