pub mod post_repository;
pub mod storage;
pub mod user_repository;
