pub mod models;
pub mod user_repository;
