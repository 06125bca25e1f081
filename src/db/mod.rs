pub mod connection;
pub mod job_repository;
pub mod migrations;
pub mod models;
pub mod submission_repository;
pub mod user_repository;
