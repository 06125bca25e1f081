pub mod auth;
pub mod dashboard;
pub mod error;
pub mod health;
pub mod job;
pub mod submission;
pub mod validation;
