//! Request handlers.

pub mod admin;
pub mod applications;
pub mod auth;
pub mod categories;
pub mod companies;
pub mod health;
pub mod jobs;
