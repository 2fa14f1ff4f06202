//! HTTP handlers for resource CRUD, authentication and seeding.

pub mod auth;
pub mod entity;
pub mod setup;
