//! CrudService: generic CRUD over collection documents. AuthService: login and tokens.

mod auth;
mod crud;
mod password;
pub use auth::{AuthService, Claims, LoginRequest, LoginResponse, PublicUser};
pub use crud::{generate_id, now_timestamp, CrudService};
pub use password::{hash_password, is_password_hash, verify_password};
