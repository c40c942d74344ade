//! Auth routes - login and registration pass-through, password strength meter

pub mod api;

pub use api::{api_login, api_password_strength, api_register};
