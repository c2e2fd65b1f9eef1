// handlers/protected/mod.rs - endpoints behind jwt_auth_middleware

pub mod contact;

pub use contact::*;
