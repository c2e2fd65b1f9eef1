// handlers/public/mod.rs - endpoints reachable without a token

pub mod health;
pub mod login;

pub use health::health;
pub use login::login;
