//! Credential adapters: password hashing and bearer tokens.

mod argon;
mod jwt;

pub use argon::Argon2PasswordHasher;
pub use jwt::JwtTokenService;
