//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL repositories using Diesel ORM
//! - **memory**: process-local repositories for development and tests
//! - **storage**: the upload directory behind the image store port
//! - **auth**: Argon2 password hashing and JWT bearer tokens
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod auth;
pub mod memory;
pub mod persistence;
pub mod storage;
