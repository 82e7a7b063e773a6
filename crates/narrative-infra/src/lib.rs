//! # Narrative Infrastructure
//!
//! Concrete implementations of the ports defined in `narrative-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory store only
//! - `postgres` - PostgreSQL store via SeaORM
//! - `auth` - JWT sessions + Argon2 password hashing

pub mod clock;
pub mod database;

#[cfg(feature = "auth")]
pub mod auth;

pub use clock::{FixedClock, SystemClock};
pub use database::{
    DatabaseConnections, InMemoryPictureRepository, InMemoryPostRepository,
    InMemorySponsorRepository, InMemoryUserRepository,
};

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
