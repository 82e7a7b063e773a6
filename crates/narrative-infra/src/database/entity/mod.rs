//! SeaORM entities, one module per table.

pub mod picture;
pub mod post;
pub mod sponsor;
pub mod user;
