//! # Narrative Core
//!
//! The domain layer of the Narrative site.
//! Posts, galleries and users, the visibility policy for scheduled posts and the
//! post authoring workflow. No infrastructure dependencies live here.

pub mod accounts;
pub mod domain;
pub mod error;
pub mod form;
pub mod policy;
pub mod ports;
pub mod workflow;

pub use accounts::Accounts;
pub use error::DomainError;
pub use policy::AccessDecision;
pub use workflow::PostWorkflow;
