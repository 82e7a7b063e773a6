//! # Narrative Shared
//!
//! Wire types shared by the site server and its tooling: form payloads posted by
//! the browser and the JSON bodies of the machine-facing endpoints.

pub mod dto;
