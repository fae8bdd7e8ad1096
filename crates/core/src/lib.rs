//! VetCare Core - Shared domain types.
//!
//! This crate provides the primitives shared by every VetCare component:
//! - `server` - REST API over owners, pets, veterinarians and visits
//! - `cli` - Command-line tools for migrations, seeding and auditing
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP. Database encoding is opt-in via the `postgres` feature.
//!
//! # Modules
//!
//! - [`types`] - Typed identifiers, email addresses and pet gender

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
