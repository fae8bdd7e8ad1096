//! VetCare 360 API library.
//!
//! This crate provides the clinic API as a library, allowing it to be tested
//! and reused by the CLI.
//!
//! # Layers
//!
//! - [`db`] - Entity storage (`PostgreSQL` and in-memory backends)
//! - [`services`] - Reference checks, validated writes and read projections
//! - [`routes`] - axum handlers and the application router

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use routes::app;
