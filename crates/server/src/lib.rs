//! gift0 server - JSON API for anonymous gift wishlists.
//!
//! Visitors are identified by a client-generated fingerprint. They keep
//! named gift lists, add gifts by hand or by pasting product URLs (scraped
//! and structured by an LLM), and share lists through unguessable tokens
//! that let others mark gifts as purchased.
//!
//! # Architecture
//!
//! - [`routes`] - Axum handlers and JSON views
//! - [`services`] - Identity, list, gift, and intake workflows
//! - [`db`] - Storage traits with `PostgreSQL` and in-memory backends
//! - [`extraction`] - Firecrawl scraping and Anthropic structuring
//! - [`middleware`] - Fingerprint extractors, request IDs, rate limiting

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod extraction;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use config::ServerConfig;
pub use routes::app;
pub use state::AppState;
