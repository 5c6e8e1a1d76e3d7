//! # paperfind HTTP server
//!
//! REST surface over the ingestion pipeline and document store:
//!
//! - `POST /upload` — multipart document ingestion; returns the stored
//!   document with its vector as the `0x` hex wire string.
//! - `POST /search` — JSON `{query}`; returns documents ranked by cosine
//!   similarity, descending.
//! - `GET /papers` — all stored documents in insertion order.
//! - `GET /`, `GET /health`, `GET /ready` — service info and probes.
//!
//! No authentication: the service fronts a single-tenant, in-memory index.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
