//! ProgramKing API server library.
//!
//! Exposes the core building blocks (config, state, error handling, routes,
//! workflow engine) so integration tests and the binary entrypoint can both
//! access them.

pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod router;
pub mod routes;
pub mod state;
