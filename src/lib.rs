//! Library crate for rally-board-back, exposing modules for binaries and tests.

/// Runtime configuration.
pub mod config;
/// Wire types exchanged with clients.
pub mod dto;
/// Service and HTTP error types.
pub mod error;
/// HTTP route trees.
pub mod routes;
/// Application services around the scoring loop.
pub mod services;
/// Match model, engine and shared application state.
pub mod state;
