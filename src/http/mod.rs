//! HTTP interface layer
//!
//! Provides the Axum web handlers.

pub mod handlers;
