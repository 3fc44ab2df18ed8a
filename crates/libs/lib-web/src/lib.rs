//! # Web Library
//!
//! Router, middleware, page handlers and askama views for the stock plot
//! site.

pub mod flash;
pub mod handlers;
pub mod middleware;
pub mod server;
pub mod session;
pub mod views;

#[cfg(test)]
pub(crate) mod test_support;

pub use server::{create_router, init_tracing, start_server, AppState, ServerConfig};
