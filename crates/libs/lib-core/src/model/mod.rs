//! # Model Layer
//!
//! Persistence for registered users.

pub mod store;
