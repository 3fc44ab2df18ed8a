//! # Auth Handler Tests
//!
//! Registration, login, logout and the session guard, driven through the
//! real router.

mod guard;

use super::*;
use crate::test_support::*;
use axum::http::StatusCode;
use tower::ServiceExt;
