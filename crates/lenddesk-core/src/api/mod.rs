//! Client for the remote users endpoint.
//!
//! This module provides the `ApiClient` that fetches the raw customer list
//! and the mapper that turns each raw record into a `User`. The endpoint is
//! a public mock API: one unauthenticated GET, no paging.

pub mod client;
pub mod error;
pub mod mapper;

pub use client::{ApiClient, DEFAULT_USERS_URL};
pub use error::ApiError;
pub use mapper::{map_raw_user, map_raw_users, RawUser};
