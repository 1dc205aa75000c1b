//! Core library for lenddesk.
//!
//! Everything the dashboard needs that is not presentation:
//!
//! - `api`: remote users endpoint client and the raw-record mapper
//! - `store`: key-value persistence port and the `Storage` adapter
//! - `auth`: session gate and route guard
//! - `listing`: filter and pagination pipeline over the cached users
//! - `loader`: the initial load state machine
//! - `models`: the `User` record and friends
//! - `config`: user configuration and directories

pub mod api;
pub mod auth;
pub mod config;
pub mod listing;
pub mod loader;
pub mod models;
pub mod store;
pub mod utils;

pub use api::{ApiClient, ApiError};
pub use auth::{LoginError, Route, SessionGate};
pub use config::Config;
pub use listing::{FilterCriteria, PageButton, PageSize, UserListing};
pub use loader::{LoadState, Loader};
pub use models::{DashboardStats, User, UserStatus};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError, Storage};
