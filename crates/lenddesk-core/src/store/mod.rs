//! Local persistence for offline access.
//!
//! This module provides the `KeyValueStore` port with a file-backed and an
//! in-memory implementation, and the `Storage` adapter the rest of the
//! crate talks to. Stored keys:
//! - `users_data`: the full user snapshot (JSON array)
//! - `is_logged_in`: the authentication flag (JSON boolean)
//! - `user_token`: unused token slot, cleared on logout
//! - `current_user`: the user who logged in, for display

pub mod backend;
pub mod error;
pub mod storage;

pub use backend::{FileStore, KeyValueStore, MemoryStore};
pub use error::StoreError;
pub use storage::{age_display, Storage};
