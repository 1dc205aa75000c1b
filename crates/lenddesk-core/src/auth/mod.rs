//! Session handling and navigation guard.
//!
//! This module provides:
//! - `SessionGate`: the authenticated flag, login against the cached users
//!   and logout
//! - `Route`: the navigable locations and the rule that redirects between
//!   them based on the session

pub mod route;
pub mod session;

pub use route::Route;
pub use session::{LoginError, SessionGate};
