//! Content for each route.

pub mod details;
pub mod login;
pub mod users;
