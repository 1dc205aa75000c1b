//! Data models for the dashboard.
//!
//! - `User`: one customer record with its nested sub-records
//! - `UserStatus`: the four account states
//! - `DashboardStats`: the summary cards above the users table

pub mod stats;
pub mod user;

pub use stats::DashboardStats;
pub use user::{AccountDetails, Education, Guarantor, PersonalInfo, Socials, User, UserStatus};
