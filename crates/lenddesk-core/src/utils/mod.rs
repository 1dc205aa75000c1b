//! Utility functions for string formatting and matching.

pub mod format;

pub use format::{
    contains_ignore_case, format_count, format_date_joined, or_na, tier_stars, truncate_string,
};
