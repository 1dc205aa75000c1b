//! Terminal UI module using ratatui.
//!
//! - `render`: frame layout, title and status bars, overlays
//! - `input`: keyboard event handling
//! - `styles`: color palette and text styles
//! - `views`: per-route content (login, users listing, user detail)

pub mod input;
pub mod render;
pub mod styles;
pub mod views;
