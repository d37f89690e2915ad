//! Terminal UI module using ratatui.
//!
//! - `render`: main frame rendering and layout
//! - `input`: keyboard event handling
//! - `styles`: color palette and text styling
//! - `screens`: per-screen content rendering (home, signup, verify, settings)

pub mod input;
pub mod render;
pub mod screens;
pub mod styles;
