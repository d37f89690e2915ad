//! REST client module for the portal backend.
//!
//! The backend owns all business logic; this module is transport plus error
//! normalization. Screens surface `ApiError` messages directly.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
