//! Data models for the portal client.
//!
//! - `Session`, `SsoUser`: authentication state snapshots
//! - `MailSettings`, `SsoSettings`: admin-editable configuration records
//! - Response payloads for the backend REST endpoints

pub mod response;
pub mod session;
pub mod settings;

pub use response::{LoginResponse, SsoConfig, SsoTestResponse, StatusResponse};
pub use session::{Session, SsoUser};
pub use settings::{MailSettings, SsoSettings};
