//! Authentication module: SSO session state and the identity client seam.
//!
//! - `SessionProvider`: process-wide session state machine with the
//!   background token-refresh timer
//! - `IdentityClient` / `OidcIdentityClient`: capability interface over the
//!   external SSO provider and its one concrete adapter
//! - `TokenStore`: OS-keychain persistence of the provider refresh token

pub mod identity;
pub mod provider;
pub mod store;

pub use identity::{IdentityClient, OidcIdentityClient};
pub use provider::SessionProvider;
pub use store::TokenStore;
