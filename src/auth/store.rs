use anyhow::{Context, Result};
use keyring::Entry;

const SERVICE_NAME: &str = "portal-tui";

/// Keychain slot holding the provider refresh token between runs. This is
/// what the silent session check resumes from.
const REFRESH_TOKEN_KEY: &str = "sso-refresh-token";

pub struct TokenStore;

impl TokenStore {
    /// Store the SSO refresh token in the OS keychain
    pub fn store(token: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, REFRESH_TOKEN_KEY)
            .context("Failed to create keyring entry")?;
        entry
            .set_password(token)
            .context("Failed to store refresh token in keychain")?;
        Ok(())
    }

    /// Retrieve the stored SSO refresh token from the OS keychain
    pub fn load() -> Result<String> {
        let entry = Entry::new(SERVICE_NAME, REFRESH_TOKEN_KEY)
            .context("Failed to create keyring entry")?;
        entry
            .get_password()
            .context("Failed to retrieve refresh token from keychain")
    }

    /// Delete the stored SSO refresh token
    pub fn clear() -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, REFRESH_TOKEN_KEY)
            .context("Failed to create keyring entry")?;
        entry
            .delete_credential()
            .context("Failed to delete refresh token from keychain")?;
        Ok(())
    }
}
