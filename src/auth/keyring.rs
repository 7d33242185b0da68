//
//  sonarqube-client
//  auth/keyring.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Secure Credential Storage Module
//!
//! Stores tokens, passwords and passcodes in the system's native keyring so
//! the configuration file never holds secrets.
//!
//! ## Storage Model
//!
//! - **Service**: `sonarqube-client`
//! - **Key**: `<server name>` for the primary secret, or
//!   `<server name>.passcode` for a monitoring passcode
//! - **Value**: the secret itself
//!
//! ## Example
//!
//! ```rust,no_run
//! use sonarqube_client::auth::{KeyringStore, SecretKind};
//!
//! fn manage_credentials() -> anyhow::Result<()> {
//!     let store = KeyringStore::new();
//!
//!     store.store("default", SecretKind::Primary, "squ_token")?;
//!     if let Some(token) = store.get("default", SecretKind::Primary)? {
//!         println!("Found stored token ({} chars)", token.len());
//!     }
//!     store.delete("default", SecretKind::Primary)?;
//!
//!     Ok(())
//! }
//! ```

use anyhow::Result;
use keyring::Entry;

const SERVICE_NAME: &str = "sonarqube-client";

/// Which secret of a server profile an entry holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretKind {
    /// Token or password, depending on the profile's auth type.
    Primary,
    /// Monitoring passcode.
    Passcode,
}

impl SecretKind {
    /// Keyring entry name for `server` and this kind of secret.
    pub fn entry_key(self, server: &str) -> String {
        match self {
            Self::Primary => server.to_string(),
            Self::Passcode => format!("{}.passcode", server),
        }
    }
}

/// Credential store backed by the platform keyring.
pub struct KeyringStore {
    service: String,
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyringStore {
    pub fn new() -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
        }
    }

    pub fn store(&self, server: &str, kind: SecretKind, secret: &str) -> Result<()> {
        let entry = Entry::new(&self.service, &kind.entry_key(server))?;
        entry.set_password(secret)?;
        tracing::debug!(server, ?kind, "stored credential in keyring");
        Ok(())
    }

    pub fn get(&self, server: &str, kind: SecretKind) -> Result<Option<String>> {
        let entry = Entry::new(&self.service, &kind.entry_key(server))?;
        match entry.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn delete(&self, server: &str, kind: SecretKind) -> Result<()> {
        let entry = Entry::new(&self.service, &kind.entry_key(server))?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()), // Already deleted
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_keys() {
        assert_eq!(SecretKind::Primary.entry_key("prod"), "prod");
        assert_eq!(SecretKind::Passcode.entry_key("prod"), "prod.passcode");
    }
}
