//! Cryptogragic logics.

use std::sync::{Arc, OnceLock};

use argon2::password_hash::{
    PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::{Argon2, Params, Version};
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha512};
use tower_sessions::cookie::Key;

use crate::config::Argon2 as ArgonConfig;

type Result<T> = std::result::Result<T, CryptoError>;

#[derive(thiserror::Error, Debug)]
pub enum CryptoError {
    #[error("argon2 error: {0}")]
    Argon2(String),
}

/// Password manager that uses Argon2id and PHC string format for hashing and
/// verification.
#[derive(Clone)]
pub struct PasswordManager {
    params: Params,
    dummy_hash: Arc<OnceLock<String>>,
}

impl PasswordManager {
    /// Create a new [`PasswordManager`].
    pub fn new(config: Option<ArgonConfig>) -> Result<Self> {
        let config = config.unwrap_or_default();

        let params = Params::new(
            config.memory_cost,
            config.iterations,
            config.parallelism,
            Some(config.hash_length),
        )
        .map_err(|err| CryptoError::Argon2(err.to_string()))?;

        Ok(Self {
            params,
            dummy_hash: Arc::default(),
        })
    }

    fn argon2(&self) -> Argon2<'_> {
        Argon2::new(
            argon2::Algorithm::Argon2id,
            Version::V0x13,
            self.params.clone(),
        )
    }

    /// Hash password using Argon2id with a random salt.
    pub fn hash_password(&self, password: impl AsRef<[u8]>) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(password.as_ref(), &salt)
            .map_err(|e| CryptoError::Argon2(e.to_string()))?;

        Ok(hash.to_string())
    }

    /// Verify password against a PHC.
    ///
    /// A digest that cannot be parsed never matches.
    pub fn verify_password(
        &self,
        password: impl AsRef<[u8]>,
        phc_hash: &str,
    ) -> bool {
        let Ok(parsed) = PasswordHash::new(phc_hash) else {
            return false;
        };

        // Parameters are read back from the PHC string.
        self.argon2()
            .verify_password(password.as_ref(), &parsed)
            .is_ok()
    }
}

impl PasswordManager {
    /// Verify against `phc_hash`, or against a throwaway digest when the
    /// account does not exist. Both paths cost one Argon2 run; the second
    /// never matches.
    pub fn verify_password_or_dummy(
        &self,
        password: impl AsRef<[u8]>,
        phc_hash: Option<&str>,
    ) -> bool {
        match phc_hash {
            Some(phc_hash) => self.verify_password(password, phc_hash),
            None => {
                self.verify_password(password, self.dummy_hash());
                false
            },
        }
    }

    /// Digest of a random secret, built once with the configured cost.
    fn dummy_hash(&self) -> &str {
        self.dummy_hash.get_or_init(|| {
            let mut secret = [0u8; 32];
            OsRng.fill_bytes(&mut secret);

            self.hash_password(secret).unwrap_or_else(|err| {
                tracing::error!(%err, "cannot build dummy password digest");
                String::default()
            })
        })
    }
}

impl std::fmt::Debug for PasswordManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordManager")
            .field("m_cost", &self.params.m_cost())
            .field("t_cost", &self.params.t_cost())
            .field("p_cost", &self.params.p_cost())
            .finish()
    }
}

/// Build the key signing session cookies.
///
/// Derived from `secret` when given, random otherwise.
pub fn session_key(secret: Option<&[u8]>) -> Key {
    let mut bytes = [0u8; 64];

    match secret {
        Some(secret) => {
            bytes.copy_from_slice(&Sha512::digest(secret));
        },
        None => OsRng.fill_bytes(&mut bytes),
    }

    Key::from(&bytes[..])
}

#[cfg(test)]
pub(crate) fn fast_password_manager() -> PasswordManager {
    PasswordManager::new(Some(ArgonConfig {
        memory_cost: 1024,
        iterations: 1,
        parallelism: 1,
        hash_length: 32,
    }))
    .unwrap()
}
