// src/auth/local.rs — Accounts stored in the local database
//
// Passwords are stored as iterated, salted SHA-256 digests (hex).

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use super::{constant_time_eq, normalize_email, Authenticator};
use crate::core::types::UserRef;
use crate::infra::errors::AuthError;
use crate::memory::StoreHandle;

const HASH_ROUNDS: u32 = 10_000;
const SALT_LEN: usize = 16;

pub struct LocalAuthenticator {
    store: StoreHandle,
    min_password_len: usize,
}

impl LocalAuthenticator {
    pub fn new(store: StoreHandle, min_password_len: usize) -> Self {
        Self {
            store,
            min_password_len,
        }
    }
}

fn backend(e: anyhow::Error) -> AuthError {
    AuthError::Backend(e.to_string())
}

pub fn generate_salt() -> Result<String, AuthError> {
    let mut buf = [0u8; SALT_LEN];
    getrandom::getrandom(&mut buf).map_err(|e| AuthError::Backend(e.to_string()))?;
    Ok(hex::encode(buf))
}

pub fn hash_password(password: &str, salt: &str) -> String {
    let mut digest = Sha256::new()
        .chain_update(salt.as_bytes())
        .chain_update(password.as_bytes())
        .finalize();
    for _ in 1..HASH_ROUNDS {
        digest = Sha256::new()
            .chain_update(digest)
            .chain_update(password.as_bytes())
            .finalize();
    }
    hex::encode(digest)
}

pub fn verify_password(password: &str, salt: &str, expected_hash: &str) -> bool {
    constant_time_eq(
        hash_password(password, salt).as_bytes(),
        expected_hash.as_bytes(),
    )
}

#[async_trait]
impl Authenticator for LocalAuthenticator {
    async fn sign_in(&self, email: &str, password: &str) -> Result<UserRef, AuthError> {
        // A malformed email can't belong to an account
        let email = normalize_email(email).map_err(|_| AuthError::InvalidCredentials)?;
        let user = self
            .store
            .find_user_by_email(email)
            .await
            .map_err(backend)?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &user.salt, &user.password_hash) {
            tracing::debug!(uid = %user.uid, "sign-in rejected");
            return Err(AuthError::InvalidCredentials);
        }
        Ok(UserRef::new(user.uid, user.email))
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let email = normalize_email(email)?;
        if password.chars().count() < self.min_password_len {
            return Err(AuthError::WeakPassword {
                min: self.min_password_len,
            });
        }

        let salt = generate_salt()?;
        let hash = hash_password(password, &salt);
        let uid = uuid::Uuid::new_v4().to_string();
        let created = self
            .store
            .insert_user(uid.clone(), email, hash, salt)
            .await
            .map_err(backend)?;
        if !created {
            return Err(AuthError::EmailTaken);
        }
        tracing::info!(%uid, "account created");
        Ok(())
    }
}
