// src/auth/mod.rs — Account sign-up and sign-in
//
// The Authenticator trait is the seam; `local` keeps accounts in the
// tripmate database.

pub mod local;

use async_trait::async_trait;

use crate::core::types::UserRef;
use crate::infra::errors::AuthError;

#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<UserRef, AuthError>;

    async fn sign_up(&self, email: &str, password: &str) -> Result<(), AuthError>;
}

/// Trimmed, lowercased email, or `InvalidEmail` when it cannot be one.
pub fn normalize_email(email: &str) -> Result<String, AuthError> {
    let email = email.trim().to_lowercase();
    let Some((local, domain)) = email.split_once('@') else {
        return Err(AuthError::InvalidEmail);
    };
    let domain_ok = domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains('@');
    if local.is_empty() || !domain_ok || email.chars().any(char::is_whitespace) {
        return Err(AuthError::InvalidEmail);
    }
    Ok(email)
}

/// Constant-time byte comparison for secrets.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
