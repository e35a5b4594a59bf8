// src/infra/errors.rs — Error types for tripmate

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TripmateError {
    // Generation errors (recovered into chat text by the controller)
    #[error("Provider '{provider}' error: {message}")]
    Provider {
        provider: String,
        message: String,
    },

    #[error("Model did not answer within {seconds}s")]
    Timeout { seconds: u64 },

    // User errors
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    InvalidTrip(#[from] TripValidationError),

    #[error("Not signed in")]
    NotSignedIn,

    #[error("Already signed in. Sign out first")]
    AlreadySignedIn,

    // Infra
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Rejections from sign-up / sign-in. Shown to the user as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Password must be at least {min} characters")]
    WeakPassword { min: usize },

    #[error("An account with this email already exists")]
    EmailTaken,

    #[error("Wrong email or password")]
    InvalidCredentials,

    #[error("Authentication backend error: {0}")]
    Backend(String),
}

/// Trip form problems caught before the model is called.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TripValidationError {
    #[error("Please fill in both origin and destination")]
    MissingLocation,

    #[error("End date must be after start date")]
    EndNotAfterStart,
}
