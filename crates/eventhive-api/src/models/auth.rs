//! Authentication payloads.

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Body of a sign-in request (user or admin).
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

impl SignInRequest {
    /// Creates a sign-in request, checking the email address first.
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let email = email.into().trim().to_string();
        validate_email(&email)?;
        Ok(Self {
            email,
            password: password.into(),
        })
    }
}

impl std::fmt::Debug for SignInRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignInRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Successful sign-in response.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct SignInResponse {
    /// Bearer token for authenticated requests.
    pub token: String,
}

/// Body of a sign-up request.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl SignUpRequest {
    /// Creates a sign-up request.
    ///
    /// The name must be non-blank, the email must contain `@`, the password
    /// must be non-empty and equal to `confirm_password`.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        confirm_password: &str,
    ) -> Result<Self, ValidationError> {
        let name = name.into().trim().to_string();
        let email = email.into().trim().to_string();
        let password = password.into();

        if name.is_empty() {
            return Err(ValidationError::Missing { field: "name" });
        }
        validate_email(&email)?;
        if password.is_empty() {
            return Err(ValidationError::Missing { field: "password" });
        }
        if password != confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }

        Ok(Self {
            name,
            email,
            password,
        })
    }
}

impl std::fmt::Debug for SignUpRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignUpRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Response of the backend health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthResponse {
    pub message: String,
}

/// Basic email check: the address must contain `@`.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.contains('@') {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}
