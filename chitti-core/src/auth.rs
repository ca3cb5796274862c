//! Account registry: registration, login and the OTP password-reset flow.
//!
//! Passwords are stored as salted SHA-256 digests. One-time codes go out
//! through the [`OtpMailer`] collaborator so hosts decide delivery; a code
//! that cannot be delivered is discarded rather than left claimable.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Minutes a one-time code stays valid.
const OTP_TTL_MINUTES: i64 = 10;

/// Errors from auth operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("password and confirm password do not match")]
    PasswordMismatch,

    #[error("{field} '{value}' is already registered")]
    AlreadyRegistered { field: &'static str, value: String },

    #[error("invalid username/email or password")]
    InvalidCredentials,

    #[error("account is deactivated")]
    Deactivated,

    #[error("email not found")]
    EmailNotFound,

    #[error("account not found")]
    AccountNotFound,

    #[error("invalid or expired OTP")]
    InvalidOtp,

    #[error("invalid old password")]
    InvalidOldPassword,

    #[error("failed to deliver OTP: {0}")]
    OtpDelivery(#[from] MailError),
}

/// Delivery failure reported by an [`OtpMailer`].
#[derive(Debug, Clone, Error)]
#[error("mail delivery failed: {0}")]
pub struct MailError(pub String);

/// Delivery collaborator for one-time codes.
#[async_trait]
pub trait OtpMailer: Send + Sync {
    async fn send_otp(&self, email: &str, code: &str) -> Result<(), MailError>;
}

/// A login account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    password_hash: String,
    salt: String,
}

impl Account {
    fn password_matches(&self, password: &str) -> bool {
        hash_password(password, &self.salt) == self.password_hash
    }

    fn set_password(&mut self, password: &str) {
        self.salt = generate_salt();
        self.password_hash = hash_password(password, &self.salt);
    }
}

/// Fields for registering an account.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Fields for a logged-in password change.
#[derive(Debug, Clone)]
pub struct PasswordChange {
    pub username_or_email: String,
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Fields for an OTP-verified password reset.
#[derive(Debug, Clone)]
pub struct PasswordReset {
    pub email: String,
    pub otp: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// An outstanding one-time code.
#[derive(Debug, Clone)]
struct OtpChallenge {
    email: String,
    code: String,
    expires_at: DateTime<Utc>,
    used: bool,
}

/// In-process account registry with the OTP reset flow.
pub struct AuthService {
    accounts: RwLock<Vec<Account>>,
    challenges: RwLock<Vec<OtpChallenge>>,
    mailer: Arc<dyn OtpMailer>,
}

impl AuthService {
    pub fn new(mailer: Arc<dyn OtpMailer>) -> Self {
        Self {
            accounts: RwLock::new(Vec::new()),
            challenges: RwLock::new(Vec::new()),
            mailer,
        }
    }

    /// Register a new account with a unique username and email.
    pub async fn register(&self, registration: Registration) -> Result<Account, AuthError> {
        tracing::info!(username = %registration.username, "registration started");

        if registration.password != registration.confirm_password {
            return Err(AuthError::PasswordMismatch);
        }

        let mut accounts = self.accounts.write().await;

        if accounts.iter().any(|a| a.username == registration.username) {
            tracing::info!(username = %registration.username, "registration rejected, username taken");
            return Err(AuthError::AlreadyRegistered {
                field: "username",
                value: registration.username,
            });
        }
        if accounts.iter().any(|a| a.email == registration.email) {
            tracing::info!(email = %registration.email, "registration rejected, email taken");
            return Err(AuthError::AlreadyRegistered {
                field: "email",
                value: registration.email,
            });
        }

        let salt = generate_salt();
        let account = Account {
            id: Uuid::new_v4(),
            username: registration.username,
            email: registration.email,
            first_name: registration.first_name,
            last_name: registration.last_name,
            is_active: true,
            last_login: None,
            created_at: Utc::now(),
            password_hash: hash_password(&registration.password, &salt),
            salt,
        };
        accounts.push(account.clone());

        tracing::info!(id = %account.id, username = %account.username, "account registered");
        Ok(account)
    }

    /// Authenticate by username or email. Updates the last-login stamp on
    /// success.
    pub async fn login(
        &self,
        username_or_email: &str,
        password: &str,
    ) -> Result<Account, AuthError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .iter_mut()
            .find(|a| a.username == username_or_email || a.email == username_or_email)
            .ok_or(AuthError::InvalidCredentials)?;

        if !account.is_active {
            tracing::info!(user = username_or_email, "login rejected, account deactivated");
            return Err(AuthError::Deactivated);
        }
        if !account.password_matches(password) {
            tracing::info!(user = username_or_email, "login rejected, bad password");
            return Err(AuthError::InvalidCredentials);
        }

        account.last_login = Some(Utc::now());
        tracing::info!(id = %account.id, "login succeeded");
        Ok(account.clone())
    }

    /// Log a logout. Sessions are the host's concern, so there is nothing
    /// to invalidate here.
    pub async fn logout(&self, username_or_email: &str) {
        tracing::info!(user = username_or_email, "logged out");
    }

    /// Start a password reset: store a short-lived one-time code and hand
    /// it to the mailer. A code whose delivery fails is discarded.
    pub async fn forget_password(&self, email: &str) -> Result<(), AuthError> {
        {
            let accounts = self.accounts.read().await;
            let account = accounts
                .iter()
                .find(|a| a.email == email)
                .ok_or(AuthError::EmailNotFound)?;
            if !account.is_active {
                return Err(AuthError::Deactivated);
            }
        }

        let code = generate_otp();
        self.challenges.write().await.push(OtpChallenge {
            email: email.to_string(),
            code: code.clone(),
            expires_at: Utc::now() + Duration::minutes(OTP_TTL_MINUTES),
            used: false,
        });

        if let Err(err) = self.mailer.send_otp(email, &code).await {
            tracing::error!(email, %err, "OTP delivery failed, discarding code");
            self.challenges
                .write()
                .await
                .retain(|c| !(c.email == email && c.code == code));
            return Err(err.into());
        }

        tracing::info!(email, "OTP sent");
        Ok(())
    }

    /// Finish a password reset: consume a valid, unexpired, unused code.
    pub async fn verify_otp_and_reset(&self, reset: PasswordReset) -> Result<(), AuthError> {
        if reset.new_password != reset.confirm_password {
            return Err(AuthError::PasswordMismatch);
        }

        let now = Utc::now();
        {
            let mut challenges = self.challenges.write().await;
            let challenge = challenges
                .iter_mut()
                .find(|c| {
                    c.email == reset.email
                        && c.code == reset.otp
                        && !c.used
                        && c.expires_at > now
                })
                .ok_or(AuthError::InvalidOtp)?;
            challenge.used = true;
        }

        let mut accounts = self.accounts.write().await;
        let account = accounts
            .iter_mut()
            .find(|a| a.email == reset.email)
            .ok_or(AuthError::AccountNotFound)?;
        account.set_password(&reset.new_password);

        tracing::info!(email = %reset.email, "password reset");
        Ok(())
    }

    /// Change a password after verifying the old one.
    pub async fn change_password(&self, change: PasswordChange) -> Result<(), AuthError> {
        if change.new_password != change.confirm_password {
            return Err(AuthError::PasswordMismatch);
        }

        let mut accounts = self.accounts.write().await;
        let account = accounts
            .iter_mut()
            .find(|a| {
                a.username == change.username_or_email || a.email == change.username_or_email
            })
            .ok_or(AuthError::AccountNotFound)?;

        if !account.is_active {
            return Err(AuthError::Deactivated);
        }
        if !account.password_matches(&change.old_password) {
            tracing::info!(user = %change.username_or_email, "password change rejected, bad old password");
            return Err(AuthError::InvalidOldPassword);
        }

        account.set_password(&change.new_password);
        tracing::info!(user = %change.username_or_email, "password changed");
        Ok(())
    }
}

fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn generate_salt() -> String {
    let mut rng = rand::thread_rng();
    (0..16).map(|_| format!("{:02x}", rng.gen::<u8>())).collect()
}

/// A 6-digit one-time code, zero-padded.
fn generate_otp() -> String {
    format!("{:06}", rand::thread_rng().gen_range(0..1_000_000))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_depends_on_salt() {
        let a = hash_password("secret", "salt-one");
        let b = hash_password("secret", "salt-two");
        assert_ne!(a, b);
        assert_eq!(a, hash_password("secret", "salt-one"));
    }

    #[test]
    fn test_otp_shape() {
        for _ in 0..20 {
            let code = generate_otp();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_salt_shape() {
        let salt = generate_salt();
        assert_eq!(salt.len(), 32);
        assert!(salt.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
