//! User directory: profile CRUD over active/inactive accounts.
//!
//! Mirrors the registry the chat history hangs off: conversation records
//! reference users by id, so the directory hands out stable uuids and
//! enforces unique emails. Deactivation hides a user from lookups without
//! destroying their history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Errors from user directory operations.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("user not found: {0}")]
    NotFound(Uuid),

    #[error("no user with email '{0}'")]
    EmailNotFound(String),

    #[error("a user with email '{0}' already exists")]
    AlreadyExists(String),
}

/// A user profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
}

/// Partial update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
}

/// In-process user registry.
#[derive(Debug, Default)]
pub struct UserDirectory {
    users: RwLock<HashMap<Uuid, User>>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a user; emails must be unique across the directory.
    pub async fn create(&self, new_user: NewUser) -> Result<User, UserError> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == new_user.email) {
            tracing::info!(email = %new_user.email, "user creation rejected, email taken");
            return Err(UserError::AlreadyExists(new_user.email));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            email: new_user.email,
            phone_number: new_user.phone_number,
            address: new_user.address,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());

        tracing::info!(id = %user.id, email = %user.email, "user created");
        Ok(user)
    }

    /// Fetch an active user by id.
    pub async fn get(&self, id: Uuid) -> Result<User, UserError> {
        self.users
            .read()
            .await
            .get(&id)
            .filter(|u| u.is_active)
            .cloned()
            .ok_or(UserError::NotFound(id))
    }

    /// Fetch an active user by email.
    pub async fn get_by_email(&self, email: &str) -> Result<User, UserError> {
        self.users
            .read()
            .await
            .values()
            .find(|u| u.is_active && u.email == email)
            .cloned()
            .ok_or_else(|| UserError::EmailNotFound(email.to_string()))
    }

    /// Every user, active or not.
    pub async fn all(&self) -> Vec<User> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by_key(|u| u.created_at);
        users
    }

    /// Active users only.
    pub async fn active(&self) -> Vec<User> {
        let mut users: Vec<User> = self
            .users
            .read()
            .await
            .values()
            .filter(|u| u.is_active)
            .cloned()
            .collect();
        users.sort_by_key(|u| u.created_at);
        users
    }

    /// Users whose first or last name contains the query,
    /// case-insensitively.
    pub async fn search_by_name(&self, name: &str) -> Vec<User> {
        let needle = name.to_lowercase();
        let mut users: Vec<User> = self
            .users
            .read()
            .await
            .values()
            .filter(|u| {
                u.first_name.to_lowercase().contains(&needle)
                    || u.last_name.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        users.sort_by_key(|u| u.created_at);
        users
    }

    /// Partially update an active user. Changing email re-checks
    /// uniqueness against every other user.
    pub async fn update(&self, id: Uuid, update: UserUpdate) -> Result<User, UserError> {
        let mut users = self.users.write().await;

        if !users.get(&id).is_some_and(|u| u.is_active) {
            return Err(UserError::NotFound(id));
        }

        if let Some(ref email) = update.email {
            if users.values().any(|u| u.id != id && u.email == *email) {
                tracing::info!(%id, email = %email, "user update rejected, email taken");
                return Err(UserError::AlreadyExists(email.clone()));
            }
        }

        let user = users
            .get_mut(&id)
            .filter(|u| u.is_active)
            .ok_or(UserError::NotFound(id))?;

        if let Some(first_name) = update.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            user.last_name = last_name;
        }
        if let Some(email) = update.email {
            user.email = email;
        }
        if let Some(phone_number) = update.phone_number {
            user.phone_number = Some(phone_number);
        }
        if let Some(address) = update.address {
            user.address = Some(address);
        }
        user.updated_at = Utc::now();

        tracing::info!(%id, "user updated");
        Ok(user.clone())
    }

    /// Remove a user entirely, active or not.
    pub async fn delete(&self, id: Uuid) -> Result<(), UserError> {
        self.users
            .write()
            .await
            .remove(&id)
            .map(|_| tracing::info!(%id, "user deleted"))
            .ok_or(UserError::NotFound(id))
    }

    /// Hide an active user from lookups.
    pub async fn deactivate(&self, id: Uuid) -> Result<(), UserError> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&id)
            .filter(|u| u.is_active)
            .ok_or(UserError::NotFound(id))?;
        user.is_active = false;
        user.updated_at = Utc::now();
        tracing::info!(%id, "user deactivated");
        Ok(())
    }

    /// Reinstate a user, active or not.
    pub async fn activate(&self, id: Uuid) -> Result<(), UserError> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id).ok_or(UserError::NotFound(id))?;
        user.is_active = true;
        user.updated_at = Utc::now();
        tracing::info!(%id, "user activated");
        Ok(())
    }
}
