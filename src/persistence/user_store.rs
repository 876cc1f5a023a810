use std::path::Path;

use bcrypt::{BcryptError, DEFAULT_COST};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sled::{Db, Tree};
use thiserror::Error;
use tracing::info;

const USERS_TREE: &str = "users";

/// A stored account. Keyed by `username` in the `users` tree.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: u64,
    pub username: String,
    /// bcrypt hash; the salt and cost are embedded in it.
    pub password_hash: String,
    pub created_at: i64,
}

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("user '{0}' already exists")]
    Conflict(String),

    #[error("user '{0}' not found")]
    NotFound(String),

    #[error("invalid password")]
    InvalidPassword,

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(#[from] sled::Error),

    #[error("corrupt user record: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("password hashing failed: {0}")]
    Hash(#[from] BcryptError),
}

#[derive(Clone)]
pub struct UserStore {
    db: Db,
    users: Tree,
    hash_cost: u32,
}

impl UserStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CredentialError> {
        let db = sled::open(path)?;
        let users = db.open_tree(USERS_TREE)?;
        Ok(Self {
            db,
            users,
            hash_cost: DEFAULT_COST,
        })
    }

    /// Overrides the bcrypt cost used for new registrations. Existing hashes
    /// keep the cost they were created with.
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    /// Creates `username` with a bcrypt hash of `password`.
    ///
    /// The insert only happens if the username is absent, so a concurrent
    /// registration of the same name yields exactly one winner.
    pub fn register(&self, username: &str, password: &str) -> Result<UserRecord, CredentialError> {
        validate(username, password)?;

        let record = UserRecord {
            id: self.db.generate_id()?,
            username: username.to_string(),
            password_hash: bcrypt::hash(password, self.hash_cost)?,
            created_at: Utc::now().timestamp(),
        };
        let encoded = serde_json::to_vec(&record)?;

        if self
            .users
            .compare_and_swap(username.as_bytes(), None::<&[u8]>, Some(encoded))?
            .is_err()
        {
            return Err(CredentialError::Conflict(username.to_string()));
        }
        self.users.flush()?;

        info!(user = %username, id = record.id, "registered user");
        Ok(record)
    }

    /// Looks `username` up and checks `password` against the stored hash.
    pub fn login(&self, username: &str, password: &str) -> Result<UserRecord, CredentialError> {
        let raw = self
            .users
            .get(username.as_bytes())?
            .ok_or_else(|| CredentialError::NotFound(username.to_string()))?;
        let record: UserRecord = serde_json::from_slice(&raw)?;

        if !bcrypt::verify(password, &record.password_hash)? {
            return Err(CredentialError::InvalidPassword);
        }
        Ok(record)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl std::fmt::Debug for UserStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserStore")
            .field("db", &"sled::Db")
            .field("users", &self.users.len())
            .field("hash_cost", &self.hash_cost)
            .finish()
    }
}

fn validate(username: &str, password: &str) -> Result<(), CredentialError> {
    if username.trim().is_empty() {
        return Err(CredentialError::Validation("username is empty".to_string()));
    }
    if password.is_empty() {
        return Err(CredentialError::Validation("password is empty".to_string()));
    }
    Ok(())
}
