use async_trait::async_trait;

use super::domain::{AuthUser, UserRecord};
use super::errors::AuthError;

/// Repository abstraction for credential persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    /// Exact-match lookup; an unknown email is absence, not an error.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthError>;

    /// Insert a new record. A duplicate email fails with `AuthError::Conflict`,
    /// including when two registrations for the same email race: the store's
    /// uniqueness guarantee makes the losing insert fail.
    async fn create(&self, email: &str, password_hash: &str) -> Result<UserRecord, AuthError>;

    /// Public listing; never exposes password hashes.
    async fn list_all(&self) -> Result<Vec<AuthUser>, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use uuid::Uuid;

    #[derive(Default)]
    pub struct MockAuthRepository {
        users: Mutex<HashMap<String, UserRecord>>, // key: email
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthError> {
            let users = self.users.lock().unwrap();
            Ok(users.get(email).cloned())
        }

        async fn create(&self, email: &str, password_hash: &str) -> Result<UserRecord, AuthError> {
            let mut users = self.users.lock().unwrap();
            if users.contains_key(email) {
                return Err(AuthError::Conflict);
            }
            let record = UserRecord {
                id: Uuid::new_v4(),
                email: email.to_string(),
                password_hash: password_hash.to_string(),
            };
            users.insert(email.to_string(), record.clone());
            Ok(record)
        }

        async fn list_all(&self) -> Result<Vec<AuthUser>, AuthError> {
            let users = self.users.lock().unwrap();
            let mut all: Vec<AuthUser> = users.values().map(UserRecord::public).collect();
            // deterministic order for assertions
            all.sort_by(|a, b| a.email.cmp(&b.email));
            Ok(all)
        }
    }
}
