//! Account management service.
//!
//! Creates platform accounts and handles the admin activation toggle for
//! enterprise organizers. Credential checking and session tokens live in
//! the authentication layer, which hands the workflow a verified
//! `(user_id, role)` pair.

use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use chrono::Utc;
use sea_orm::{DatabaseConnection, Set};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;
use workshop_common::{AppError, AppResult, id::IdGenerator};
use workshop_db::entities::{user, user::UserRole};
use workshop_db::repositories::UserRepository;

/// Input for registering an account.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAccountInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
    #[serde(default)]
    pub role: UserRole,
}

/// Service for managing platform accounts.
#[derive(Clone)]
pub struct AccountService {
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl AccountService {
    /// Create a new account service.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            user_repo: UserRepository::new(db),
            id_gen: IdGenerator::new(),
        }
    }

    /// Get an account by ID.
    pub async fn get_by_id(&self, user_id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(user_id).await
    }

    /// Register a new account.
    ///
    /// Emails are unique. Enterprise accounts start inactive and must be
    /// activated by an admin before acting; admin accounts cannot be
    /// self-registered.
    pub async fn register(&self, input: RegisterAccountInput) -> AppResult<user::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if input.role == UserRole::Admin {
            return Err(AppError::Validation(
                "Admin accounts cannot be self-registered".to_string(),
            ));
        }

        if self.user_repo.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::Conflict(
                "User with this email already exists".to_string(),
            ));
        }

        let password_hash = hash_password(&input.password)?;
        let now = Utc::now();

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name),
            email: Set(input.email),
            phone: Set(input.phone),
            password_hash: Set(password_hash),
            role: Set(input.role),
            is_active: Set(input.role != UserRole::Enterprise),
            created_at: Set(now.into()),
            updated_at: Set(None),
        };

        let created = self.user_repo.create(model).await?;

        tracing::debug!(user = %created.id, role = ?created.role, "Account registered");

        Ok(created)
    }

    /// Activate an enterprise account after admin review.
    pub async fn activate(&self, user_id: &str) -> AppResult<user::Model> {
        self.user_repo.set_active(user_id, true).await
    }

    /// Deactivate an account.
    pub async fn deactivate(&self, user_id: &str) -> AppResult<user::Model> {
        self.user_repo.set_active(user_id, false).await
    }

    /// List accounts with a given role (paginated, newest first).
    pub async fn list_by_role(
        &self,
        role: UserRole,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<user::Model>> {
        self.user_repo.list_by_role(role, limit, offset).await
    }
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use argon2::{PasswordVerifier, password_hash::PasswordHash};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_user(id: &str, email: &str, role: UserRole, is_active: bool) -> user::Model {
        user::Model {
            id: id.to_string(),
            name: "Test User".to_string(),
            email: email.to_string(),
            phone: None,
            password_hash: "$argon2id$test".to_string(),
            role,
            is_active,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn register_input(email: &str, role: UserRole) -> RegisterAccountInput {
        RegisterAccountInput {
            name: "Test User".to_string(),
            email: email.to_string(),
            phone: None,
            password: "hunter2-secret".to_string(),
            role,
        }
    }

    #[test]
    fn test_hash_password_roundtrip() {
        let hash = hash_password("hunter2-secret").unwrap();

        assert!(hash.starts_with("$argon2"));

        let parsed = PasswordHash::new(&hash).unwrap();
        assert!(
            Argon2::default()
                .verify_password(b"hunter2-secret", &parsed)
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_email() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = AccountService::new(db);
        let result = service
            .register(register_input("not-an-email", UserRole::User))
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_register_rejects_admin_role() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = AccountService::new(db);
        let result = service
            .register(register_input("admin@example.com", UserRole::Admin))
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let existing = create_test_user("u1", "taken@example.com", UserRole::User, true);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .into_connection(),
        );

        let service = AccountService::new(db);
        let result = service
            .register(register_input("taken@example.com", UserRole::User))
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_enterprise_starts_inactive() {
        let created = create_test_user("ent1", "org@example.com", UserRole::Enterprise, false);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .append_query_results([[created]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = AccountService::new(db);
        let result = service
            .register(register_input("org@example.com", UserRole::Enterprise))
            .await
            .unwrap();

        assert_eq!(result.role, UserRole::Enterprise);
        assert!(!result.is_active);
    }
}
