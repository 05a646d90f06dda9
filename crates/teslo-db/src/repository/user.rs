//! # User Repository
//!
//! Accounts, credentials and roles. Emails are stored lowercase, so lookups
//! lowercase their input too.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use teslo_core::{Role, User};

const USER_COLUMNS: &str = "id, name, email, role, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: String,
    name: String,
    email: String,
    role: Role,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            role: row.role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CredentialRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

/// A user together with the stored password hash, for login only.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user: User,
    pub password_hash: String,
}

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Stores a new user with an already hashed password.
    ///
    /// ## Returns
    /// * `Ok(User)` - The stored user (email lowercased)
    /// * `Err(DbError::UniqueViolation)` - Email already registered
    pub async fn insert(&self, user: &User, password_hash: &str) -> DbResult<User> {
        let email = user.email.to_lowercase();
        debug!(id = %user.id, email = %email, "Inserting user");

        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, role, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&email)
        .bind(password_hash)
        .bind(user.role)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, &email),
            other => other,
        })?;

        Ok(User {
            email,
            ..user.clone()
        })
    }

    /// Looks up a user and their password hash by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> DbResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, CredentialRow>(&format!(
            "SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = ?1"
        ))
        .bind(email.trim().to_lowercase())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| UserRecord {
            user: row.user.into(),
            password_hash: row.password_hash,
        }))
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    /// All users sorted by name (admin view).
    pub async fn list(&self) -> DbResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    /// Changes a user's role and returns the updated user.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No such user
    pub async fn update_role(&self, id: &str, role: Role) -> DbResult<User> {
        let result = sqlx::query("UPDATE users SET role = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(role)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        debug!(id = %id, role = %role, "User role updated");

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("User", id))
    }

    /// Number of users with the `client` role.
    pub async fn count_clients(&self) -> DbResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = ?1")
            .bind(Role::Client)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Removes every user. Used by the seeder only, after orders are gone.
    pub async fn delete_all(&self) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM users")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn user(id: &str, email: &str, role: Role) -> User {
        let now = Utc::now();
        User {
            id: id.to_string(),
            name: format!("User {}", id),
            email: email.to_string(),
            role,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_lowercases_email() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let stored = db
            .users()
            .insert(&user("u1", "Ana@Example.COM", Role::Client), "hash")
            .await
            .unwrap();
        assert_eq!(stored.email, "ana@example.com");

        let record = db
            .users()
            .find_by_email(" ANA@example.com ")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.user.id, "u1");
        assert_eq!(record.password_hash, "hash");
        assert_eq!(record.user.role, Role::Client);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.users()
            .insert(&user("u1", "ana@example.com", Role::Client), "hash")
            .await
            .unwrap();

        let err = db
            .users()
            .insert(&user("u2", "ANA@example.com", Role::Client), "hash")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_update_role_and_count_clients() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.users();
        repo.insert(&user("u1", "a@example.com", Role::Client), "h")
            .await
            .unwrap();
        repo.insert(&user("u2", "b@example.com", Role::Client), "h")
            .await
            .unwrap();
        assert_eq!(repo.count_clients().await.unwrap(), 2);

        let promoted = repo.update_role("u2", Role::Seo).await.unwrap();
        assert_eq!(promoted.role, Role::Seo);
        assert_eq!(repo.count_clients().await.unwrap(), 1);

        assert!(matches!(
            repo.update_role("ghost", Role::Admin).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.users()
            .insert(&user("u1", "a@example.com", Role::Admin), "h")
            .await
            .unwrap();

        assert_eq!(db.users().list().await.unwrap().len(), 1);
        assert!(db.users().get_by_id("u1").await.unwrap().is_some());
        assert!(db.users().get_by_id("u9").await.unwrap().is_none());
        assert!(db.users().find_by_email("x@example.com").await.unwrap().is_none());
    }
}
