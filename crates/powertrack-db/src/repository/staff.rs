//! # Staff Repository
//!
//! Staff identities referenced by transactions (creator and employees).
//! Credentials live with the authentication service, not here.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::error::{DbError, DbResult};
use powertrack_core::{new_id, StaffMember};

/// Repository for staff database operations.
#[derive(Debug, Clone)]
pub struct StaffRepository {
    pool: SqlitePool,
}

impl StaffRepository {
    /// Creates a new StaffRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StaffRepository { pool }
    }

    pub async fn insert(&self, full_name: &str, username: &str, user_role: &str) -> DbResult<StaffMember> {
        let member = StaffMember {
            id: new_id(),
            full_name: full_name.trim().to_string(),
            username: username.trim().to_string(),
            user_role: user_role.to_string(),
            is_active: true,
        };

        sqlx::query(
            r#"
            INSERT INTO users (id, full_name, username, user_role, is_active, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&member.id)
        .bind(&member.full_name)
        .bind(&member.username)
        .bind(&member.user_role)
        .bind(member.is_active)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("username", member.username.clone()),
            other => other,
        })?;

        Ok(member)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<StaffMember>> {
        let member = sqlx::query_as::<_, StaffMember>(
            "SELECT id, full_name, username, user_role, is_active FROM users WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(member)
    }

    pub async fn set_active(&self, id: &str, is_active: bool) -> DbResult<()> {
        let result = sqlx::query("UPDATE users SET is_active = ?2 WHERE id = ?1")
            .bind(id)
            .bind(is_active)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        info!(id = %id, is_active, "Staff status changed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::test_support::test_db;
    use crate::DbError;

    #[tokio::test]
    async fn test_insert_and_deactivate() {
        let db = test_db().await;
        let member = db.staff().insert("Dana Reyes", "dana", "employee").await.unwrap();

        db.staff().set_active(&member.id, false).await.unwrap();

        let stored = db.staff().get_by_id(&member.id).await.unwrap().unwrap();
        assert_eq!(stored.username, "dana");
        assert!(!stored.is_active);
    }

    #[tokio::test]
    async fn test_duplicate_username() {
        let db = test_db().await;
        db.staff().insert("Dana Reyes", "dana", "employee").await.unwrap();

        let err = db.staff().insert("Dana R.", "dana", "manager").await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { ref field, .. } if field == "username"));
    }
}
