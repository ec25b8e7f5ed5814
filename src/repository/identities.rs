//! Identities repository for database operations

use sqlx::sqlite::SqlitePool;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::identity::{Identity, Role},
};

#[derive(Clone)]
pub struct IdentitiesRepository {
    pool: SqlitePool,
}

impl IdentitiesRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new identity
    pub async fn insert(&self, identity: &Identity) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO identities (
                id, display_name, group_tag, role, password_salt, password_hash, points
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(identity.id)
        .bind(&identity.display_name)
        .bind(&identity.group_tag)
        .bind(identity.role)
        .bind(&identity.password_salt)
        .bind(&identity.password_hash)
        .bind(identity.points)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a batch of identities in a single all-or-nothing transaction
    pub async fn insert_batch(&self, identities: &[Identity]) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        for identity in identities {
            sqlx::query(
                r#"
                INSERT INTO identities (
                    id, display_name, group_tag, role, password_salt, password_hash, points
                ) VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(identity.id)
            .bind(&identity.display_name)
            .bind(&identity.group_tag)
            .bind(identity.role)
            .bind(&identity.password_salt)
            .bind(&identity.password_hash)
            .bind(identity.points)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Get identity by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Identity>> {
        let identity = sqlx::query_as::<_, Identity>("SELECT * FROM identities WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(identity)
    }

    /// Get the first identity matching a display name.
    ///
    /// Display names are not unique; with duplicates the match is whichever
    /// row the store enumerates first (no ORDER BY, deliberately).
    pub async fn find_by_display_name(&self, display_name: &str) -> AppResult<Option<Identity>> {
        let identity = sqlx::query_as::<_, Identity>(
            "SELECT * FROM identities WHERE display_name = ? LIMIT 1",
        )
        .bind(display_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(identity)
    }

    /// List identities, optionally filtered by group tag and/or role
    pub async fn list(
        &self,
        group_tag: Option<&str>,
        role: Option<Role>,
    ) -> AppResult<Vec<Identity>> {
        let mut conditions = Vec::new();

        if group_tag.is_some() {
            conditions.push("group_tag = ?");
        }
        if role.is_some() {
            conditions.push("role = ?");
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!("SELECT * FROM identities {}", where_clause);

        let mut builder = sqlx::query_as::<_, Identity>(&query);
        if let Some(tag) = group_tag {
            builder = builder.bind(tag);
        }
        if let Some(role) = role {
            builder = builder.bind(role);
        }

        let identities = builder.fetch_all(&self.pool).await?;
        Ok(identities)
    }

    /// Update name, group tag and role; credential fields are untouched
    pub async fn update_details(
        &self,
        id: Uuid,
        display_name: &str,
        group_tag: &str,
        role: Role,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE identities SET display_name = ?, group_tag = ?, role = ? WHERE id = ?",
        )
        .bind(display_name)
        .bind(group_tag)
        .bind(role)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Overwrite the stored credential pair (pass None/None to clear it)
    pub async fn set_credential(
        &self,
        id: Uuid,
        salt: Option<&str>,
        hash: Option<&str>,
    ) -> AppResult<bool> {
        let result =
            sqlx::query("UPDATE identities SET password_salt = ?, password_hash = ? WHERE id = ?")
                .bind(salt)
                .bind(hash)
                .bind(id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete an identity.
    ///
    /// The store permits deleting an identity that still has active loans;
    /// avoiding the dangling reference is the caller's responsibility.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM identities WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Move every identity in `old_tag` to `new_tag`, returning the count moved
    pub async fn rename_group(&self, old_tag: &str, new_tag: &str) -> AppResult<u64> {
        let result = sqlx::query("UPDATE identities SET group_tag = ? WHERE group_tag = ?")
            .bind(new_tag)
            .bind(old_tag)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Adjust the stored points balance, floored at zero
    pub async fn add_points(&self, id: Uuid, delta: i64) -> AppResult<bool> {
        let result = sqlx::query("UPDATE identities SET points = MAX(0, points + ?) WHERE id = ?")
            .bind(delta)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Check whether an admin identity with this exact name and group exists
    pub async fn admin_exists(&self, display_name: &str, group_tag: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM identities
                WHERE display_name = ? AND group_tag = ? AND role = 'admin'
            )
            "#,
        )
        .bind(display_name)
        .bind(group_tag)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}
