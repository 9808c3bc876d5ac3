use crate::database::postgres_repository::PostgresRepository;
use crate::error::repository_error::RepositoryError;
use crate::models::user::User;
use uuid::Uuid;

/// Storage operations for users. One statement per call; no business rules.
#[async_trait::async_trait]
pub trait UserRepository: Send + Sync {
    async fn list_users(&self) -> Result<Vec<User>, RepositoryError>;
    /// Fails with [`RepositoryError::NotExists`] when no row matches.
    async fn get_user_by_id(&self, id: &Uuid) -> Result<User, RepositoryError>;
    async fn create_user(&self, user: &User) -> Result<(), RepositoryError>;
    /// Replaces the mutable columns. Matching no row is not an error.
    async fn update_user(&self, user: &User) -> Result<(), RepositoryError>;
    /// Matching no row is not an error.
    async fn delete_user(&self, id: &Uuid) -> Result<(), RepositoryError>;
}

#[async_trait::async_trait]
impl UserRepository for PostgresRepository {
    async fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, birthday, created_at, updated_at
            FROM users
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::db("query", e))?;

        Ok(users)
    }

    async fn get_user_by_id(&self, id: &Uuid) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, birthday, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create_user(&self, user: &User) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, first_name, last_name, birthday, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.birthday)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::db("exec", e))?;

        Ok(())
    }

    async fn update_user(&self, user: &User) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            UPDATE users
            SET first_name = $1, last_name = $2, birthday = $3, updated_at = $4
            WHERE id = $5
            "#,
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.birthday)
        .bind(user.updated_at)
        .bind(user.id)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::db("exec", e))?;

        Ok(())
    }

    async fn delete_user(&self, id: &Uuid) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::db("exec", e))?;

        Ok(())
    }
}
