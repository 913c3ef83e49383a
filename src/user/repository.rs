//! Handle database requests.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::error::{Result, ServerError};
use crate::user::{NewUser, User};

/// Port for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by exact username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Whether a user already uses `username` or `email`.
    async fn exists(&self, username: &str, email: &str) -> Result<bool>;

    /// Insert a user and return its id.
    ///
    /// Fails with [`ServerError::Conflict`] on a duplicate username or email.
    async fn insert(&self, user: &NewUser) -> Result<i64>;
}

/// PostgreSQL user repository.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: Pool<Postgres>,
}

impl PgUserRepository {
    /// Create a new [`PgUserRepository`].
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT id, username, email, password_hash FROM users WHERE username = $1"#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn exists(&self, username: &str, email: &str) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS (SELECT 1 FROM users WHERE username = $1 OR email = $2)"#,
        )
        .bind(username)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn insert(&self, user: &NewUser) -> Result<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"INSERT INTO users (username, password_hash, email) VALUES ($1, $2, $3) RETURNING id"#,
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.email)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| match err {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                ServerError::Conflict
            },
            err => ServerError::Sql(err),
        })?;

        Ok(id)
    }
}


#[cfg(test)]
mod tests {
    use sqlx::{Pool, Postgres};

    use super::*;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.into(),
            email: email.into(),
            password_hash: "$argon2id$v=19$m=1024,t=1,p=1$c2FsdA$aGFzaA".into(),
        }
    }

    #[sqlx::test]
    #[ignore = "requires a PostgreSQL instance at DATABASE_URL"]
    async fn test_insert_and_find(pool: Pool<Postgres>) {
        let repo = PgUserRepository::new(pool);

        let id = repo.insert(&new_user("alice01", "a@x.com")).await.unwrap();
        let user = repo.find_by_username("alice01").await.unwrap().unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.email, "a@x.com");

        assert!(repo.exists("alice01", "other@x.com").await.unwrap());
        assert!(repo.exists("someone", "a@x.com").await.unwrap());
        assert!(!repo.exists("someone", "other@x.com").await.unwrap());
        assert!(repo.find_by_username("ALICE01").await.unwrap().is_none());
    }

    #[sqlx::test]
    #[ignore = "requires a PostgreSQL instance at DATABASE_URL"]
    async fn test_duplicate_is_conflict(pool: Pool<Postgres>) {
        let repo = PgUserRepository::new(pool);

        repo.insert(&new_user("alice01", "a@x.com")).await.unwrap();
        assert!(matches!(
            repo.insert(&new_user("alice01", "b@x.com")).await,
            Err(ServerError::Conflict)
        ));
        assert!(matches!(
            repo.insert(&new_user("bobby01", "a@x.com")).await,
            Err(ServerError::Conflict)
        ));
    }
}
