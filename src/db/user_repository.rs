use sqlx::{Pool, Postgres};

use crate::db::models::UserRow;

/// Repository for account lookups. Only the trivial login endpoint uses
/// this; credentials are stored and compared in plain text and the login
/// flow carries no security guarantees.
pub struct UserRepository;

impl UserRepository {
    pub async fn find_by_credentials(
        pool: &Pool<Postgres>,
        email: &str,
        password: &str,
    ) -> Result<Option<UserRow>, sqlx::Error> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1 AND password = $2")
            .bind(email)
            .bind(password)
            .fetch_optional(pool)
            .await
    }
}
