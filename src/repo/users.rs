use secrecy::Secret;

use sqlx::PgExecutor;

use uuid::Uuid;

use crate::domain::EmailAddress;

#[derive(Debug)]
pub struct NewUser {
    pub email: EmailAddress,
    pub password_hash: String,
}

#[derive(Debug)]
pub struct UserCredentials {
    pub id: Uuid,
    pub password_hash: Secret<String>,
}

/// Repository for administrator accounts
pub struct UsersRepo;

impl UsersRepo {
    #[tracing::instrument("Insert a new user record", skip(executor))]
    pub async fn insert<'conn>(
        executor: impl PgExecutor<'conn>,
        new_user: &NewUser,
    ) -> sqlx::Result<Uuid> {
        sqlx::query_scalar("insert into users(email, password_hash) values ($1, $2) returning id")
            .bind(new_user.email.as_ref())
            .bind(&new_user.password_hash)
            .fetch_one(executor)
            .await
    }

    /// Insert the user, or replace the password hash if the email is taken
    #[tracing::instrument("Upsert a user record", skip(executor, new_user), fields(email = %new_user.email))]
    pub async fn upsert<'conn>(
        executor: impl PgExecutor<'conn>,
        new_user: &NewUser,
    ) -> sqlx::Result<Uuid> {
        sqlx::query_scalar(
            "insert into users(email, password_hash) values ($1, $2)
             on conflict (email) do update set password_hash=excluded.password_hash
             returning id",
        )
        .bind(new_user.email.as_ref())
        .bind(&new_user.password_hash)
        .fetch_one(executor)
        .await
    }

    #[tracing::instrument("Fetch user credentials by email", skip(executor))]
    pub async fn fetch_credentials_by_email<'conn>(
        executor: impl PgExecutor<'conn>,
        email: &EmailAddress,
    ) -> sqlx::Result<Option<UserCredentials>> {
        let row = sqlx::query_as::<_, (Uuid, String)>(
            "select id, password_hash from users where email=$1",
        )
        .bind(email.as_ref())
        .fetch_optional(executor)
        .await?;

        Ok(row.map(|(id, password_hash)| UserCredentials {
            id,
            password_hash: Secret::new(password_hash),
        }))
    }
}
