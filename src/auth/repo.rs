use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database. `password_hash` is null for accounts
/// created through the passwordless OTP path.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub created_at: OffsetDateTime,
}

impl User {
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new user with a hashed password.
    pub async fn create_with_password(
        db: &PgPool,
        email: &str,
        password_hash: &str,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Server-controlled user creation for the OTP path: returns the
    /// existing row or inserts one with no password. The no-op DO UPDATE
    /// makes the conflicting row come back through RETURNING.
    pub async fn find_or_create_passwordless(db: &PgPool, email: &str) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email)
            VALUES ($1)
            ON CONFLICT (email) DO UPDATE SET email = EXCLUDED.email
            RETURNING id, email, password_hash, created_at
            "#,
        )
        .bind(email)
        .fetch_one(db)
        .await?;
        Ok(user)
    }
}

/// One-time login code. Rows are consumed (used flips true) exactly once
/// and never deleted; expired rows are simply ignored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OtpCode {
    pub id: Uuid,
    pub email: String,
    pub code: String,
    pub created_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
    pub used: bool,
}

impl OtpCode {
    pub async fn insert(
        db: &PgPool,
        email: &str,
        code: &str,
        expires_at: OffsetDateTime,
    ) -> anyhow::Result<OtpCode> {
        let row = sqlx::query_as::<_, OtpCode>(
            r#"
            INSERT INTO otp_codes (email, code, expires_at, used)
            VALUES ($1, $2, $3, false)
            RETURNING id, email, code, created_at, expires_at, used
            "#,
        )
        .bind(email)
        .bind(code)
        .bind(expires_at)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    /// Most recently created unused, unexpired row for this email+code.
    /// Repeated login attempts can leave several unused rows per email.
    pub async fn find_active(
        db: &PgPool,
        email: &str,
        code: &str,
    ) -> anyhow::Result<Option<OtpCode>> {
        let row = sqlx::query_as::<_, OtpCode>(
            r#"
            SELECT id, email, code, created_at, expires_at, used
            FROM otp_codes
            WHERE email = $1 AND code = $2 AND used = false AND expires_at > now()
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(email)
        .bind(code)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    /// Most recent row for this email+code regardless of state. Used to
    /// tell "already used" and "expired" apart from a plain wrong code.
    pub async fn find_latest(
        db: &PgPool,
        email: &str,
        code: &str,
    ) -> anyhow::Result<Option<OtpCode>> {
        let row = sqlx::query_as::<_, OtpCode>(
            r#"
            SELECT id, email, code, created_at, expires_at, used
            FROM otp_codes
            WHERE email = $1 AND code = $2
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(email)
        .bind(code)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    /// Flip `used` exactly once. The `used = false` guard makes two
    /// concurrent verifications race safely: only one sees a row.
    pub async fn consume(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let updated = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE otp_codes
            SET used = true
            WHERE id = $1 AND used = false
            RETURNING id
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(updated.is_some())
    }
}
