//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use platform::password::HashedPassword;
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::domain::entity::{session::Session, user::User};
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::{SessionId, UserId, flash::Flash, login::Login};
use crate::error::{GatewayError, GatewayResult};

/// PostgreSQL-backed gateway repository
#[derive(Clone)]
pub struct PgGatewayRepository {
    pool: PgPool,
}

impl PgGatewayRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

const USER_COLUMNS: &str = r#"
    user_id,
    login,
    name,
    password_hash,
    active,
    remember_token_digest,
    remember_token_expires_at,
    last_login_at,
    last_logout_at,
    created_at,
    updated_at
"#;

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgGatewayRepository {
    async fn create(&self, user: &User) -> GatewayResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                login,
                name,
                password_hash,
                active,
                remember_token_digest,
                remember_token_expires_at,
                last_login_at,
                last_logout_at,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.login.as_str())
        .bind(&user.name)
        .bind(user.password_hash.as_phc_string())
        .bind(user.active)
        .bind(user.remember_token_digest.as_deref())
        .bind(user.remember_token_expires_at)
        .bind(user.last_login_at)
        .bind(user.last_logout_at)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                GatewayError::LoginTaken
            } else {
                GatewayError::Database(e)
            }
        })?;

        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> GatewayResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"
        ))
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_by_login(&self, login: &Login) -> GatewayResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE login = $1"
        ))
        .bind(login.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_by_remember_digest(&self, digest: &[u8]) -> GatewayResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE remember_token_digest = $1"
        ))
        .bind(digest)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn update(&self, user: &User) -> GatewayResult<()> {
        sqlx::query(
            r#"
            UPDATE users SET
                name = $2,
                password_hash = $3,
                active = $4,
                remember_token_digest = $5,
                remember_token_expires_at = $6,
                last_login_at = $7,
                last_logout_at = $8,
                updated_at = $9
            WHERE user_id = $1
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(&user.name)
        .bind(user.password_hash.as_phc_string())
        .bind(user.active)
        .bind(user.remember_token_digest.as_deref())
        .bind(user.remember_token_expires_at)
        .bind(user.last_login_at)
        .bind(user.last_logout_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Session Repository Implementation
// ============================================================================

impl SessionRepository for PgGatewayRepository {
    async fn find_session(&self, session_id: &SessionId) -> GatewayResult<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT
                session_id,
                principal,
                return_to,
                flash,
                created_at,
                updated_at,
                expires_at
            FROM sessions
            WHERE session_id = $1 AND expires_at > NOW()
            "#,
        )
        .bind(session_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SessionRow::into_session))
    }

    async fn save_session(&self, session: &Session) -> GatewayResult<()> {
        let row = SessionRow::from_session(session);

        sqlx::query(
            r#"
            INSERT INTO sessions (
                session_id,
                principal,
                return_to,
                flash,
                created_at,
                updated_at,
                expires_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (session_id) DO UPDATE SET
                principal = EXCLUDED.principal,
                return_to = EXCLUDED.return_to,
                flash = EXCLUDED.flash,
                updated_at = EXCLUDED.updated_at,
                expires_at = EXCLUDED.expires_at
            "#,
        )
        .bind(row.session_id)
        .bind(row.principal)
        .bind(row.return_to)
        .bind(row.flash)
        .bind(row.created_at)
        .bind(row.updated_at)
        .bind(row.expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_session(&self, session_id: &SessionId) -> GatewayResult<()> {
        sqlx::query("DELETE FROM sessions WHERE session_id = $1")
            .bind(session_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn cleanup_expired(&self) -> GatewayResult<u64> {
        let deleted = sqlx::query("DELETE FROM sessions WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(sessions_deleted = deleted, "Cleaned up expired sessions");

        Ok(deleted)
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    login: String,
    name: String,
    password_hash: String,
    active: bool,
    remember_token_digest: Option<Vec<u8>>,
    remember_token_expires_at: Option<DateTime<Utc>>,
    last_login_at: Option<DateTime<Utc>>,
    last_logout_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> GatewayResult<User> {
        let password_hash = HashedPassword::from_phc_string(self.password_hash)
            .map_err(|e| GatewayError::Internal(format!("Invalid password hash: {}", e)))?;

        Ok(User {
            user_id: UserId::from(self.user_id),
            login: Login::from_db(self.login),
            name: self.name,
            password_hash,
            active: self.active,
            remember_token_digest: self.remember_token_digest,
            remember_token_expires_at: self.remember_token_expires_at,
            last_login_at: self.last_login_at,
            last_logout_at: self.last_logout_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    session_id: Uuid,
    principal: Option<Uuid>,
    return_to: Option<String>,
    flash: Json<Flash>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl SessionRow {
    fn from_session(session: &Session) -> Self {
        Self {
            session_id: session.session_id.into_uuid(),
            principal: session.principal().map(UserId::into_uuid),
            return_to: session.return_to().map(str::to_string),
            flash: Json(session.flash().carried()),
            created_at: session.created_at,
            updated_at: session.updated_at,
            expires_at: session.expires_at,
        }
    }

    fn into_session(self) -> Session {
        Session::from_stored(
            SessionId::from(self.session_id),
            self.principal.map(UserId::from),
            self.return_to,
            self.flash.0,
            self.created_at,
            self.updated_at,
            self.expires_at,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::flash::{FlashMessage, FlashSlot};

    #[test]
    fn test_session_row_round_trip() {
        let mut session = Session::new(chrono::Duration::hours(1));
        let user_id = UserId::new();
        session.bind_principal(user_id);
        session.store_location("/account");
        session
            .flash_mut()
            .set(FlashSlot::Notice, FlashMessage::LoggedIn);

        let row = SessionRow::from_session(&session);
        assert_eq!(row.principal, Some(user_id.into_uuid()));
        assert_eq!(row.return_to.as_deref(), Some("/account"));

        let restored = row.into_session();
        assert_eq!(restored.session_id, session.session_id);
        assert_eq!(restored.principal(), Some(user_id));
        assert_eq!(restored.return_to(), Some("/account"));
        assert_eq!(
            restored.flash().pending(FlashSlot::Notice),
            Some(FlashMessage::LoggedIn)
        );
    }
}
