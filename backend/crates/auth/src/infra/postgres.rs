//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{Account, NewAccount, Session};
use crate::domain::repository::{AccountRepository, SessionRepository};
use crate::domain::value_object::{AccountId, AccountName, Authority};
use crate::error::AuthResult;

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Account Repository Implementation
// ============================================================================

impl AccountRepository for PgAuthRepository {
    async fn create_account(&self, account: &NewAccount) -> AuthResult<AccountId> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO accounts (account_name, passhash)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(account.account_name.as_str())
        .bind(&account.passhash)
        .fetch_one(&self.pool)
        .await?;

        Ok(AccountId::new(id))
    }

    async fn find_account(&self, account_id: AccountId) -> AuthResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, account_name, passhash, authority, del_flg, created_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(account_id.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AccountRow::into_account))
    }

    async fn find_active_by_name(&self, account_name: &AccountName) -> AuthResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, account_name, passhash, authority, del_flg, created_at
            FROM accounts
            WHERE account_name = $1 AND del_flg = FALSE
            "#,
        )
        .bind(account_name.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AccountRow::into_account))
    }

    async fn exists_by_name(&self, account_name: &AccountName) -> AuthResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM accounts WHERE account_name = $1)",
        )
        .bind(account_name.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn list_active_ordinary(&self) -> AuthResult<Vec<Account>> {
        let rows = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, account_name, passhash, authority, del_flg, created_at
            FROM accounts
            WHERE authority = 0 AND del_flg = FALSE
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(AccountRow::into_account).collect())
    }

    async fn ban_account(&self, account_id: AccountId) -> AuthResult<bool> {
        let updated = sqlx::query("UPDATE accounts SET del_flg = TRUE WHERE id = $1")
            .bind(account_id.get())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(updated > 0)
    }
}

// ============================================================================
// Session Repository Implementation
// ============================================================================

impl SessionRepository for PgAuthRepository {
    async fn create_session(&self, session: &Session) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO sessions (
                session_id,
                account_id,
                csrf_token,
                notice,
                expires_at_ms,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(session.session_id)
        .bind(session.account_id.map(|id| id.get()))
        .bind(&session.csrf_token)
        .bind(&session.notice)
        .bind(session.expires_at_ms)
        .bind(session.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_session(&self, session_id: Uuid) -> AuthResult<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT session_id, account_id, csrf_token, notice, expires_at_ms, created_at
            FROM sessions
            WHERE session_id = $1
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SessionRow::into_session))
    }

    async fn delete_session(&self, session_id: Uuid) -> AuthResult<()> {
        sqlx::query("DELETE FROM sessions WHERE session_id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn set_notice(&self, session_id: Uuid, notice: &str) -> AuthResult<()> {
        sqlx::query("UPDATE sessions SET notice = $2 WHERE session_id = $1")
            .bind(session_id)
            .bind(notice)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn take_notice(&self, session_id: Uuid) -> AuthResult<Option<String>> {
        // Read and clear in one statement so a notice is shown at most once
        let notice = sqlx::query_scalar::<_, Option<String>>(
            r#"
            WITH old AS (
                SELECT session_id, notice
                FROM sessions
                WHERE session_id = $1
                FOR UPDATE
            )
            UPDATE sessions s
            SET notice = NULL
            FROM old
            WHERE s.session_id = old.session_id
              AND old.notice IS NOT NULL
            RETURNING old.notice
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(notice.flatten())
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        let now_ms = Utc::now().timestamp_millis();

        let deleted = sqlx::query("DELETE FROM sessions WHERE expires_at_ms < $1")
            .bind(now_ms)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(sessions_deleted = deleted, "Cleaned up expired sessions");

        Ok(deleted)
    }
}

// ============================================================================
// Database Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: i64,
    account_name: String,
    passhash: String,
    authority: i16,
    del_flg: bool,
    created_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self) -> Account {
        Account {
            id: AccountId::new(self.id),
            account_name: AccountName::from_stored(self.account_name),
            passhash: self.passhash,
            authority: Authority::from_level(self.authority),
            del_flg: self.del_flg,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    session_id: Uuid,
    account_id: Option<i64>,
    csrf_token: Option<String>,
    notice: Option<String>,
    expires_at_ms: i64,
    created_at: DateTime<Utc>,
}

impl SessionRow {
    fn into_session(self) -> Session {
        Session {
            session_id: self.session_id,
            account_id: self.account_id.map(AccountId::new),
            csrf_token: self.csrf_token,
            notice: self.notice,
            expires_at_ms: self.expires_at_ms,
            created_at: self.created_at,
        }
    }
}
