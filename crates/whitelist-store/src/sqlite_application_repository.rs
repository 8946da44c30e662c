//! SQLite implementation of the `ApplicationRepository` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{SqliteExecutor, SqlitePool};
use tracing::debug;

use whitelist_core::error::DomainError;
use whitelist_core::model::{
    Application, ApplicationProfile, ApplicationStatus, NewApplication, StatusChange,
};
use whitelist_core::repository::{ApplicationRepository, IdentifierKind};

/// Raw `applications` row.
#[derive(Debug, sqlx::FromRow)]
struct ApplicationRow {
    id: i64,
    submitter_id: i64,
    display_name: String,
    game_identifier: String,
    platform: String,
    external_account_id: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    admin_comment: Option<String>,
    decided_by: Option<i64>,
}

impl TryFrom<ApplicationRow> for Application {
    type Error = DomainError;

    fn try_from(row: ApplicationRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let corrupt = |column: &str, err: DomainError| {
            DomainError::Infrastructure(format!("row {id} has unreadable {column}: {err}"))
        };
        Ok(Self {
            id,
            submitter_id: row.submitter_id,
            platform: row.platform.parse().map_err(|e| corrupt("platform", e))?,
            status: row.status.parse().map_err(|e| corrupt("status", e))?,
            display_name: row.display_name,
            game_identifier: row.game_identifier,
            external_account_id: row.external_account_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            admin_comment: row.admin_comment,
            decided_by: row.decided_by,
        })
    }
}

fn into_application(row: Option<ApplicationRow>) -> Result<Option<Application>, DomainError> {
    row.map(Application::try_from).transpose()
}

/// Maps storage errors. A unique violation can only come from the
/// one-active-application-per-submitter index.
fn map_sqlx_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return DomainError::Conflict(
                "submitter already has an active application".to_owned(),
            );
        }
    }
    DomainError::Infrastructure(err.to_string())
}

async fn apply_status_change<'e, E>(
    executor: E,
    id: i64,
    change: &StatusChange,
) -> Result<bool, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        "UPDATE applications
         SET status = ?, admin_comment = ?, decided_by = ?, updated_at = ?
         WHERE id = ? AND status = ?",
    )
    .bind(change.status.as_str())
    .bind(change.admin_comment.as_deref())
    .bind(change.decided_by)
    .bind(change.at)
    .bind(id)
    .bind(change.expected.as_str())
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

async fn apply_profile<'e, E>(
    executor: E,
    id: i64,
    profile: &ApplicationProfile,
    at: DateTime<Utc>,
) -> Result<bool, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        "UPDATE applications
         SET display_name = ?, game_identifier = ?, platform = ?,
             external_account_id = ?, updated_at = ?
         WHERE id = ?",
    )
    .bind(&profile.display_name)
    .bind(&profile.game_identifier)
    .bind(profile.platform.as_str())
    .bind(profile.external_account_id.as_deref())
    .bind(at)
    .bind(id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// SQLite-backed application repository.
#[derive(Debug, Clone)]
pub struct SqliteApplicationRepository {
    pool: SqlitePool,
}

impl SqliteApplicationRepository {
    /// Creates a new `SqliteApplicationRepository`.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch_one_where(
        &self,
        sql: &str,
        value: &str,
    ) -> Result<Option<Application>, DomainError> {
        let row = sqlx::query_as::<_, ApplicationRow>(sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        into_application(row)
    }
}

#[async_trait]
impl ApplicationRepository for SqliteApplicationRepository {
    async fn create(&self, application: &NewApplication) -> Result<i64, DomainError> {
        let profile = &application.profile;
        profile.ensure_required()?;
        let result = sqlx::query(
            "INSERT INTO applications
                (submitter_id, display_name, game_identifier, platform,
                 external_account_id, status, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, 'pending', ?, ?)",
        )
        .bind(application.submitter_id)
        .bind(&profile.display_name)
        .bind(&profile.game_identifier)
        .bind(profile.platform.as_str())
        .bind(profile.external_account_id.as_deref())
        .bind(application.created_at)
        .bind(application.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let id = result.last_insert_rowid();
        debug!(id, submitter_id = application.submitter_id, "application row inserted");
        Ok(id)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Application>, DomainError> {
        let row = sqlx::query_as::<_, ApplicationRow>("SELECT * FROM applications WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        into_application(row)
    }

    async fn get_latest_by_submitter(
        &self,
        submitter_id: i64,
    ) -> Result<Option<Application>, DomainError> {
        let row = sqlx::query_as::<_, ApplicationRow>(
            "SELECT * FROM applications WHERE submitter_id = ? ORDER BY id DESC LIMIT 1",
        )
        .bind(submitter_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        into_application(row)
    }

    async fn find_by_game_identifier(
        &self,
        game_identifier: &str,
    ) -> Result<Option<Application>, DomainError> {
        self.fetch_one_where(
            "SELECT * FROM applications WHERE game_identifier = ? ORDER BY id DESC LIMIT 1",
            game_identifier,
        )
        .await
    }

    async fn find_by_external_account_id(
        &self,
        external_account_id: &str,
    ) -> Result<Option<Application>, DomainError> {
        self.fetch_one_where(
            "SELECT * FROM applications WHERE external_account_id = ? ORDER BY id DESC LIMIT 1",
            external_account_id,
        )
        .await
    }

    async fn has_approved(&self, kind: IdentifierKind, value: &str) -> Result<bool, DomainError> {
        let sql = match kind {
            IdentifierKind::GameIdentifier => {
                "SELECT COUNT(*) FROM applications WHERE status = 'approved' AND game_identifier = ?"
            }
            IdentifierKind::ExternalAccountId => {
                "SELECT COUNT(*) FROM applications WHERE status = 'approved' AND external_account_id = ?"
            }
        };
        let count: i64 = sqlx::query_scalar(sql)
            .bind(value)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(count > 0)
    }

    async fn list_approved_game_identifiers(&self) -> Result<Vec<String>, DomainError> {
        sqlx::query_scalar(
            "SELECT DISTINCT game_identifier FROM applications
             WHERE status = 'approved' AND game_identifier <> ''
             ORDER BY game_identifier ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }

    async fn list_by_status(
        &self,
        status: Option<ApplicationStatus>,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Application>, DomainError> {
        let rows = match status {
            Some(status) => {
                sqlx::query_as::<_, ApplicationRow>(
                    "SELECT * FROM applications WHERE status = ? ORDER BY id DESC LIMIT ? OFFSET ?",
                )
                .bind(status.as_str())
                .bind(i64::from(limit))
                .bind(i64::from(offset))
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, ApplicationRow>(
                    "SELECT * FROM applications ORDER BY id DESC LIMIT ? OFFSET ?",
                )
                .bind(i64::from(limit))
                .bind(i64::from(offset))
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(Application::try_from).collect()
    }

    async fn update_fields(
        &self,
        id: i64,
        profile: &ApplicationProfile,
        at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        profile.ensure_required()?;
        apply_profile(&self.pool, id, profile, at)
            .await
            .map_err(map_sqlx_error)
    }

    async fn update_status(&self, id: i64, change: &StatusChange) -> Result<bool, DomainError> {
        apply_status_change(&self.pool, id, change)
            .await
            .map_err(map_sqlx_error)
    }

    async fn resubmit(
        &self,
        id: i64,
        expected: ApplicationStatus,
        profile: &ApplicationProfile,
        at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        profile.ensure_required()?;
        let change = StatusChange {
            expected,
            status: ApplicationStatus::Pending,
            admin_comment: None,
            decided_by: None,
            at,
        };

        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        if !apply_status_change(&mut *tx, id, &change)
            .await
            .map_err(map_sqlx_error)?
        {
            tx.rollback().await.map_err(map_sqlx_error)?;
            return Ok(false);
        }
        apply_profile(&mut *tx, id, profile, at)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(true)
    }
}
