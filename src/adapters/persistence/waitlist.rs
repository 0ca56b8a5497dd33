use async_trait::async_trait;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    domain::entities::waitlist::{NewWaitlistEntry, WaitlistEntry, WaitlistStatus},
    use_cases::waitlist::WaitlistRepo,
};

const WAITLIST_COLUMNS: &str =
    "id, email, source, ip_address, user_agent, metadata, status, created_at, updated_at";

#[async_trait]
impl WaitlistRepo for PostgresPersistence {
    async fn insert(&self, entry: NewWaitlistEntry) -> AppResult<WaitlistEntry> {
        let entry = entry.into_entry();
        let rec = sqlx::query_as::<_, WaitlistEntry>(&format!(
            r#"INSERT INTO waitlist (id, email, source, ip_address, user_agent, metadata, status, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
               RETURNING {WAITLIST_COLUMNS}"#
        ))
        .bind(entry.id)
        .bind(&entry.email)
        .bind(&entry.source)
        .bind(&entry.ip_address)
        .bind(&entry.user_agent)
        .bind(&entry.metadata)
        .bind(entry.status)
        .bind(entry.created_at)
        .bind(entry.updated_at)
        .fetch_one(self.pool())
        .await
        .map_err(|err| match AppError::from(err) {
            AppError::Conflict(_) => AppError::Conflict("Email is already on the waitlist".into()),
            other => other,
        })?;

        Ok(rec)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<WaitlistEntry>> {
        let rec = sqlx::query_as::<_, WaitlistEntry>(&format!(
            "SELECT {WAITLIST_COLUMNS} FROM waitlist WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool())
        .await?;

        Ok(rec)
    }

    async fn update_status(
        &self,
        email: &str,
        status: WaitlistStatus,
    ) -> AppResult<Option<WaitlistEntry>> {
        let rec = sqlx::query_as::<_, WaitlistEntry>(&format!(
            r#"UPDATE waitlist SET status = $2, updated_at = NOW()
               WHERE email = $1
               RETURNING {WAITLIST_COLUMNS}"#
        ))
        .bind(email)
        .bind(status)
        .fetch_optional(self.pool())
        .await?;

        Ok(rec)
    }

    async fn count(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM waitlist")
            .fetch_one(self.pool())
            .await?;

        Ok(u64::try_from(count).unwrap_or_default())
    }
}
