use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use crate::{
    app_error::{AppError, AppResult},
    application::validators::{is_valid_email, is_valid_source_tag, normalize_email},
    domain::entities::waitlist::{
        DEFAULT_WAITLIST_SOURCE, NewWaitlistEntry, WaitlistEntry, WaitlistStatus,
    },
};

#[async_trait]
pub trait WaitlistRepo: Send + Sync {
    /// Fails with `AppError::Conflict` when the email is already on the list.
    async fn insert(&self, entry: NewWaitlistEntry) -> AppResult<WaitlistEntry>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<WaitlistEntry>>;
    async fn update_status(
        &self,
        email: &str,
        status: WaitlistStatus,
    ) -> AppResult<Option<WaitlistEntry>>;
    async fn count(&self) -> AppResult<u64>;
}

#[derive(Debug, Clone, Default)]
pub struct JoinWaitlist {
    pub email: String,
    pub source: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

#[derive(Clone)]
pub struct WaitlistUseCases {
    repo: Arc<dyn WaitlistRepo>,
}

impl WaitlistUseCases {
    pub fn new(repo: Arc<dyn WaitlistRepo>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self, request), fields(source = ?request.source))]
    pub async fn join(&self, request: JoinWaitlist) -> AppResult<WaitlistEntry> {
        if !is_valid_email(&request.email) {
            return Err(AppError::InvalidInput("A valid email is required".into()));
        }

        let source = request
            .source
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_WAITLIST_SOURCE.to_string());
        if !is_valid_source_tag(&source) {
            return Err(AppError::InvalidInput("Invalid source".into()));
        }

        let entry = self
            .repo
            .insert(NewWaitlistEntry {
                email: normalize_email(&request.email),
                source,
                ip_address: request.ip_address,
                user_agent: request.user_agent,
                metadata: request.metadata.filter(|m| !m.is_null()),
            })
            .await?;

        tracing::info!(entry_id = %entry.id, source = %entry.source, "Waitlist signup stored");
        Ok(entry)
    }

    pub async fn lookup(&self, email: &str) -> AppResult<WaitlistEntry> {
        self.repo
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or(AppError::NotFound)
    }

    /// Advance an entry's status; operators do this outside the public API.
    #[instrument(skip(self))]
    pub async fn set_status(&self, email: &str, status: WaitlistStatus) -> AppResult<WaitlistEntry> {
        self.repo
            .update_status(&normalize_email(email), status)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn count(&self) -> AppResult<u64> {
        self.repo.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryWaitlistRepo;
    use serde_json::json;

    fn use_cases() -> WaitlistUseCases {
        WaitlistUseCases::new(Arc::new(InMemoryWaitlistRepo::new()))
    }

    fn join(email: &str, source: Option<&str>) -> JoinWaitlist {
        JoinWaitlist {
            email: email.into(),
            source: source.map(str::to_string),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn new_signup_is_pending_with_submitted_source() {
        let waitlist = use_cases();
        let entry = waitlist.join(join("a@x.com", Some("hero"))).await.unwrap();

        assert_eq!(entry.status, WaitlistStatus::Pending);
        assert_eq!(entry.source, "hero");
        assert_eq!(waitlist.lookup("a@x.com").await.unwrap().id, entry.id);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let waitlist = use_cases();
        waitlist.join(join("a@x.com", Some("hero"))).await.unwrap();

        let err = waitlist
            .join(join(" A@X.com ", Some("footer")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // The first signup is untouched.
        assert_eq!(waitlist.lookup("a@x.com").await.unwrap().source, "hero");
        assert_eq!(waitlist.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn missing_source_defaults_to_website() {
        let waitlist = use_cases();
        let entry = waitlist.join(join("a@x.com", None)).await.unwrap();
        assert_eq!(entry.source, DEFAULT_WAITLIST_SOURCE);
    }

    #[tokio::test]
    async fn invalid_input_is_rejected() {
        let waitlist = use_cases();
        assert!(matches!(
            waitlist.join(join("nope", Some("hero"))).await,
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            waitlist.join(join("a@x.com", Some("Hero Banner"))).await,
            Err(AppError::InvalidInput(_))
        ));
        assert_eq!(waitlist.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn metadata_and_client_info_are_stored() {
        let waitlist = use_cases();
        let entry = waitlist
            .join(JoinWaitlist {
                email: "a@x.com".into(),
                source: Some("footer".into()),
                ip_address: Some("203.0.113.9".into()),
                user_agent: Some("Mozilla/5.0".into()),
                metadata: Some(json!({ "utm_campaign": "launch" })),
            })
            .await
            .unwrap();

        assert_eq!(entry.ip_address.as_deref(), Some("203.0.113.9"));
        assert_eq!(entry.user_agent.as_deref(), Some("Mozilla/5.0"));
        assert_eq!(entry.metadata, Some(json!({ "utm_campaign": "launch" })));
    }

    #[tokio::test]
    async fn set_status_advances_existing_entry() {
        let waitlist = use_cases();
        waitlist.join(join("a@x.com", Some("hero"))).await.unwrap();

        let updated = waitlist
            .set_status("a@x.com", WaitlistStatus::Contacted)
            .await
            .unwrap();
        assert_eq!(updated.status, WaitlistStatus::Contacted);
        assert!(updated.updated_at >= updated.created_at);

        assert!(matches!(
            waitlist.set_status("ghost@x.com", WaitlistStatus::Converted).await,
            Err(AppError::NotFound)
        ));
    }

    #[tokio::test]
    async fn lookup_unknown_email_is_not_found() {
        assert!(matches!(
            use_cases().lookup("ghost@x.com").await,
            Err(AppError::NotFound)
        ));
    }
}
