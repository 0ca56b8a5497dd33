use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    app_error::AppResult,
    domain::entities::{contact::Contact, record_fields::RecordFields},
};

#[async_trait]
pub trait ContactRepo: Send + Sync {
    async fn insert_contact(&self, contact: Contact) -> AppResult<Contact>;
    /// Contacts owned by `owner`, in insertion order.
    async fn list_contacts_for_user(&self, owner: Uuid) -> AppResult<Vec<Contact>>;
    async fn count_contacts(&self) -> AppResult<u64>;
}

#[derive(Clone)]
pub struct ContactUseCases {
    repo: Arc<dyn ContactRepo>,
}

impl ContactUseCases {
    pub fn new(repo: Arc<dyn ContactRepo>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self, fields))]
    pub async fn create(&self, owner: Uuid, fields: RecordFields) -> AppResult<Contact> {
        self.repo.insert_contact(Contact::new(owner, fields)).await
    }

    pub async fn list(&self, owner: Uuid) -> AppResult<Vec<Contact>> {
        self.repo.list_contacts_for_user(owner).await
    }

    pub async fn count(&self) -> AppResult<u64> {
        self.repo.count_contacts().await
    }
}
