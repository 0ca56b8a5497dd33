use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    app_error::AppResult,
    domain::entities::{campaign::Campaign, record_fields::RecordFields},
};

#[async_trait]
pub trait CampaignRepo: Send + Sync {
    async fn insert_campaign(&self, campaign: Campaign) -> AppResult<Campaign>;
    /// Campaigns owned by `owner`, in insertion order.
    async fn list_campaigns_for_user(&self, owner: Uuid) -> AppResult<Vec<Campaign>>;
    async fn count_campaigns(&self) -> AppResult<u64>;
}

#[derive(Clone)]
pub struct CampaignUseCases {
    repo: Arc<dyn CampaignRepo>,
}

impl CampaignUseCases {
    pub fn new(repo: Arc<dyn CampaignRepo>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self, fields))]
    pub async fn create(&self, owner: Uuid, fields: RecordFields) -> AppResult<Campaign> {
        self.repo.insert_campaign(Campaign::new(owner, fields)).await
    }

    pub async fn list(&self, owner: Uuid) -> AppResult<Vec<Campaign>> {
        self.repo.list_campaigns_for_user(owner).await
    }

    pub async fn count(&self) -> AppResult<u64> {
        self.repo.count_campaigns().await
    }
}
