//! Process-local stores. Contents are lost when the process exits.

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    domain::entities::{
        campaign::Campaign,
        contact::Contact,
        user::User,
        waitlist::{NewWaitlistEntry, WaitlistEntry, WaitlistStatus},
    },
    use_cases::{
        auth::UserRepo, campaign::CampaignRepo, contact::ContactRepo, waitlist::WaitlistRepo,
    },
};

fn poisoned<T>(_: PoisonError<T>) -> AppError {
    AppError::Internal("in-memory store lock poisoned".into())
}

/// Users, contacts and campaigns held in plain vectors.
/// Locks are only held for the synchronous append or scan.
#[derive(Default)]
pub struct InMemoryStore {
    users: RwLock<Vec<User>>,
    contacts: RwLock<Vec<Contact>>,
    campaigns: RwLock<Vec<Campaign>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepo for InMemoryStore {
    async fn insert(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().map_err(poisoned)?;
        // Re-checked under the write lock so two racing registrations cannot both win.
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("User already exists".into()));
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.users.read().map_err(poisoned)?.len() as u64)
    }
}

#[async_trait]
impl ContactRepo for InMemoryStore {
    async fn insert_contact(&self, contact: Contact) -> AppResult<Contact> {
        self.contacts
            .write()
            .map_err(poisoned)?
            .push(contact.clone());
        Ok(contact)
    }

    async fn list_contacts_for_user(&self, owner: Uuid) -> AppResult<Vec<Contact>> {
        let contacts = self.contacts.read().map_err(poisoned)?;
        Ok(contacts
            .iter()
            .filter(|c| c.user_id == owner)
            .cloned()
            .collect())
    }

    async fn count_contacts(&self) -> AppResult<u64> {
        Ok(self.contacts.read().map_err(poisoned)?.len() as u64)
    }
}

#[async_trait]
impl CampaignRepo for InMemoryStore {
    async fn insert_campaign(&self, campaign: Campaign) -> AppResult<Campaign> {
        self.campaigns
            .write()
            .map_err(poisoned)?
            .push(campaign.clone());
        Ok(campaign)
    }

    async fn list_campaigns_for_user(&self, owner: Uuid) -> AppResult<Vec<Campaign>> {
        let campaigns = self.campaigns.read().map_err(poisoned)?;
        Ok(campaigns
            .iter()
            .filter(|c| c.user_id == owner)
            .cloned()
            .collect())
    }

    async fn count_campaigns(&self) -> AppResult<u64> {
        Ok(self.campaigns.read().map_err(poisoned)?.len() as u64)
    }
}

/// Waitlist stand-in used when no `DATABASE_URL` is configured.
#[derive(Default)]
pub struct InMemoryWaitlistRepo {
    entries: RwLock<Vec<WaitlistEntry>>,
}

impl InMemoryWaitlistRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WaitlistRepo for InMemoryWaitlistRepo {
    async fn insert(&self, entry: NewWaitlistEntry) -> AppResult<WaitlistEntry> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        if entries.iter().any(|e| e.email == entry.email) {
            return Err(AppError::Conflict("Email is already on the waitlist".into()));
        }
        let entry = entry.into_entry();
        entries.push(entry.clone());
        Ok(entry)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<WaitlistEntry>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.iter().find(|e| e.email == email).cloned())
    }

    async fn update_status(
        &self,
        email: &str,
        status: WaitlistStatus,
    ) -> AppResult<Option<WaitlistEntry>> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        Ok(entries.iter_mut().find(|e| e.email == email).map(|e| {
            e.status = status;
            e.updated_at = Utc::now();
            e.clone()
        }))
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.entries.read().map_err(poisoned)?.len() as u64)
    }
}
