use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// Lifecycle of a waitlist signup. New entries start as `Pending`;
/// later states are set out-of-band by operators.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, sqlx::Type,
)]
#[sqlx(type_name = "waitlist_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WaitlistStatus {
    #[default]
    Pending,
    Contacted,
    Converted,
}

pub const DEFAULT_WAITLIST_SOURCE: &str = "website";

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistEntry {
    pub id: Uuid,
    pub email: String,
    pub source: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub status: WaitlistStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What public waitlist routes return. Client details (IP, user agent,
/// metadata) stay server-side.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistSignup {
    pub id: Uuid,
    pub email: String,
    pub source: String,
    pub status: WaitlistStatus,
    pub created_at: DateTime<Utc>,
}

impl From<WaitlistEntry> for WaitlistSignup {
    fn from(entry: WaitlistEntry) -> Self {
        Self {
            id: entry.id,
            email: entry.email,
            source: entry.source,
            status: entry.status,
            created_at: entry.created_at,
        }
    }
}

/// Validated signup, ready to be stored.
#[derive(Debug, Clone)]
pub struct NewWaitlistEntry {
    pub email: String,
    pub source: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

impl NewWaitlistEntry {
    pub fn into_entry(self) -> WaitlistEntry {
        let now = Utc::now();
        WaitlistEntry {
            id: Uuid::new_v4(),
            email: self.email,
            source: self.source,
            ip_address: self.ip_address,
            user_agent: self.user_agent,
            metadata: self.metadata,
            status: WaitlistStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}
