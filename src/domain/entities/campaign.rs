use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use super::record_fields::{RecordFields, strip_reserved};

pub const DEFAULT_CAMPAIGN_STATUS: &str = "draft";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    #[serde(flatten)]
    pub fields: RecordFields,
    pub created_at: DateTime<Utc>,
}

impl Campaign {
    /// A string `status` in the body is kept; anything else falls back to `draft`.
    pub fn new(owner: Uuid, fields: RecordFields) -> Self {
        let mut fields = strip_reserved(fields);
        let status = match fields.remove("status") {
            Some(Value::String(status)) if !status.trim().is_empty() => status,
            _ => DEFAULT_CAMPAIGN_STATUS.to_string(),
        };
        Self {
            id: Uuid::new_v4(),
            user_id: owner,
            status,
            fields,
            created_at: Utc::now(),
        }
    }
}
