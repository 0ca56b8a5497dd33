use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::record_fields::{RecordFields, strip_reserved};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(flatten)]
    pub fields: RecordFields,
    pub created_at: DateTime<Utc>,
}

impl Contact {
    pub fn new(owner: Uuid, fields: RecordFields) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: owner,
            fields: strip_reserved(fields),
            created_at: Utc::now(),
        }
    }
}
