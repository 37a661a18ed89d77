use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::enums::AnnouncementStatus;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub number: i64,
    pub stamp_file: Option<String>,
    pub signature_file: Option<String>,
    pub status: AnnouncementStatus,
    pub publisher_id: Uuid,
    pub auditor_id: Option<Uuid>,
    pub office_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// List projection for `/announcement/all` (description body left out).
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementSummary {
    pub id: Uuid,
    pub title: String,
    pub number: i64,
    pub status: AnnouncementStatus,
    pub office_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}
