use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::enums::{LandStatus, OwnershipType};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Land {
    pub id: Uuid,
    pub land_owner_id: Option<Uuid>,
    /// Owner full name, denormalized at registration/transfer time.
    pub name: Option<String>,
    pub area: f64,
    #[serde(rename = "type")]
    #[sqlx(rename = "land_type")]
    pub land_type: Option<String>,
    pub grade: Option<i32>,
    pub registration_no: Option<i64>,
    pub parcel_id: Option<String>,
    pub certification_no: Option<String>,
    pub wereda: String,
    pub subcity: Option<String>,
    pub absolute_location: Option<String>,
    pub map_url: Option<String>,
    pub comment: Option<String>,
    pub land_use_purpose: Option<String>,
    pub market_value: Option<f64>,
    pub encumbrances: Option<String>,
    pub land_status: LandStatus,
    pub ownership_type: OwnershipType,
    pub registered_by: Uuid,
    pub office_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// List projection for `/land/all`.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LandSummary {
    pub id: Uuid,
    pub name: Option<String>,
    pub area: f64,
    #[serde(rename = "type")]
    #[sqlx(rename = "land_type")]
    pub land_type: Option<String>,
    pub wereda: String,
    pub land_owner_id: Option<Uuid>,
}

/// Append-only provenance entry for ownership changes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LandTransfer {
    pub id: Uuid,
    pub land_id: Uuid,
    pub land_owner_id: Uuid,
    pub transferred_by: Uuid,
    pub transfer_date: DateTime<Utc>,
}

/// Transfer-history row joined with the receiving owner's names.
#[derive(Debug, Clone, FromRow)]
pub struct TransferHistoryRow {
    pub id: Uuid,
    pub transfer_date: DateTime<Utc>,
    pub land_owner_id: Uuid,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
}

/// Owner-side history row joined with a land summary.
#[derive(Debug, Clone, FromRow)]
pub struct OwnerLandHistoryRow {
    pub id: Uuid,
    pub transfer_date: DateTime<Utc>,
    pub land_id: Uuid,
    pub area: f64,
    pub land_type: Option<String>,
    pub certification_no: Option<String>,
    pub subcity: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LandFile {
    pub id: Uuid,
    pub land_id: Uuid,
    pub office_id: Option<Uuid>,
    pub file_path: String,
    pub file_url: String,
    pub file_name: String,
    pub file_type: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LandTransferFile {
    pub id: Uuid,
    pub land_transfer_id: Uuid,
    pub office_id: Option<Uuid>,
    pub file_path: String,
    pub file_url: String,
    pub file_name: String,
    pub file_type: String,
    pub uploaded_at: DateTime<Utc>,
}
