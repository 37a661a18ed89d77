use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::enums::{EmployeeStatus, Gender};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: String,
    pub salary: f64,
    pub position: String,
    pub status: EmployeeStatus,
    pub gender: Option<Gender>,
    pub office_id: Option<Uuid>,
    pub registered_at: DateTime<Utc>,
}

/// List projection for `/employee/all`.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSummary {
    pub id: Uuid,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: String,
    pub position: String,
    pub status: EmployeeStatus,
    pub salary: f64,
    pub office_id: Option<Uuid>,
    pub registered_at: DateTime<Utc>,
}
