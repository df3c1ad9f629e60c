//! Complaint model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "complaint_status", rename_all = "lowercase")]
pub enum ComplaintStatus {
    Open,
    Resolved,
}

/// Complaint entity
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    pub id: Uuid,
    pub joint_id: Uuid,
    pub user_id: Uuid,
    pub reason: String,
    pub status: ComplaintStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request for filing a complaint against a joint
#[derive(Debug, Deserialize)]
pub struct CreateComplaintRequest {
    pub reason: String,
}
