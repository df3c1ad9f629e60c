//! Joint models for the API service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A WGS84 point in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Joint entity
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Joint {
    pub id: Uuid,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Metres from the search centre, only set by proximity queries
    #[sqlx(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    pub description: Option<String>,
    pub is_approved: bool,
    pub creator_id: Uuid,
    pub photo_url: Option<String>,
    pub upvotes: i32,
    pub downvotes: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New joint creation payload
#[derive(Debug, Clone)]
pub struct NewJoint {
    pub name: String,
    pub location: Coordinate,
    pub description: Option<String>,
    pub creator_id: Uuid,
    pub photo_url: Option<String>,
}

/// Owner-editable fields of a joint, fully resolved
#[derive(Debug, Clone)]
pub struct JointChanges {
    pub name: String,
    pub location: Coordinate,
    pub description: Option<String>,
}

/// Request for joint creation
#[derive(Debug, Deserialize)]
pub struct CreateJointRequest {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub description: Option<String>,
}

/// Request for a partial joint update
#[derive(Debug, Default, Deserialize)]
pub struct UpdateJointRequest {
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Absent keeps the description, `null` clears it
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
}

/// Mark a field as present even when its value is `null`
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl UpdateJointRequest {
    /// Overlay the requested changes on the current state of `joint`
    pub fn apply_to(self, joint: &Joint) -> JointChanges {
        JointChanges {
            name: self.name.unwrap_or_else(|| joint.name.clone()),
            location: Coordinate {
                latitude: self.latitude.unwrap_or(joint.latitude),
                longitude: self.longitude.unwrap_or(joint.longitude),
            },
            description: self
                .description
                .unwrap_or_else(|| joint.description.clone()),
        }
    }
}

/// Request to approve or withdraw a joint
#[derive(Debug, Deserialize)]
pub struct ApprovalRequest {
    pub approved: bool,
}

/// Query parameters for text search
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub page: Option<u32>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<u32>,
}

/// Query parameters for proximity search
#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Radius in metres
    pub radius: Option<f64>,
    pub page: Option<u32>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<u32>,
}
