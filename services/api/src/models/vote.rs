//! Vote models and counter arithmetic

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::Joint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "vote_direction", rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

/// One row of the vote ledger
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub id: Uuid,
    pub user_id: Uuid,
    pub joint_id: Uuid,
    pub direction: VoteDirection,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A voter on a joint, joined with their username
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JointVoter {
    pub user_id: Uuid,
    pub username: String,
    pub joint_id: Uuid,
    pub direction: VoteDirection,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for casting a vote
#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub direction: VoteDirection,
}

/// Result of applying a vote
#[derive(Debug, Clone)]
pub enum VoteOutcome {
    /// The ledger and counters changed; carries the joint after the update
    Applied(Joint),
    /// The user already voted this way, nothing was written
    Unchanged,
}

/// Change to a joint's counters caused by one vote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterDelta {
    pub upvotes: i32,
    pub downvotes: i32,
}

impl CounterDelta {
    /// Counter change for moving a user's vote from `previous` to `requested`
    ///
    /// Returns `None` when the vote is already in the requested direction.
    pub fn between(previous: Option<VoteDirection>, requested: VoteDirection) -> Option<Self> {
        use VoteDirection::{Down, Up};

        match (previous, requested) {
            (Some(Up), Up) | (Some(Down), Down) => None,
            (None, Up) => Some(Self {
                upvotes: 1,
                downvotes: 0,
            }),
            (None, Down) => Some(Self {
                upvotes: 0,
                downvotes: 1,
            }),
            (Some(Down), Up) => Some(Self {
                upvotes: 1,
                downvotes: -1,
            }),
            (Some(Up), Down) => Some(Self {
                upvotes: -1,
                downvotes: 1,
            }),
        }
    }
}
