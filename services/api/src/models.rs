//! API models for request and response payloads

use serde::{Deserialize, Serialize};

pub mod complaint;
pub mod joint;
pub mod user;
pub mod vote;

pub use complaint::{Complaint, ComplaintStatus, CreateComplaintRequest};
pub use joint::{
    ApprovalRequest, Coordinate, CreateJointRequest, Joint, JointChanges, NearbyQuery, NewJoint,
    SearchQuery, UpdateJointRequest,
};
pub use user::{AuthUser, LoginRequest, LoginResponse, NewUser, RegisterRequest, Role, User};
pub use vote::{CounterDelta, JointVoter, Vote, VoteDirection, VoteOutcome, VoteRequest};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Envelope for successful responses
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
        }
    }
}

/// Pagination query parameters
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PaginationQuery {
    /// Page number (1-based)
    pub page: Option<u32>,
    /// Number of items per page
    #[serde(rename = "pageSize")]
    pub page_size: Option<u32>,
}

/// A validated window over an ordered result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: i64,
    pub limit: i64,
}

impl Page {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            offset: i64::from(page.saturating_sub(1)) * i64::from(page_size),
            limit: i64::from(page_size),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Page::new(DEFAULT_PAGE, DEFAULT_PAGE_SIZE)
    }
}
