//! Complaints filed against joints and their resolution

use common::error::DatabaseError;
use tracing::info;
use uuid::Uuid;

use super::{ServiceError, ServiceResult};
use crate::{
    models::{Complaint, Page},
    repositories::{ComplaintRepository, JointRepository},
};

#[derive(Clone)]
pub struct ComplaintService {
    complaints: ComplaintRepository,
    joints: JointRepository,
}

impl ComplaintService {
    pub fn new(complaints: ComplaintRepository, joints: JointRepository) -> Self {
        Self { complaints, joints }
    }

    async fn ensure_joint(&self, joint_id: Uuid) -> ServiceResult<()> {
        match self.joints.get_by_id(joint_id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::JointNotFound),
        }
    }

    /// File an open complaint by `user_id` against `joint_id`
    pub async fn file(
        &self,
        user_id: Uuid,
        joint_id: Uuid,
        reason: &str,
    ) -> ServiceResult<Complaint> {
        self.ensure_joint(joint_id).await?;

        let complaint = self
            .complaints
            .create(joint_id, user_id, reason.trim())
            .await?;

        info!(
            "Complaint {} filed by {} against joint {}",
            complaint.id, user_id, joint_id
        );
        Ok(complaint)
    }

    pub async fn get(&self, id: Uuid) -> ServiceResult<Complaint> {
        self.complaints
            .get_by_id(id)
            .await?
            .ok_or(ServiceError::ComplaintNotFound)
    }

    pub async fn list_all(&self, page: Page) -> ServiceResult<Vec<Complaint>> {
        Ok(self.complaints.list(None, None, page).await?)
    }

    /// Complaints filed by one user
    pub async fn list_by_user(&self, user_id: Uuid, page: Page) -> ServiceResult<Vec<Complaint>> {
        Ok(self.complaints.list(None, Some(user_id), page).await?)
    }

    /// Complaints against one joint, optionally narrowed to one author
    pub async fn list_by_joint(
        &self,
        joint_id: Uuid,
        author: Option<Uuid>,
        page: Page,
    ) -> ServiceResult<Vec<Complaint>> {
        self.ensure_joint(joint_id).await?;
        Ok(self.complaints.list(Some(joint_id), author, page).await?)
    }

    /// Move an open complaint to resolved
    pub async fn resolve(&self, id: Uuid, moderator_id: Uuid) -> ServiceResult<Complaint> {
        if let Some(complaint) = self.complaints.resolve(id).await? {
            info!("Complaint {} resolved by {}", id, moderator_id);
            return Ok(complaint);
        }

        match self.complaints.get_by_id(id).await {
            Ok(Some(_)) => Err(ServiceError::ComplaintAlreadyResolved),
            Ok(None) | Err(DatabaseError::NotFound) => Err(ServiceError::ComplaintNotFound),
            Err(other) => Err(other.into()),
        }
    }
}
