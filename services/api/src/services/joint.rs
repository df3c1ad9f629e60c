//! Joint lifecycle: creation, lookup, listing, editing and moderation

use tracing::info;
use uuid::Uuid;

use super::{ServiceError, ServiceResult, not_found_as};
use crate::{
    models::{
        AuthUser, Coordinate, CreateJointRequest, Joint, JointChanges, JointVoter, NewJoint, Page,
    },
    repositories::{JointRepository, VoteRepository},
};

#[derive(Clone)]
pub struct JointService {
    joints: JointRepository,
    votes: VoteRepository,
}

impl JointService {
    pub fn new(joints: JointRepository, votes: VoteRepository) -> Self {
        Self { joints, votes }
    }

    /// Submit a joint on behalf of `creator`; it starts unapproved
    pub async fn create(
        &self,
        creator: &AuthUser,
        request: CreateJointRequest,
    ) -> ServiceResult<Joint> {
        let new_joint = NewJoint {
            name: request.name.trim().to_string(),
            location: Coordinate {
                latitude: request.latitude,
                longitude: request.longitude,
            },
            description: request.description,
            creator_id: creator.id,
            photo_url: None,
        };

        let joint = self.joints.create(&new_joint).await?;
        info!("Joint {} created by {}", joint.id, creator.id);
        Ok(joint)
    }

    pub async fn get(&self, id: Uuid) -> ServiceResult<Joint> {
        self.joints
            .get_by_id(id)
            .await?
            .ok_or(ServiceError::JointNotFound)
    }

    pub async fn list(&self, page: Page) -> ServiceResult<Vec<Joint>> {
        Ok(self.joints.list_approved(page).await?)
    }

    pub async fn search(&self, term: &str, page: Page) -> ServiceResult<Vec<Joint>> {
        Ok(self.joints.search(term.trim(), page).await?)
    }

    pub async fn update(&self, id: Uuid, changes: &JointChanges) -> ServiceResult<Joint> {
        let joint = self
            .joints
            .update(id, changes)
            .await
            .map_err(not_found_as(ServiceError::JointNotFound))?;

        info!("Joint {} updated", id);
        Ok(joint)
    }

    pub async fn set_approval(&self, id: Uuid, approved: bool) -> ServiceResult<Joint> {
        let joint = self
            .joints
            .set_approval(id, approved)
            .await
            .map_err(not_found_as(ServiceError::JointNotFound))?;

        info!("Joint {} approval set to {}", id, approved);
        Ok(joint)
    }

    pub async fn delete(&self, id: Uuid) -> ServiceResult<()> {
        if !self.joints.delete(id).await? {
            return Err(ServiceError::JointNotFound);
        }

        info!("Joint {} deleted", id);
        Ok(())
    }

    /// Users who voted on a joint, with their current direction
    pub async fn voters(&self, id: Uuid, page: Page) -> ServiceResult<Vec<JointVoter>> {
        self.get(id).await?;
        Ok(self.votes.voters_for_joint(id, page).await?)
    }
}
