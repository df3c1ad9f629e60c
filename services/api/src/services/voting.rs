//! Vote application
//!
//! A vote moves a user's entry in the vote ledger and the joint's counters
//! together, inside one read-committed transaction. The joint row is locked
//! before the user's previous vote is read, so concurrent votes on the same
//! joint (from the same user or from different users) are applied one after
//! another and every counter change is computed from the ledger state it
//! replaces. Dropping the transaction before commit, for example when the
//! request deadline cancels the future, rolls everything back.

use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use super::{ServiceError, ServiceResult, not_found_as};
use crate::{
    models::{CounterDelta, VoteDirection, VoteOutcome},
    repositories::{JointRepository, VoteRepository},
};

#[derive(Clone)]
pub struct VotingCoordinator {
    pool: PgPool,
    joints: JointRepository,
    votes: VoteRepository,
}

impl VotingCoordinator {
    pub fn new(pool: PgPool, joints: JointRepository, votes: VoteRepository) -> Self {
        Self {
            pool,
            joints,
            votes,
        }
    }

    /// Cast or flip `user_id`'s vote on `joint_id`
    pub async fn apply_vote(
        &self,
        user_id: Uuid,
        joint_id: Uuid,
        direction: VoteDirection,
    ) -> ServiceResult<VoteOutcome> {
        // repeating the current vote costs no transaction
        let current = self
            .votes
            .find_direction(&self.pool, user_id, joint_id)
            .await?;
        if current == Some(direction) {
            debug!("Vote by {} on {} unchanged", user_id, joint_id);
            return Ok(VoteOutcome::Unchanged);
        }

        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL READ COMMITTED")
            .execute(&mut *tx)
            .await?;

        if !self.joints.lock(&mut tx, joint_id).await? {
            return Err(ServiceError::JointNotFound);
        }

        // re-read under the lock, another request may have moved the vote
        let previous = self
            .votes
            .find_direction(&mut *tx, user_id, joint_id)
            .await?;
        let Some(delta) = CounterDelta::between(previous, direction) else {
            debug!("Vote by {} on {} already applied concurrently", user_id, joint_id);
            return Ok(VoteOutcome::Unchanged);
        };

        self.votes
            .upsert(&mut tx, user_id, joint_id, direction)
            .await?;
        let joint = self
            .joints
            .adjust_counters(&mut tx, joint_id, delta)
            .await
            .map_err(not_found_as(ServiceError::JointNotFound))?;

        tx.commit().await?;

        info!(
            "Vote by {} on {} applied: {:?} -> {:?}",
            user_id, joint_id, previous, direction
        );
        Ok(VoteOutcome::Applied(joint))
    }
}
