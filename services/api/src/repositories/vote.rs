//! Vote repository for database operations

use common::error::DatabaseResult;
use sqlx::{PgConnection, PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::{JointVoter, Page, Vote, VoteDirection};

/// Vote repository
#[derive(Clone)]
pub struct VoteRepository {
    pool: PgPool,
}

impl VoteRepository {
    /// Create a new vote repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Current direction of a user's vote on a joint, if any
    pub async fn find_direction<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        joint_id: Uuid,
    ) -> DatabaseResult<Option<VoteDirection>>
    where
        E: PgExecutor<'e>,
    {
        let direction = sqlx::query_scalar::<_, VoteDirection>(
            "SELECT direction FROM votes WHERE user_id = $1 AND joint_id = $2",
        )
        .bind(user_id)
        .bind(joint_id)
        .fetch_optional(executor)
        .await?;

        Ok(direction)
    }

    /// Record a user's vote, replacing any earlier direction
    pub async fn upsert(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
        joint_id: Uuid,
        direction: VoteDirection,
    ) -> DatabaseResult<Vote> {
        let vote = sqlx::query_as::<_, Vote>(
            r#"
            INSERT INTO votes (user_id, joint_id, direction)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, joint_id)
            DO UPDATE SET direction = EXCLUDED.direction, updated_at = NOW()
            RETURNING id, user_id, joint_id, direction, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(joint_id)
        .bind(direction)
        .fetch_one(conn)
        .await?;

        Ok(vote)
    }

    /// Voters on a joint, most recent first
    pub async fn voters_for_joint(
        &self,
        joint_id: Uuid,
        page: Page,
    ) -> DatabaseResult<Vec<JointVoter>> {
        let voters = sqlx::query_as::<_, JointVoter>(
            r#"
            SELECT v.user_id, u.username, v.joint_id, v.direction, v.created_at, v.updated_at
            FROM votes v
            JOIN users u ON u.id = v.user_id
            WHERE v.joint_id = $1
            ORDER BY v.updated_at DESC, v.user_id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(joint_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(voters)
    }
}
