//! Complaint repository for database operations

use common::error::DatabaseResult;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Complaint, Page};

const COMPLAINT_COLUMNS: &str = "id, joint_id, user_id, reason, status, created_at, updated_at";

/// Complaint repository
#[derive(Clone)]
pub struct ComplaintRepository {
    pool: PgPool,
}

impl ComplaintRepository {
    /// Create a new complaint repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// File a new open complaint
    pub async fn create(
        &self,
        joint_id: Uuid,
        user_id: Uuid,
        reason: &str,
    ) -> DatabaseResult<Complaint> {
        let complaint = sqlx::query_as::<_, Complaint>(&format!(
            r#"
            INSERT INTO complaints (joint_id, user_id, reason)
            VALUES ($1, $2, $3)
            RETURNING {COMPLAINT_COLUMNS}
            "#
        ))
        .bind(joint_id)
        .bind(user_id)
        .bind(reason)
        .fetch_one(&self.pool)
        .await?;

        Ok(complaint)
    }

    pub async fn get_by_id(&self, id: Uuid) -> DatabaseResult<Option<Complaint>> {
        let complaint = sqlx::query_as::<_, Complaint>(&format!(
            "SELECT {COMPLAINT_COLUMNS} FROM complaints WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(complaint)
    }

    /// Complaints matching the optional joint and author filters, newest first
    pub async fn list(
        &self,
        joint_id: Option<Uuid>,
        user_id: Option<Uuid>,
        page: Page,
    ) -> DatabaseResult<Vec<Complaint>> {
        let complaints = sqlx::query_as::<_, Complaint>(&format!(
            r#"
            SELECT {COMPLAINT_COLUMNS}
            FROM complaints
            WHERE ($1::uuid IS NULL OR joint_id = $1)
              AND ($2::uuid IS NULL OR user_id = $2)
            ORDER BY created_at DESC, id
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(joint_id)
        .bind(user_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(complaints)
    }

    /// Mark an open complaint resolved
    ///
    /// Returns `None` if the complaint is missing or already resolved.
    pub async fn resolve(&self, id: Uuid) -> DatabaseResult<Option<Complaint>> {
        let complaint = sqlx::query_as::<_, Complaint>(&format!(
            r#"
            UPDATE complaints
            SET status = 'resolved', updated_at = NOW()
            WHERE id = $1 AND status = 'open'
            RETURNING {COMPLAINT_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(complaint)
    }
}
