//! Joint repository for database operations

use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::models::{Coordinate, CounterDelta, Joint, JointChanges, NewJoint, Page};

const JOINT_COLUMNS: &str = "id, name, latitude, longitude, description, is_approved, creator_id, \
     photo_url, upvotes, downvotes, created_at, updated_at";

/// Geography point built from `(longitude, latitude)` bind parameters
const POINT: &str = "ST_SetSRID(ST_MakePoint($1, $2), 4326)::geography";

/// Wrap a user search term as a case-insensitive substring pattern
///
/// `%`, `_` and `\` in the term match literally.
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Joint repository
#[derive(Clone)]
pub struct JointRepository {
    pool: PgPool,
}

impl JointRepository {
    /// Create a new joint repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a joint, unapproved and with zeroed counters
    pub async fn create(&self, new_joint: &NewJoint) -> DatabaseResult<Joint> {
        info!("Creating joint: {}", new_joint.name);

        let joint = sqlx::query_as::<_, Joint>(&format!(
            r#"
            INSERT INTO joints (name, longitude, latitude, location, description, creator_id, photo_url)
            VALUES ($3, $1, $2, {POINT}, $4, $5, $6)
            RETURNING {JOINT_COLUMNS}
            "#
        ))
        .bind(new_joint.location.longitude)
        .bind(new_joint.location.latitude)
        .bind(&new_joint.name)
        .bind(&new_joint.description)
        .bind(new_joint.creator_id)
        .bind(&new_joint.photo_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(joint)
    }

    /// Get a joint by ID, regardless of approval
    pub async fn get_by_id(&self, id: Uuid) -> DatabaseResult<Option<Joint>> {
        let joint = sqlx::query_as::<_, Joint>(&format!(
            "SELECT {JOINT_COLUMNS} FROM joints WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(joint)
    }

    /// Approved joints, newest first
    pub async fn list_approved(&self, page: Page) -> DatabaseResult<Vec<Joint>> {
        let joints = sqlx::query_as::<_, Joint>(&format!(
            r#"
            SELECT {JOINT_COLUMNS}
            FROM joints
            WHERE is_approved
            ORDER BY created_at DESC, id
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(joints)
    }

    /// Approved joints whose name or description contains `term`
    pub async fn search(&self, term: &str, page: Page) -> DatabaseResult<Vec<Joint>> {
        let joints = sqlx::query_as::<_, Joint>(&format!(
            r#"
            SELECT {JOINT_COLUMNS}
            FROM joints
            WHERE is_approved
              AND (name ILIKE $1 ESCAPE '\' OR description ILIKE $1 ESCAPE '\')
            ORDER BY name, id
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(like_pattern(term))
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(joints)
    }

    /// Approved joints within `radius` metres of `origin`, nearest first
    ///
    /// Each returned joint carries its geodesic distance from `origin`.
    pub async fn nearby(
        &self,
        origin: Coordinate,
        radius: f64,
        page: Page,
    ) -> DatabaseResult<Vec<Joint>> {
        let joints = sqlx::query_as::<_, Joint>(&format!(
            r#"
            SELECT {JOINT_COLUMNS}, ST_Distance(location, {POINT}) AS distance
            FROM joints
            WHERE is_approved
              AND ST_DWithin(location, {POINT}, $3)
            ORDER BY distance, id
            LIMIT $4 OFFSET $5
            "#
        ))
        .bind(origin.longitude)
        .bind(origin.latitude)
        .bind(radius)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(joints)
    }

    /// Overwrite the editable fields of a joint
    pub async fn update(&self, id: Uuid, changes: &JointChanges) -> DatabaseResult<Joint> {
        let joint = sqlx::query_as::<_, Joint>(&format!(
            r#"
            UPDATE joints
            SET longitude = $1, latitude = $2, location = {POINT},
                name = $3, description = $4, updated_at = NOW()
            WHERE id = $5
            RETURNING {JOINT_COLUMNS}
            "#
        ))
        .bind(changes.location.longitude)
        .bind(changes.location.latitude)
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        joint.ok_or(DatabaseError::NotFound)
    }

    pub async fn set_approval(&self, id: Uuid, approved: bool) -> DatabaseResult<Joint> {
        let joint = sqlx::query_as::<_, Joint>(&format!(
            r#"
            UPDATE joints
            SET is_approved = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {JOINT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(approved)
        .fetch_optional(&self.pool)
        .await?;

        joint.ok_or(DatabaseError::NotFound)
    }

    /// Delete a joint; its votes and complaints go with it
    pub async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM joints WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Take a row lock on a joint for the rest of the transaction
    ///
    /// Returns `false` if the joint does not exist.
    pub async fn lock(&self, conn: &mut PgConnection, id: Uuid) -> DatabaseResult<bool> {
        let locked = sqlx::query_scalar::<_, Uuid>("SELECT id FROM joints WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await?;

        Ok(locked.is_some())
    }

    /// Apply a counter change relative to the stored values
    pub async fn adjust_counters(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        delta: CounterDelta,
    ) -> DatabaseResult<Joint> {
        let joint = sqlx::query_as::<_, Joint>(&format!(
            r#"
            UPDATE joints
            SET upvotes = upvotes + $2, downvotes = downvotes + $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {JOINT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(delta.upvotes)
        .bind(delta.downvotes)
        .fetch_optional(conn)
        .await?;

        joint.ok_or(DatabaseError::NotFound)
    }
}
