//! Shared fixtures for the database-backed integration tests

#![allow(dead_code)]

use chow_api::{
    models::{AuthUser, CreateJointRequest, Joint, NewUser, Role, User},
    repositories::{JointRepository, UserRepository, VoteRepository},
    services::JointService,
};
use common::database::{DatabaseConfig, init_pool, run_migrations};
use sqlx::PgPool;
use uuid::Uuid;

/// Connect to `DATABASE_URL` and bring the schema up to date
pub async fn pool() -> PgPool {
    let config = DatabaseConfig::from_env().expect("database config");
    let pool = init_pool(&config).await.expect("database pool");
    run_migrations(&pool).await.expect("migrations");
    pool
}

/// Short unique suffix so tests never collide on unique columns
pub fn unique() -> String {
    Uuid::new_v4().simple().to_string()[..12].to_string()
}

pub async fn user(pool: &PgPool, role: Role) -> User {
    let suffix = unique();
    UserRepository::new(pool.clone())
        .create(&NewUser {
            email: format!("user_{}@example.com", suffix),
            username: format!("user_{}", suffix),
            password_hash: "not-a-real-hash".to_string(),
            role,
        })
        .await
        .expect("create user")
}

pub fn identity(user: &User) -> AuthUser {
    AuthUser {
        id: user.id,
        username: user.username.clone(),
        role: user.role,
    }
}

/// Create an approved joint at the given coordinate
pub async fn approved_joint(pool: &PgPool, name: &str, latitude: f64, longitude: f64) -> Joint {
    let creator = user(pool, Role::User).await;
    let service = JointService::new(
        JointRepository::new(pool.clone()),
        VoteRepository::new(pool.clone()),
    );

    let joint = service
        .create(
            &identity(&creator),
            CreateJointRequest {
                name: name.to_string(),
                latitude,
                longitude,
                description: Some("integration fixture".to_string()),
            },
        )
        .await
        .expect("create joint");

    service
        .set_approval(joint.id, true)
        .await
        .expect("approve joint")
}

/// Number of ledger rows for a joint, per direction
pub async fn ledger(pool: &PgPool, joint_id: Uuid) -> (i64, i64) {
    sqlx::query_as::<_, (i64, i64)>(
        r#"
        SELECT COUNT(*) FILTER (WHERE direction = 'up'),
               COUNT(*) FILTER (WHERE direction = 'down')
        FROM votes
        WHERE joint_id = $1
        "#,
    )
    .bind(joint_id)
    .fetch_one(pool)
    .await
    .expect("ledger count")
}
