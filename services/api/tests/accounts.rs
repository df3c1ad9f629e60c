//! Registration, login and complaint flows against a live database
//!
//! Run with `cargo test -- --ignored` against a database named by
//! `DATABASE_URL`.

mod support;

use chow_api::{
    jwt::{JwtConfig, JwtService},
    models::{ComplaintStatus, LoginRequest, RegisterRequest, Role},
    repositories::{ComplaintRepository, JointRepository, UserRepository},
    services::{AuthService, ComplaintService, ServiceError},
};
use sqlx::PgPool;
use uuid::Uuid;

fn auth(pool: &PgPool) -> (AuthService, JwtService) {
    let jwt = JwtService::new(JwtConfig {
        secret: "integration-secret".to_string(),
        expiry_minutes: 1,
    });
    (
        AuthService::new(UserRepository::new(pool.clone()), jwt.clone()),
        jwt,
    )
}

#[tokio::test]
#[ignore = "requires PostgreSQL with PostGIS at DATABASE_URL"]
async fn duplicate_email_leaves_existing_user_untouched() {
    let pool = support::pool().await;
    let (auth, _) = auth(&pool);
    let suffix = support::unique();
    let email = format!("dup_{}@example.com", suffix);

    let existing = auth
        .register(RegisterRequest {
            email: email.clone(),
            username: format!("first_{}", suffix),
            password: "first-password".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(existing.role, Role::User);

    let second = auth
        .register(RegisterRequest {
            email: email.clone(),
            username: format!("second_{}", suffix),
            password: "second-password".to_string(),
        })
        .await;
    assert!(matches!(second, Err(ServiceError::AlreadyExists(_))));

    let stored = UserRepository::new(pool.clone())
        .find_by_id(existing.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.username, existing.username);
    assert_eq!(stored.password_hash, existing.password_hash);
    assert_eq!(stored.updated_at, existing.updated_at);
}

#[tokio::test]
#[ignore = "requires PostgreSQL with PostGIS at DATABASE_URL"]
async fn login_issues_a_verifiable_token() {
    let pool = support::pool().await;
    let (auth, jwt) = auth(&pool);
    let suffix = support::unique();

    let user = auth
        .register(RegisterRequest {
            email: format!("login_{}@example.com", suffix),
            username: format!("login_{}", suffix),
            password: "open-sesame".to_string(),
        })
        .await
        .unwrap();

    let session = auth
        .login(LoginRequest {
            email: user.email.clone(),
            password: "open-sesame".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(session.token_type, "Bearer");
    assert_eq!(session.expires_in, 60);
    assert_eq!(jwt.verify(&session.access_token).unwrap().id, user.id);

    let by_username = auth
        .login(LoginRequest {
            email: user.username.clone(),
            password: "open-sesame".to_string(),
        })
        .await;
    assert!(by_username.is_ok());

    let wrong_password = auth
        .login(LoginRequest {
            email: user.email.clone(),
            password: "open-sesame!".to_string(),
        })
        .await;
    assert!(matches!(wrong_password, Err(ServiceError::InvalidCredentials)));

    let unknown = auth
        .login(LoginRequest {
            email: format!("nobody_{}@example.com", suffix),
            password: "open-sesame".to_string(),
        })
        .await;
    assert!(matches!(unknown, Err(ServiceError::InvalidCredentials)));
}

#[tokio::test]
#[ignore = "requires PostgreSQL with PostGIS at DATABASE_URL"]
async fn complaints_are_filed_listed_and_resolved_once() {
    let pool = support::pool().await;
    let joint = support::approved_joint(&pool, "Complained Spot", 6.5, 3.3).await;
    let filer = support::user(&pool, Role::User).await;
    let moderator = support::user(&pool, Role::Moderator).await;
    let service = ComplaintService::new(
        ComplaintRepository::new(pool.clone()),
        JointRepository::new(pool.clone()),
    );

    let complaint = service
        .file(filer.id, joint.id, "  served cold food  ")
        .await
        .unwrap();
    assert_eq!(complaint.status, ComplaintStatus::Open);
    assert_eq!(complaint.reason, "served cold food");

    let mine = service
        .list_by_user(filer.id, Default::default())
        .await
        .unwrap();
    assert!(mine.iter().any(|c| c.id == complaint.id));

    let others_view = service
        .list_by_joint(joint.id, Some(moderator.id), Default::default())
        .await
        .unwrap();
    assert!(others_view.is_empty());

    let resolved = service.resolve(complaint.id, moderator.id).await.unwrap();
    assert_eq!(resolved.status, ComplaintStatus::Resolved);

    let again = service.resolve(complaint.id, moderator.id).await;
    assert!(matches!(again, Err(ServiceError::ComplaintAlreadyResolved)));

    let missing = service.resolve(Uuid::new_v4(), moderator.id).await;
    assert!(matches!(missing, Err(ServiceError::ComplaintNotFound)));

    let orphan = service
        .file(filer.id, Uuid::new_v4(), "no such place")
        .await;
    assert!(matches!(orphan, Err(ServiceError::JointNotFound)));
}
