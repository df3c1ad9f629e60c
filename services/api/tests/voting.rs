//! Vote application against a live database
//!
//! Run with `cargo test -- --ignored` against a database named by
//! `DATABASE_URL`.

mod support;

use std::{sync::Arc, time::Duration};

use chow_api::{
    models::{Role, VoteDirection, VoteOutcome},
    repositories::{JointRepository, VoteRepository},
    services::{ServiceError, VotingCoordinator},
};
use sqlx::PgPool;
use uuid::Uuid;

fn coordinator(pool: &PgPool) -> VotingCoordinator {
    VotingCoordinator::new(
        pool.clone(),
        JointRepository::new(pool.clone()),
        VoteRepository::new(pool.clone()),
    )
}

#[tokio::test]
#[ignore = "requires PostgreSQL with PostGIS at DATABASE_URL"]
async fn first_vote_adds_one_ledger_row_and_one_count() {
    let pool = support::pool().await;
    let joint = support::approved_joint(&pool, "First Vote Spot", 6.45, 3.39).await;
    let voter = support::user(&pool, Role::User).await;

    let outcome = coordinator(&pool)
        .apply_vote(voter.id, joint.id, VoteDirection::Down)
        .await
        .unwrap();

    let VoteOutcome::Applied(updated) = outcome else {
        panic!("first vote must be applied");
    };
    assert_eq!(updated.upvotes, joint.upvotes);
    assert_eq!(updated.downvotes, joint.downvotes + 1);
    assert_eq!(support::ledger(&pool, joint.id).await, (0, 1));
}

#[tokio::test]
#[ignore = "requires PostgreSQL with PostGIS at DATABASE_URL"]
async fn repeating_a_vote_changes_nothing() {
    let pool = support::pool().await;
    let joint = support::approved_joint(&pool, "Repeat Vote Spot", 6.45, 3.39).await;
    let voter = support::user(&pool, Role::User).await;
    let coordinator = coordinator(&pool);

    coordinator
        .apply_vote(voter.id, joint.id, VoteDirection::Up)
        .await
        .unwrap();
    let second = coordinator
        .apply_vote(voter.id, joint.id, VoteDirection::Up)
        .await
        .unwrap();

    assert!(matches!(second, VoteOutcome::Unchanged));
    let stored = JointRepository::new(pool.clone())
        .get_by_id(joint.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!((stored.upvotes, stored.downvotes), (1, 0));
    assert_eq!(support::ledger(&pool, joint.id).await, (1, 0));
}

#[tokio::test]
#[ignore = "requires PostgreSQL with PostGIS at DATABASE_URL"]
async fn flipping_moves_the_vote_between_counters() {
    let pool = support::pool().await;
    let joint = support::approved_joint(&pool, "Flip Vote Spot", 6.45, 3.39).await;
    let voter = support::user(&pool, Role::User).await;
    let coordinator = coordinator(&pool);

    coordinator
        .apply_vote(voter.id, joint.id, VoteDirection::Up)
        .await
        .unwrap();
    let flipped = coordinator
        .apply_vote(voter.id, joint.id, VoteDirection::Down)
        .await
        .unwrap();

    let VoteOutcome::Applied(updated) = flipped else {
        panic!("flip must be applied");
    };
    assert_eq!(updated.upvotes, joint.upvotes);
    assert_eq!(updated.downvotes, joint.downvotes + 1);
    assert_eq!(support::ledger(&pool, joint.id).await, (0, 1));
}

#[tokio::test]
#[ignore = "requires PostgreSQL with PostGIS at DATABASE_URL"]
async fn voting_on_a_missing_joint_is_not_found() {
    let pool = support::pool().await;
    let voter = support::user(&pool, Role::User).await;

    let result = coordinator(&pool)
        .apply_vote(voter.id, Uuid::new_v4(), VoteDirection::Up)
        .await;

    assert!(matches!(result, Err(ServiceError::JointNotFound)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[ignore = "requires PostgreSQL with PostGIS at DATABASE_URL"]
async fn cancelled_vote_leaves_no_ledger_row_or_count() {
    let pool = support::pool().await;
    let joint = support::approved_joint(&pool, "Cancelled Vote Spot", 6.45, 3.39).await;
    let voter = support::user(&pool, Role::User).await;
    let coordinator = coordinator(&pool);

    // hold the joint row so the vote blocks on its own lock
    let mut holder = pool.begin().await.unwrap();
    sqlx::query("SELECT id FROM joints WHERE id = $1 FOR UPDATE")
        .bind(joint.id)
        .execute(&mut *holder)
        .await
        .unwrap();

    let attempt = tokio::time::timeout(
        Duration::from_millis(200),
        coordinator.apply_vote(voter.id, joint.id, VoteDirection::Up),
    )
    .await;
    assert!(attempt.is_err(), "vote must still be waiting on the row lock");

    holder.rollback().await.unwrap();

    let stored = JointRepository::new(pool.clone())
        .get_by_id(joint.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!((stored.upvotes, stored.downvotes), (joint.upvotes, joint.downvotes));
    assert_eq!(support::ledger(&pool, joint.id).await, (0, 0));

    // the abandoned transaction must not keep the joint locked
    let retried = tokio::time::timeout(
        Duration::from_secs(10),
        coordinator.apply_vote(voter.id, joint.id, VoteDirection::Up),
    )
    .await
    .expect("retry must not block")
    .unwrap();
    let VoteOutcome::Applied(updated) = retried else {
        panic!("retry after cancellation must be applied");
    };
    assert_eq!(updated.upvotes, joint.upvotes + 1);
    assert_eq!(support::ledger(&pool, joint.id).await, (1, 0));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "requires PostgreSQL with PostGIS at DATABASE_URL"]
async fn concurrent_distinct_voters_lose_no_updates() {
    const VOTERS: usize = 24;

    let pool = support::pool().await;
    let joint = support::approved_joint(&pool, "Busy Spot", 6.45, 3.39).await;
    let coordinator = Arc::new(coordinator(&pool));

    let mut voters = Vec::with_capacity(VOTERS);
    for _ in 0..VOTERS {
        voters.push(support::user(&pool, Role::User).await);
    }

    let handles: Vec<_> = voters
        .into_iter()
        .map(|voter| {
            let coordinator = Arc::clone(&coordinator);
            let joint_id = joint.id;
            tokio::spawn(async move {
                coordinator
                    .apply_vote(voter.id, joint_id, VoteDirection::Up)
                    .await
            })
        })
        .collect();

    for handle in handles {
        let outcome = handle.await.unwrap().unwrap();
        assert!(matches!(outcome, VoteOutcome::Applied(_)));
    }

    let stored = JointRepository::new(pool.clone())
        .get_by_id(joint.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.upvotes, joint.upvotes + VOTERS as i32);
    assert_eq!(support::ledger(&pool, joint.id).await, (VOTERS as i64, 0));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "requires PostgreSQL with PostGIS at DATABASE_URL"]
async fn racing_votes_from_one_user_keep_counters_consistent() {
    let pool = support::pool().await;
    let joint = support::approved_joint(&pool, "Contested Spot", 6.45, 3.39).await;
    let voter = support::user(&pool, Role::User).await;
    let coordinator = Arc::new(coordinator(&pool));
    let (voter_id, joint_id) = (voter.id, joint.id);

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let coordinator = Arc::clone(&coordinator);
            let direction = if i % 2 == 0 {
                VoteDirection::Up
            } else {
                VoteDirection::Down
            };
            tokio::spawn(async move {
                coordinator.apply_vote(voter_id, joint_id, direction).await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let stored = JointRepository::new(pool.clone())
        .get_by_id(joint.id)
        .await
        .unwrap()
        .unwrap();
    let (up_rows, down_rows) = support::ledger(&pool, joint.id).await;
    assert_eq!(up_rows + down_rows, 1, "exactly one ledger row per user");
    assert_eq!(i64::from(stored.upvotes), up_rows);
    assert_eq!(i64::from(stored.downvotes), down_rows);
}
