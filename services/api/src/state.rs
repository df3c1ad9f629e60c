//! Application state shared across handlers

use sqlx::PgPool;

use crate::{
    config::AppConfig,
    jwt::{JwtConfig, JwtService},
    repositories::{ComplaintRepository, JointRepository, UserRepository, VoteRepository},
    services::{AuthService, ComplaintService, JointService, ProximityPlanner, VotingCoordinator},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: AppConfig,
    pub jwt_service: JwtService,
    pub auth_service: AuthService,
    pub joint_service: JointService,
    pub voting: VotingCoordinator,
    pub proximity: ProximityPlanner,
    pub complaint_service: ComplaintService,
}

impl AppState {
    /// Wire repositories and services around one connection pool
    pub fn new(db_pool: PgPool, config: AppConfig) -> Self {
        let jwt_service = JwtService::new(JwtConfig::from(&config));

        let users = UserRepository::new(db_pool.clone());
        let joints = JointRepository::new(db_pool.clone());
        let votes = VoteRepository::new(db_pool.clone());
        let complaints = ComplaintRepository::new(db_pool.clone());

        Self {
            auth_service: AuthService::new(users, jwt_service.clone()),
            joint_service: JointService::new(joints.clone(), votes.clone()),
            voting: VotingCoordinator::new(db_pool.clone(), joints.clone(), votes),
            proximity: ProximityPlanner::new(joints.clone(), config.max_radius_meters),
            complaint_service: ComplaintService::new(complaints, joints),
            jwt_service,
            db_pool,
            config,
        }
    }
}
