//! Domain services sitting between the HTTP routes and the repositories

use common::error::DatabaseError;
use thiserror::Error;

pub mod auth;
pub mod complaint;
pub mod joint;
pub mod proximity;
pub mod voting;

pub use auth::AuthService;
pub use complaint::ComplaintService;
pub use joint::JointService;
pub use proximity::ProximityPlanner;
pub use voting::VotingCoordinator;

/// Domain-level failure, with store "not found" already resolved to an entity
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("joint not found")]
    JointNotFound,

    #[error("complaint not found")]
    ComplaintNotFound,

    #[error("{0} already exists")]
    AlreadyExists(&'static str),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("radius of {requested} m exceeds the maximum of {max} m")]
    RadiusExceeded { requested: f64, max: f64 },

    #[error("complaint is already resolved")]
    ComplaintAlreadyResolved,

    #[error(transparent)]
    Persistence(#[from] DatabaseError),

    #[error("{0}")]
    Internal(String),
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        ServiceError::Persistence(err.into())
    }
}

/// Type alias for service results
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Resolve a store-level "not found" into the given domain variant
pub(crate) fn not_found_as(kind: ServiceError) -> impl FnOnce(DatabaseError) -> ServiceError {
    move |err| match err {
        DatabaseError::NotFound => kind,
        other => ServiceError::Persistence(other),
    }
}
