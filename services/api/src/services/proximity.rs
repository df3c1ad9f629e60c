//! Radius search over approved joints

use tracing::debug;

use super::{ServiceError, ServiceResult};
use crate::{
    models::{Coordinate, Joint, Page},
    repositories::JointRepository,
};

/// Plans proximity queries under an operational radius cap
///
/// Results come back nearest first with their distance in metres. Pages are
/// offset windows over a live ordering, so joints inserted between two page
/// requests can shift entries across page boundaries.
#[derive(Clone)]
pub struct ProximityPlanner {
    joints: JointRepository,
    max_radius: f64,
}

impl ProximityPlanner {
    pub fn new(joints: JointRepository, max_radius: f64) -> Self {
        Self { joints, max_radius }
    }

    /// Reject radii above the cap before touching the store
    pub fn check_radius(&self, radius: f64) -> ServiceResult<()> {
        if radius > self.max_radius {
            return Err(ServiceError::RadiusExceeded {
                requested: radius,
                max: self.max_radius,
            });
        }
        Ok(())
    }

    pub async fn find_nearby(
        &self,
        center: Coordinate,
        radius: f64,
        page: Page,
    ) -> ServiceResult<Vec<Joint>> {
        self.check_radius(radius)?;

        debug!(
            "Nearby search at ({}, {}) within {} m, offset {} limit {}",
            center.latitude, center.longitude, radius, page.offset, page.limit
        );

        Ok(self.joints.nearby(center, radius, page).await?)
    }
}
