//! High-level service facade combining the remote backend and the location collaborator.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::backend::Backend;
use crate::model::{Category, CollectionPoint, LocationState, PointDetail, PointId};
use crate::ports::{LocationPort, Permission, PointQuery, PortError};

/// Public entry point for every asynchronous fetch the screens need.
pub struct ColetaService {
    backend: Backend,
    location: Arc<dyn LocationPort>,
}

impl ColetaService {
    /// Create a new service bound to the provided collaborators.
    #[must_use]
    pub fn new(backend: Backend, location: Arc<dyn LocationPort>) -> Self {
        Self { backend, location }
    }

    /// Origin of the remote backend, for display and logs.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.backend.origin
    }

    /// Fetch the selectable categories.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the catalog request fails.
    pub async fn categories(&self) -> Result<Vec<Category>, PortError> {
        let categories = self.backend.catalog.categories().await?;
        debug!(count = categories.len(), "categories fetched");
        Ok(categories)
    }

    /// Fetch the points matching `query`.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the point request fails.
    pub async fn query_points(&self, query: &PointQuery) -> Result<Vec<CollectionPoint>, PortError> {
        let points = self.backend.points.points(query).await?;
        debug!(items = ?query.items, count = points.len(), "points fetched");
        Ok(points)
    }

    /// Fetch a single point with its accepted categories.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::NotFound`] for an unknown id, or another [`PortError`] if the
    /// request fails.
    pub async fn point_detail(&self, id: PointId) -> Result<PointDetail, PortError> {
        self.backend.points.point(id).await
    }

    /// Ask for location access and, if granted, take one fix.
    ///
    /// A failed fix leaves the location `Unresolved`; it never yields a placeholder
    /// coordinate.
    pub async fn request_location(&self) -> LocationState {
        match self.location.request_permission().await {
            Permission::Denied => {
                info!("location permission denied");
                LocationState::PermissionDenied
            }
            Permission::Granted => match self.location.current_position().await {
                Ok(coordinate) => {
                    debug!(
                        latitude = coordinate.latitude,
                        longitude = coordinate.longitude,
                        "location resolved"
                    );
                    LocationState::Resolved(coordinate)
                }
                Err(err) => {
                    warn!(error = %err, "location fix failed");
                    LocationState::Unresolved
                }
            },
        }
    }
}
