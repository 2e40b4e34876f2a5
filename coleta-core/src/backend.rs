//! Bundle of remote ports a [`crate::service::ColetaService`] is built from.

use std::sync::Arc;

use crate::ports::{CatalogPort, PointsPort};

/// Remote collaborator implementation, constructed explicitly and injected into the service.
pub struct Backend {
    /// Human-readable origin for logs, typically the base URL.
    pub origin: String,
    /// Implementation of the category catalog.
    pub catalog: Arc<dyn CatalogPort>,
    /// Implementation of the point lookups.
    pub points: Arc<dyn PointsPort>,
}

impl Backend {
    /// Bundle the given ports.
    #[must_use]
    pub fn new<S: Into<String>>(
        origin: S,
        catalog: Arc<dyn CatalogPort>,
        points: Arc<dyn PointsPort>,
    ) -> Self {
        Self {
            origin: origin.into(),
            catalog,
            points,
        }
    }
}
