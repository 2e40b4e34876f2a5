//! Traits describing the remote and device collaborators, plus the query types they accept.

use std::collections::BTreeSet;

use async_trait::async_trait;
use reqwest::Error as ReqwestError;

use crate::model::{Category, CategoryId, CollectionPoint, Coordinate, PointDetail, PointId};

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while talking to collaborators.
pub enum PortError {
    /// Network layer failed.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),
    /// Requested point does not exist.
    #[error("Point not found")]
    NotFound,
    /// The user refused location access.
    #[error("Location permission denied")]
    PermissionDenied,
    /// Permission was granted but no fix could be obtained.
    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),
    /// Response body did not have the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),
    /// Internal collaborator error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Category restriction sent with a point query.
pub enum CategoryFilter {
    /// No restriction: every point matches regardless of category.
    Unrestricted,
    /// Points accepting at least one of the listed categories.
    AnyOf(CategorySet),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Non-empty, ascending list of category ids. Only [`CategoryFilter::from_selection`] builds one.
pub struct CategorySet(Vec<CategoryId>);

impl CategorySet {
    /// The ids, ascending.
    #[must_use]
    pub fn ids(&self) -> &[CategoryId] {
        &self.0
    }
}

impl CategoryFilter {
    /// Build the filter for a selection; an empty selection means no restriction.
    #[must_use]
    pub fn from_selection(selected: &BTreeSet<CategoryId>) -> Self {
        if selected.is_empty() {
            CategoryFilter::Unrestricted
        } else {
            CategoryFilter::AnyOf(CategorySet(selected.iter().copied().collect()))
        }
    }

    /// Category ids carried by the filter, empty when unrestricted.
    #[must_use]
    pub fn ids(&self) -> &[CategoryId] {
        match self {
            CategoryFilter::Unrestricted => &[],
            CategoryFilter::AnyOf(set) => set.ids(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Parameters of a filtered point lookup.
pub struct PointQuery {
    /// Optional city restriction.
    pub city: Option<String>,
    /// Optional state (UF) restriction.
    pub state: Option<String>,
    /// Category restriction.
    pub items: CategoryFilter,
}

impl PointQuery {
    /// Query-string pairs in the form the HTTP collaborator expects.
    ///
    /// Absent filters are omitted rather than sent empty, so an unrestricted query carries no
    /// `items` pair at all.
    ///
    /// Category ids travel as one comma-joined `items=1,2` value, not as repeated `items[]`
    /// pairs; the API splits that value on commas.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(3);
        if let Some(city) = self.city.as_deref().filter(|city| !city.is_empty()) {
            pairs.push(("city", city.to_owned()));
        }
        if let Some(state) = self.state.as_deref().filter(|state| !state.is_empty()) {
            pairs.push(("state", state.to_owned()));
        }
        let ids = self.items.ids();
        if !ids.is_empty() {
            let joined = ids
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",");
            pairs.push(("items", joined));
        }
        pairs
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Answer to a runtime location permission request.
pub enum Permission {
    /// Access granted.
    Granted,
    /// Access refused.
    Denied,
}

#[async_trait]
/// Remote catalog of selectable categories.
pub trait CatalogPort: Send + Sync {
    /// Fetch every selectable category.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the request fails or the body cannot be decoded.
    async fn categories(&self) -> Result<Vec<Category>, PortError>;
}

#[async_trait]
/// Remote lookup of collection points.
pub trait PointsPort: Send + Sync {
    /// Fetch the points matching a query.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the request fails or the body cannot be decoded.
    async fn points(&self, query: &PointQuery) -> Result<Vec<CollectionPoint>, PortError>;

    /// Fetch one point with its accepted categories.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::NotFound`] for an unknown id, or another [`PortError`] when the
    /// request fails.
    async fn point(&self, id: PointId) -> Result<PointDetail, PortError>;
}

#[async_trait]
/// Device permission and positioning.
pub trait LocationPort: Send + Sync {
    /// Ask the user for location access, suspending until they answer.
    async fn request_permission(&self) -> Permission;

    /// Obtain one point-in-time fix.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::LocationUnavailable`] when no fix can be obtained.
    async fn current_position(&self) -> Result<Coordinate, PortError>;
}
