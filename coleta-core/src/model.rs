//! Domain data structures for categories, collection points, and device location.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Span in degrees the map opens with around the user's position.
pub const MAP_REGION_DELTA: f64 = 0.014;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
/// Identifier of a recyclable material category.
pub struct CategoryId(pub i64);

impl fmt::Display for CategoryId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
/// Identifier of a collection point.
pub struct PointId(pub i64);

impl fmt::Display for PointId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Selectable category of recyclable material.
pub struct Category {
    /// Unique identifier.
    pub id: CategoryId,
    /// Display title, e.g. "Lamps".
    pub title: String,
    /// Icon location served by the remote API.
    pub image_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// Geographic coordinate in decimal degrees.
pub struct Coordinate {
    /// Latitude.
    pub latitude: f64,
    /// Longitude.
    pub longitude: f64,
}

impl Coordinate {
    /// Construct a coordinate.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Collection point as listed on the map.
pub struct CollectionPoint {
    /// Unique identifier.
    pub id: PointId,
    /// Name of the establishment.
    pub name: String,
    /// Photo location served by the remote API.
    pub image_url: String,
    /// Position of the point.
    pub position: Coordinate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Title of a category accepted by a point.
pub struct ItemLabel {
    /// Category title.
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Extended point record with contact channels, shown on the detail screen.
pub struct PointProfile {
    /// Unique identifier.
    pub id: PointId,
    /// Name of the establishment.
    pub name: String,
    /// Photo location served by the remote API.
    pub image_url: String,
    /// Position of the point.
    pub position: Coordinate,
    /// `WhatsApp` phone number.
    pub whatsapp: String,
    /// Contact e-mail address.
    pub email: String,
    /// City the point is located in.
    pub city: String,
    /// State (UF) the point is located in.
    pub state: String,
    /// Items embedded in the point record itself.
    pub items: Vec<ItemLabel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Result of a detail lookup: the point and the categories it accepts.
pub struct PointDetail {
    /// The point itself.
    pub point: PointProfile,
    /// Accepted categories, in server order.
    pub items: Vec<ItemLabel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
/// Where the device is, as far as the screen knows.
pub enum LocationState {
    /// No answer yet, or the fix failed.
    #[default]
    Unresolved,
    /// The user refused location access. Terminal.
    PermissionDenied,
    /// A single fix was obtained. Terminal for the screen's lifetime.
    Resolved(Coordinate),
}

impl LocationState {
    /// Apply a transition, honouring the forward-only rule.
    ///
    /// Only `Unresolved` may move; once denied or resolved the state is kept and `false`
    /// is returned.
    pub fn advance(&mut self, next: LocationState) -> bool {
        match self {
            LocationState::Unresolved => {
                *self = next;
                true
            }
            LocationState::PermissionDenied | LocationState::Resolved(_) => false,
        }
    }

    /// Coordinate of the fix, if one exists.
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        match self {
            LocationState::Resolved(coordinate) => Some(*coordinate),
            LocationState::Unresolved | LocationState::PermissionDenied => None,
        }
    }

    /// Check whether the user denied location access.
    #[must_use]
    pub fn is_denied(&self) -> bool {
        matches!(self, LocationState::PermissionDenied)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// Initial visible region of the map.
pub struct MapRegion {
    /// Center of the region.
    pub center: Coordinate,
    /// Latitude span in degrees.
    pub latitude_delta: f64,
    /// Longitude span in degrees.
    pub longitude_delta: f64,
}

impl MapRegion {
    /// Region centred on `center` with the default zoom.
    #[must_use]
    pub const fn around(center: Coordinate) -> Self {
        Self {
            center,
            latitude_delta: MAP_REGION_DELTA,
            longitude_delta: MAP_REGION_DELTA,
        }
    }
}
