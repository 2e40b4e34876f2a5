//! View model of the discovery screen: category strip, filters, and the map of points.
//!
//! Three independent sources feed this model: the category catalog, the device location,
//! and the filtered point query. Each arrives through an `apply_*` method together with the
//! ticket it was issued under; responses whose ticket is no longer current are dropped, so a
//! late answer can never overwrite a newer one or leak into a later screen activation.

use tracing::{debug, info, warn};

use crate::freshness::{Ticket, TicketCounter};
use crate::intent::{Intent, Route};
use crate::model::{Category, CategoryId, CollectionPoint, LocationState, MapRegion, PointId};
use crate::ports::PortError;
use crate::selection::{FilterState, IssuedQuery, SelectionController};

/// Title of the notice shown when location access is refused.
pub const LOCATION_NOTICE_TITLE: &str = "Ops!";
/// Body of the notice shown when location access is refused.
pub const LOCATION_NOTICE_MESSAGE: &str = "Precisamos de sua permissão para obter a localização";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Coarse readiness of the discovery screen.
pub enum DiscoveryPhase {
    /// Nothing has arrived yet.
    Loading,
    /// Some sources arrived, others are still pending or degraded.
    PartiallyReady,
    /// Categories, points, and location are all available.
    Ready,
    /// Location access was refused; the map stays hidden.
    LocationDenied,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Blocking message the user has to dismiss.
pub struct Notice {
    /// Short heading.
    pub title: String,
    /// Explanation.
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Fetches a front end must start when the screen becomes active.
pub struct DiscoveryStart {
    /// Ticket for the catalog and location responses of this activation.
    pub session: Ticket,
    /// Initial point query.
    pub points: IssuedQuery,
}

#[derive(Debug, Clone, PartialEq)]
/// Category entry of the horizontal strip.
pub struct CategoryChip {
    /// The category.
    pub category: Category,
    /// Whether it is part of the filter.
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
/// Map area, present only once the device position is known.
pub struct MapView {
    /// Region to open on.
    pub region: MapRegion,
    /// Points to draw as markers.
    pub markers: Vec<CollectionPoint>,
}

#[derive(Debug, Clone, PartialEq)]
/// Render-ready snapshot of the discovery screen.
pub struct DiscoveryView {
    /// Overall readiness.
    pub phase: DiscoveryPhase,
    /// Category strip; empty until the catalog arrives.
    pub categories: Vec<CategoryChip>,
    /// Map with markers, `None` until a fix is resolved.
    pub map: Option<MapView>,
    /// Pending blocking notice.
    pub notice: Option<Notice>,
    /// Why the category strip is empty, if the catalog failed.
    pub catalog_failure: Option<String>,
    /// Why the markers are empty, if the last point query failed.
    pub points_failure: Option<String>,
}

#[derive(Debug, Default)]
struct PointResults {
    points: Vec<CollectionPoint>,
    applied: bool,
    failure: Option<String>,
}

impl PointResults {
    fn replace(&mut self, result: Result<Vec<CollectionPoint>, PortError>) {
        self.applied = true;
        match result {
            Ok(points) => {
                self.points = points;
                self.failure = None;
            }
            Err(err) => {
                warn!(error = %err, "point query failed, showing no points");
                self.points = Vec::new();
                self.failure = Some(err.to_string());
            }
        }
    }
}

/// State of the discovery screen across one or more activations.
#[derive(Debug, Default)]
pub struct DiscoveryViewModel {
    sessions: TicketCounter,
    session: Option<Ticket>,
    selection: SelectionController,
    categories: Option<Vec<Category>>,
    catalog_failure: Option<String>,
    points: PointResults,
    location: LocationState,
    notice: Option<Notice>,
}

impl DiscoveryViewModel {
    /// Model scoped to the optional city and state route parameters.
    #[must_use]
    pub fn new(city: Option<String>, state: Option<String>) -> Self {
        Self {
            selection: SelectionController::new(city, state),
            ..Self::default()
        }
    }

    /// Start a screen activation and return the fetches to run for it.
    ///
    /// Data of a previous activation is discarded; the selection is kept.
    pub fn activate(&mut self) -> DiscoveryStart {
        let session = self.sessions.issue();
        self.session = Some(session);
        self.categories = None;
        self.catalog_failure = None;
        self.points = PointResults::default();
        self.location = LocationState::Unresolved;
        self.notice = None;
        info!(%session, "discovery screen activated");

        DiscoveryStart {
            session,
            points: self.selection.refresh(),
        }
    }

    /// Leave the screen; every response still in flight becomes stale.
    pub fn deactivate(&mut self) {
        self.sessions.revoke();
        self.selection.revoke();
        self.session = None;
        info!("discovery screen deactivated");
    }

    /// Check whether the screen is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    fn accepts_session(&self, session: Ticket) -> bool {
        self.session == Some(session)
    }

    /// Apply the catalog response. Returns `false` when it was stale.
    pub fn apply_categories(
        &mut self,
        session: Ticket,
        result: Result<Vec<Category>, PortError>,
    ) -> bool {
        if !self.accepts_session(session) {
            debug!(%session, "dropping stale catalog response");
            return false;
        }
        match result {
            Ok(categories) => {
                self.categories = Some(categories);
                self.catalog_failure = None;
            }
            Err(err) => {
                warn!(error = %err, "catalog fetch failed, showing no categories");
                self.categories = Some(Vec::new());
                self.catalog_failure = Some(err.to_string());
            }
        }
        true
    }

    /// Apply the outcome of a location request. Returns `false` when it was stale or the
    /// location had already settled.
    pub fn apply_location(&mut self, session: Ticket, location: LocationState) -> bool {
        if !self.accepts_session(session) {
            debug!(%session, "dropping stale location response");
            return false;
        }
        if !self.location.advance(location) {
            return false;
        }
        if self.location.is_denied() {
            self.notice = Some(Notice {
                title: LOCATION_NOTICE_TITLE.to_owned(),
                message: LOCATION_NOTICE_MESSAGE.to_owned(),
            });
        }
        true
    }

    /// Apply a point query response. Returns `false` when a newer query superseded it or the
    /// screen is not active.
    pub fn apply_points(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<CollectionPoint>, PortError>,
    ) -> bool {
        if !self.is_active() || !self.selection.accepts(ticket) {
            debug!(%ticket, "dropping superseded point response");
            return false;
        }
        self.points.replace(result);
        true
    }

    /// Toggle a category and return the query that must replace the current points.
    pub fn toggle(&mut self, id: CategoryId) -> IssuedQuery {
        self.selection.toggle(id)
    }

    /// Current filter.
    #[must_use]
    pub fn filter(&self) -> &FilterState {
        self.selection.filter()
    }

    /// Close the pending notice.
    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Intent to open the detail screen of a point.
    #[must_use]
    pub fn open_detail(&self, id: PointId) -> Intent {
        Intent::Navigate(Route::Detail { id })
    }

    /// Intent to return to the home screen.
    #[must_use]
    pub fn back(&self) -> Intent {
        Intent::Navigate(Route::Home)
    }

    /// Overall readiness.
    #[must_use]
    pub fn phase(&self) -> DiscoveryPhase {
        match self.location {
            LocationState::PermissionDenied => DiscoveryPhase::LocationDenied,
            LocationState::Resolved(_) if self.categories.is_some() && self.points.applied => {
                DiscoveryPhase::Ready
            }
            LocationState::Resolved(_) => DiscoveryPhase::PartiallyReady,
            LocationState::Unresolved if self.categories.is_none() && !self.points.applied => {
                DiscoveryPhase::Loading
            }
            LocationState::Unresolved => DiscoveryPhase::PartiallyReady,
        }
    }

    /// Derive the render-ready snapshot.
    #[must_use]
    pub fn view(&self) -> DiscoveryView {
        let filter = self.selection.filter();
        let categories = self
            .categories
            .iter()
            .flatten()
            .map(|category| CategoryChip {
                selected: filter.is_selected(category.id),
                category: category.clone(),
            })
            .collect();

        let map = self.location.coordinate().map(|center| MapView {
            region: MapRegion::around(center),
            markers: self.points.points.clone(),
        });

        DiscoveryView {
            phase: self.phase(),
            categories,
            map,
            notice: self.notice.clone(),
            catalog_failure: self.catalog_failure.clone(),
            points_failure: self.points.failure.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::sync::{mpsc, oneshot};

    use super::*;
    use crate::backend::Backend;
    use crate::model::Coordinate;
    use crate::ports::CategoryFilter;
    use crate::service::ColetaService;
    use crate::testing::{FakeCatalog, FakeLocation, GatedPoints, category, point};

    fn catalog() -> Vec<Category> {
        vec![category(1, "Lamps"), category(2, "Batteries")]
    }

    #[test]
    fn toggles_fire_distinct_queries_in_order() {
        let mut model = DiscoveryViewModel::new(None, None);
        let start = model.activate();
        assert!(model.apply_categories(start.session, Ok(catalog())));
        assert_eq!(start.points.query.items, CategoryFilter::Unrestricted);

        let issued = [
            model.toggle(CategoryId(1)),
            model.toggle(CategoryId(2)),
            model.toggle(CategoryId(1)),
        ];
        let items = issued
            .iter()
            .map(|query| query.query.items.ids().to_vec())
            .collect::<Vec<_>>();

        assert_eq!(
            items,
            vec![
                vec![CategoryId(1)],
                vec![CategoryId(1), CategoryId(2)],
                vec![CategoryId(2)],
            ]
        );

        let [first, second, third] = issued;
        assert!(!model.apply_points(first.ticket, Ok(vec![point(10, "A", 1.0, 1.0)])));
        assert!(!model.apply_points(second.ticket, Ok(vec![point(11, "B", 1.0, 1.0)])));
        assert!(model.apply_points(third.ticket, Ok(vec![point(12, "C", 1.0, 1.0)])));

        let chips = model.view().categories;
        assert_eq!(
            chips.iter().map(|chip| chip.selected).collect::<Vec<_>>(),
            vec![false, true]
        );
    }

    #[test]
    fn late_response_of_older_query_is_ignored() {
        let mut model = DiscoveryViewModel::new(None, None);
        let start = model.activate();
        model.apply_location(
            start.session,
            LocationState::Resolved(Coordinate::new(-8.05, -34.9)),
        );

        let older = model.toggle(CategoryId(1));
        let newer = model.toggle(CategoryId(2));

        assert!(model.apply_points(newer.ticket, Ok(vec![point(2, "Newer", 1.0, 1.0)])));
        assert!(!model.apply_points(older.ticket, Ok(vec![point(1, "Older", 1.0, 1.0)])));

        let markers = model.view().map.expect("map visible").markers;
        assert_eq!(markers, vec![point(2, "Newer", 1.0, 1.0)]);
    }

    #[test]
    fn denied_location_hides_map_but_keeps_categories() {
        let mut model = DiscoveryViewModel::new(None, None);
        let start = model.activate();
        model.apply_categories(start.session, Ok(catalog()));
        assert!(model.apply_location(start.session, LocationState::PermissionDenied));

        let view = model.view();
        assert_eq!(view.phase, DiscoveryPhase::LocationDenied);
        assert!(view.map.is_none());
        assert_eq!(view.categories.len(), 2);
        assert_eq!(
            view.notice.map(|notice| notice.message),
            Some(LOCATION_NOTICE_MESSAGE.to_owned())
        );

        model.dismiss_notice();
        assert!(model.view().notice.is_none());
        // filtering still works
        let issued = model.toggle(CategoryId(2));
        assert!(model.apply_points(issued.ticket, Ok(Vec::new())));
    }

    #[test]
    fn map_waits_for_a_fix_and_accepts_zero_coordinates() {
        let mut model = DiscoveryViewModel::new(None, None);
        let start = model.activate();
        assert_eq!(model.phase(), DiscoveryPhase::Loading);
        model.apply_points(start.points.ticket, Ok(vec![point(1, "A", 0.0, 0.0)]));
        assert!(model.view().map.is_none());
        assert_eq!(model.phase(), DiscoveryPhase::PartiallyReady);

        model.apply_location(
            start.session,
            LocationState::Resolved(Coordinate::new(0.0, 12.5)),
        );
        let map = model.view().map.expect("map visible");
        assert_eq!(map.region.center, Coordinate::new(0.0, 12.5));
        assert_eq!(map.markers.len(), 1);
    }

    #[test]
    fn ready_once_everything_arrived() {
        let mut model = DiscoveryViewModel::new(Some("Recife".to_owned()), Some("PE".to_owned()));
        let start = model.activate();
        model.apply_categories(start.session, Ok(catalog()));
        model.apply_points(start.points.ticket, Ok(Vec::new()));
        assert_eq!(model.phase(), DiscoveryPhase::PartiallyReady);

        model.apply_location(
            start.session,
            LocationState::Resolved(Coordinate::new(-8.05, -34.9)),
        );
        assert_eq!(model.phase(), DiscoveryPhase::Ready);
    }

    #[test]
    fn failures_degrade_to_empty_results() {
        let mut model = DiscoveryViewModel::new(None, None);
        let start = model.activate();
        model.apply_categories(start.session, Err(PortError::Internal("boom".to_owned())));
        model.apply_points(start.points.ticket, Err(PortError::Decode("bad".to_owned())));

        let view = model.view();
        assert!(view.categories.is_empty());
        assert_eq!(view.catalog_failure.as_deref(), Some("Internal error: boom"));
        assert_eq!(view.points_failure.as_deref(), Some("Decode error: bad"));
        assert_eq!(view.phase, DiscoveryPhase::PartiallyReady);
    }

    #[test]
    fn responses_after_deactivation_are_dropped() {
        let mut model = DiscoveryViewModel::new(None, None);
        let start = model.activate();
        model.deactivate();

        assert!(!model.apply_categories(start.session, Ok(catalog())));
        assert!(!model.apply_points(start.points.ticket, Ok(Vec::new())));
        assert!(!model.apply_location(start.session, LocationState::PermissionDenied));

        let restart = model.activate();
        assert!(!model.apply_categories(start.session, Ok(catalog())));
        assert!(model.apply_categories(restart.session, Ok(catalog())));
    }

    #[test]
    fn toggling_while_inactive_does_not_apply_points() {
        let mut model = DiscoveryViewModel::new(None, None);
        model.activate();
        model.deactivate();

        let issued = model.toggle(CategoryId(1));
        assert!(!model.is_active());
        assert!(!model.apply_points(issued.ticket, Ok(vec![point(1, "A", 1.0, 1.0)])));
        assert!(model.filter().is_selected(CategoryId(1)));

        let restart = model.activate();
        assert_eq!(restart.points.query.items.ids(), &[CategoryId(1)]);
        assert!(model.apply_points(restart.points.ticket, Ok(Vec::new())));
    }

    #[test]
    fn navigation_is_emitted_as_intent() {
        let model = DiscoveryViewModel::new(None, None);
        assert_eq!(
            model.open_detail(PointId(42)),
            Intent::Navigate(Route::Detail { id: PointId(42) })
        );
        assert_eq!(model.back(), Intent::Navigate(Route::Home));
    }

    #[tokio::test]
    async fn out_of_order_responses_keep_last_issued_filter() {
        let (first_gate, first_rx) = oneshot::channel();
        let (second_gate, second_rx) = oneshot::channel();
        let points = GatedPoints::new(vec![
            (vec![CategoryId(1)], first_rx),
            (vec![CategoryId(1), CategoryId(2)], second_rx),
        ]);
        let service = Arc::new(ColetaService::new(
            Backend::new("fake", Arc::new(FakeCatalog::new(catalog())), Arc::new(points)),
            Arc::new(FakeLocation::granted(Coordinate::new(-8.05, -34.9))),
        ));

        let mut model = DiscoveryViewModel::new(None, None);
        let start = model.activate();
        model.apply_location(start.session, service.request_location().await);

        let (results_tx, mut results_rx) = mpsc::unbounded_channel();
        for issued in [model.toggle(CategoryId(1)), model.toggle(CategoryId(2))] {
            let service = Arc::clone(&service);
            let results_tx = results_tx.clone();
            tokio::spawn(async move {
                let result = service.query_points(&issued.query).await;
                results_tx.send((issued.ticket, result)).ok();
            });
        }

        second_gate
            .send(vec![point(2, "Second", 1.0, 1.0)])
            .expect("gate open");
        let (ticket, result) = results_rx.recv().await.expect("second response");
        assert!(model.apply_points(ticket, result));

        first_gate
            .send(vec![point(1, "First", 1.0, 1.0)])
            .expect("gate open");
        let (ticket, result) = results_rx.recv().await.expect("first response");
        assert!(!model.apply_points(ticket, result));

        let markers = model.view().map.expect("map visible").markers;
        assert_eq!(markers, vec![point(2, "Second", 1.0, 1.0)]);
    }
}
