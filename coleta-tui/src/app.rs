use chrono::{DateTime, Local};
use coleta_core::{CategoryId, DetailViewModel, DiscoveryViewModel, PointId};

use crate::config::{Config, ContactConfig};
use crate::tasks::Update;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Points,
    Detail,
}

/// Which part of the points screen receives list navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Focus {
    Categories,
    Map,
}

pub(crate) struct App {
    pub screen: Screen,
    pub focus: Focus,
    pub discovery: DiscoveryViewModel,
    pub detail: DetailViewModel,
    pub contact: ContactConfig,

    pub category_index: usize,
    pub marker_index: usize,
    pub points_refreshed_at: Option<DateTime<Local>>,

    pub status_message: Option<String>,
}

impl App {
    pub(crate) fn new(config: &Config) -> Self {
        Self {
            screen: Screen::Points,
            focus: Focus::Categories,
            discovery: DiscoveryViewModel::new(
                config.region.city.clone(),
                config.region.state.clone(),
            ),
            detail: DetailViewModel::default(),
            contact: config.contact.clone(),
            category_index: 0,
            marker_index: 0,
            points_refreshed_at: None,
            status_message: None,
        }
    }

    /// Route a finished fetch to its view model.
    pub(crate) fn apply(&mut self, update: Update) -> bool {
        let applied = match update {
            Update::Categories { session, result } => {
                self.discovery.apply_categories(session, result)
            }
            Update::Location { session, state } => self.discovery.apply_location(session, state),
            Update::Points { ticket, result } => {
                let applied = self.discovery.apply_points(ticket, result);
                if applied {
                    self.points_refreshed_at = Some(Local::now());
                }
                applied
            }
            Update::Detail { ticket, result } => self.detail.apply(ticket, result),
        };
        self.clamp_indices();
        applied
    }

    pub(crate) fn current_category(&self) -> Option<CategoryId> {
        self.discovery
            .view()
            .categories
            .get(self.category_index)
            .map(|chip| chip.category.id)
    }

    pub(crate) fn current_marker(&self) -> Option<PointId> {
        self.discovery
            .view()
            .map?
            .markers
            .get(self.marker_index)
            .map(|point| point.id)
    }

    fn clamp_indices(&mut self) {
        let view = self.discovery.view();
        let markers = view.map.map_or(0, |map| map.markers.len());
        self.category_index = self
            .category_index
            .min(view.categories.len().saturating_sub(1));
        self.marker_index = self.marker_index.min(markers.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use coleta_core::{Category, CollectionPoint, Coordinate, LocationState};

    use super::*;

    fn category(id: i64, title: &str) -> Category {
        Category {
            id: CategoryId(id),
            title: title.to_owned(),
            image_url: String::new(),
        }
    }

    fn point(id: i64) -> CollectionPoint {
        CollectionPoint {
            id: PointId(id),
            name: format!("Ponto {id}"),
            image_url: String::new(),
            position: Coordinate::new(-8.05, -34.9),
        }
    }

    #[test]
    fn updates_reach_the_discovery_model() {
        let mut app = App::new(&Config::default());
        let start = app.discovery.activate();

        assert!(app.apply(Update::Categories {
            session: start.session,
            result: Ok(vec![category(1, "Lamps"), category(2, "Batteries")]),
        }));
        assert!(app.apply(Update::Location {
            session: start.session,
            state: LocationState::Resolved(Coordinate::new(-8.05, -34.9)),
        }));
        assert!(app.apply(Update::Points {
            ticket: start.points.ticket,
            result: Ok(vec![point(7), point(8)]),
        }));

        assert!(app.points_refreshed_at.is_some());
        assert_eq!(app.current_category(), Some(CategoryId(1)));
        app.marker_index = 1;
        assert_eq!(app.current_marker(), Some(PointId(8)));
    }

    #[test]
    fn shrinking_results_clamp_selection() {
        let mut app = App::new(&Config::default());
        let start = app.discovery.activate();
        app.apply(Update::Location {
            session: start.session,
            state: LocationState::Resolved(Coordinate::new(1.0, 1.0)),
        });
        app.apply(Update::Points {
            ticket: start.points.ticket,
            result: Ok(vec![point(1), point(2), point(3)]),
        });
        app.marker_index = 2;

        let issued = app.discovery.toggle(CategoryId(9));
        app.apply(Update::Points {
            ticket: issued.ticket,
            result: Ok(vec![point(1)]),
        });
        assert_eq!(app.marker_index, 0);
    }
}
