//! Background fetches; each reports back to the event loop with the ticket it was issued under.

use std::sync::Arc;

use coleta_core::{
    Category, CollectionPoint, ColetaService, DetailRequest, DiscoveryStart, IssuedQuery,
    LocationState, PointDetail, PortError, Ticket,
};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

/// Result of a finished fetch, applied on the event loop.
#[derive(Debug)]
pub(crate) enum Update {
    Categories {
        session: Ticket,
        result: Result<Vec<Category>, PortError>,
    },
    Location {
        session: Ticket,
        state: LocationState,
    },
    Points {
        ticket: Ticket,
        result: Result<Vec<CollectionPoint>, PortError>,
    },
    Detail {
        ticket: Ticket,
        result: Result<PointDetail, PortError>,
    },
}

pub(crate) struct Tasks {
    service: Arc<ColetaService>,
    updates: UnboundedSender<Update>,
}

impl Tasks {
    pub(crate) fn new(service: Arc<ColetaService>, updates: UnboundedSender<Update>) -> Self {
        Self { service, updates }
    }

    /// Run the catalog fetch, the location request, and the first point query.
    pub(crate) fn start_discovery(&self, start: DiscoveryStart) {
        let session = start.session;

        let service = Arc::clone(&self.service);
        let updates = self.updates.clone();
        tokio::spawn(async move {
            let result = service.categories().await;
            send(&updates, Update::Categories { session, result });
        });

        let service = Arc::clone(&self.service);
        let updates = self.updates.clone();
        tokio::spawn(async move {
            let state = service.request_location().await;
            send(&updates, Update::Location { session, state });
        });

        self.query_points(start.points);
    }

    pub(crate) fn query_points(&self, issued: IssuedQuery) {
        let service = Arc::clone(&self.service);
        let updates = self.updates.clone();
        tokio::spawn(async move {
            let result = service.query_points(&issued.query).await;
            send(
                &updates,
                Update::Points {
                    ticket: issued.ticket,
                    result,
                },
            );
        });
    }

    pub(crate) fn load_detail(&self, request: DetailRequest) {
        let service = Arc::clone(&self.service);
        let updates = self.updates.clone();
        tokio::spawn(async move {
            let result = service.point_detail(request.id).await;
            send(
                &updates,
                Update::Detail {
                    ticket: request.ticket,
                    result,
                },
            );
        });
    }
}

fn send(updates: &UnboundedSender<Update>, update: Update) {
    if updates.send(update).is_err() {
        debug!("event loop gone, dropping update");
    }
}
