//! Category selection state and the re-query trigger it drives.

use std::collections::BTreeSet;

use tracing::debug;

use crate::freshness::{Ticket, TicketCounter};
use crate::model::CategoryId;
use crate::ports::{CategoryFilter, PointQuery};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Active filters of the discovery screen.
pub struct FilterState {
    selected: BTreeSet<CategoryId>,
    city: Option<String>,
    state: Option<String>,
}

impl FilterState {
    /// Filter with no category selected, optionally scoped to a city and state.
    #[must_use]
    pub fn new(city: Option<String>, state: Option<String>) -> Self {
        Self {
            selected: BTreeSet::new(),
            city,
            state,
        }
    }

    /// Add `id` if absent, remove it if present. Returns whether it is now selected.
    pub fn toggle(&mut self, id: CategoryId) -> bool {
        if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id)
        }
    }

    /// Check whether a category is selected.
    #[must_use]
    pub fn is_selected(&self, id: CategoryId) -> bool {
        self.selected.contains(&id)
    }

    /// Selected category ids in ascending order.
    #[must_use]
    pub fn selected(&self) -> &BTreeSet<CategoryId> {
        &self.selected
    }

    /// City restriction, if any.
    #[must_use]
    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    /// State restriction, if any.
    #[must_use]
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    /// Point query matching this filter.
    #[must_use]
    pub fn to_query(&self) -> PointQuery {
        PointQuery {
            city: self.city.clone(),
            state: self.state.clone(),
            items: CategoryFilter::from_selection(&self.selected),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A point query the caller must run, tagged with its freshness ticket.
pub struct IssuedQuery {
    /// Ticket to hand back together with the response.
    pub ticket: Ticket,
    /// Query to run.
    pub query: PointQuery,
}

#[derive(Debug, Default)]
/// Sole owner of [`FilterState`]; issues a fresh query on every change.
pub struct SelectionController {
    filter: FilterState,
    tickets: TicketCounter,
}

impl SelectionController {
    /// Controller with nothing selected, scoped to the given route parameters.
    #[must_use]
    pub fn new(city: Option<String>, state: Option<String>) -> Self {
        Self {
            filter: FilterState::new(city, state),
            tickets: TicketCounter::default(),
        }
    }

    /// Current filter.
    #[must_use]
    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Issue a query for the current filter without changing it.
    pub fn refresh(&mut self) -> IssuedQuery {
        let ticket = self.tickets.issue();
        let query = self.filter.to_query();
        debug!(%ticket, items = ?query.items, "issuing point query");
        IssuedQuery { ticket, query }
    }

    /// Toggle a category and issue the query for the resulting filter.
    pub fn toggle(&mut self, id: CategoryId) -> IssuedQuery {
        let selected = self.filter.toggle(id);
        debug!(category = %id, selected, "category toggled");
        self.refresh()
    }

    /// Check whether a response for `ticket` may still be applied.
    #[must_use]
    pub fn accepts(&self, ticket: Ticket) -> bool {
        self.tickets.is_current(ticket)
    }

    /// Make every outstanding query stale.
    pub fn revoke(&mut self) {
        self.tickets.revoke();
    }
}
