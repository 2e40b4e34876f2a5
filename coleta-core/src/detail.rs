//! View model of the detail screen of a single collection point.

use tracing::{debug, info};

use crate::freshness::{Ticket, TicketCounter};
use crate::intent::{EmailDraft, Intent, MessageDraft, Route};
use crate::model::{PointDetail, PointId};
use crate::ports::PortError;

/// Subject used for contact e-mails unless configured otherwise.
pub const DEFAULT_EMAIL_SUBJECT: &str = "Interesse na coleta de resíduos";
/// Text used for contact messages unless configured otherwise.
pub const DEFAULT_MESSAGE_TEXT: &str = "Tenho interesse sobre coleta de resíduos";

#[derive(Debug, Clone, PartialEq)]
/// Lifecycle of the detail lookup.
///
/// Only [`DetailState::Loaded`] renders anything; the other states are kept apart for logs
/// and tests but all show an empty screen.
pub enum DetailState {
    /// No lookup requested yet.
    Idle,
    /// Waiting for the point.
    Loading(PointId),
    /// Point received.
    Loaded(PointDetail),
    /// The collaborator does not know the id.
    NotFound(PointId),
    /// The lookup failed for another reason.
    Unavailable(PointId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Detail lookup the caller must run.
pub struct DetailRequest {
    /// Ticket to hand back with the response.
    pub ticket: Ticket,
    /// Point to fetch.
    pub id: PointId,
}

impl PointDetail {
    /// Accepted category titles joined for display, e.g. `"Lamps, Batteries"`.
    #[must_use]
    pub fn items_summary(&self) -> String {
        self.items
            .iter()
            .map(|item| item.title.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `"city, state"` line of the address block.
    #[must_use]
    pub fn address_line(&self) -> String {
        format!("{}, {}", self.point.city, self.point.state)
    }
}

/// State of the detail screen.
#[derive(Debug)]
pub struct DetailViewModel {
    tickets: TicketCounter,
    state: DetailState,
}

impl Default for DetailViewModel {
    fn default() -> Self {
        Self {
            tickets: TicketCounter::default(),
            state: DetailState::Idle,
        }
    }
}

impl DetailViewModel {
    /// Start loading `id`, superseding any lookup still in flight.
    pub fn load(&mut self, id: PointId) -> DetailRequest {
        let ticket = self.tickets.issue();
        self.state = DetailState::Loading(id);
        info!(point = %id, %ticket, "loading point detail");
        DetailRequest { ticket, id }
    }

    /// Apply a lookup response. Returns `false` when a newer lookup superseded it.
    pub fn apply(&mut self, ticket: Ticket, result: Result<PointDetail, PortError>) -> bool {
        if !self.tickets.is_current(ticket) {
            debug!(%ticket, "dropping superseded detail response");
            return false;
        }
        let DetailState::Loading(id) = self.state else {
            return false;
        };
        self.state = match result {
            Ok(detail) => DetailState::Loaded(detail),
            Err(PortError::NotFound) => {
                debug!(point = %id, "point not found, rendering nothing");
                DetailState::NotFound(id)
            }
            Err(err) => {
                debug!(point = %id, error = %err, "detail lookup failed, rendering nothing");
                DetailState::Unavailable(id)
            }
        };
        true
    }

    /// Leave the screen; a response still in flight becomes stale.
    pub fn leave(&mut self) {
        self.tickets.revoke();
        self.state = DetailState::Idle;
    }

    /// Lifecycle state.
    #[must_use]
    pub fn state(&self) -> &DetailState {
        &self.state
    }

    /// The point to render, `None` for every state that renders nothing.
    #[must_use]
    pub fn view(&self) -> Option<&PointDetail> {
        match &self.state {
            DetailState::Loaded(detail) => Some(detail),
            DetailState::Idle
            | DetailState::Loading(_)
            | DetailState::NotFound(_)
            | DetailState::Unavailable(_) => None,
        }
    }

    /// Intent to e-mail the loaded point, if it has an address.
    #[must_use]
    pub fn compose_email(&self, subject: &str) -> Option<Intent> {
        let detail = self.view()?;
        let recipient = detail.point.email.trim();
        if recipient.is_empty() {
            return None;
        }
        Some(Intent::ComposeEmail(EmailDraft {
            subject: subject.to_owned(),
            recipients: vec![recipient.to_owned()],
        }))
    }

    /// Intent to message the loaded point, if it has a phone number.
    #[must_use]
    pub fn compose_message(&self, text: &str) -> Option<Intent> {
        let detail = self.view()?;
        let phone = detail.point.whatsapp.trim();
        if phone.is_empty() {
            return None;
        }
        Some(Intent::ComposeMessage(MessageDraft {
            phone: phone.to_owned(),
            text: text.to_owned(),
        }))
    }

    /// Intent to return to the discovery screen.
    #[must_use]
    pub fn back(&self) -> Intent {
        Intent::Navigate(Route::Points)
    }
}
