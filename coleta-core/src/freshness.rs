//! Tickets that let an owner recognise which asynchronous response is still wanted.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Token attached to an issued request.
pub struct Ticket(u64);

impl fmt::Display for Ticket {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "#{}", self.0)
    }
}

#[derive(Debug, Default)]
/// Issues monotonically increasing tickets; only the newest one is current.
pub struct TicketCounter {
    latest: u64,
}

impl TicketCounter {
    /// Issue a new ticket, superseding every earlier one.
    pub fn issue(&mut self) -> Ticket {
        self.latest = self.latest.wrapping_add(1);
        Ticket(self.latest)
    }

    /// Supersede every outstanding ticket without issuing a new one.
    pub fn revoke(&mut self) {
        self.latest = self.latest.wrapping_add(1);
    }

    /// Check whether `ticket` is the most recently issued one.
    #[must_use]
    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }
}
