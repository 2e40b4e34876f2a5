//! Stand-in for the navigation, mail, and messaging collaborators.
//!
//! The terminal cannot hand a draft to a native composer, so contact intents are turned into
//! their URI form and surfaced in the status bar and the log for the user to open.

use coleta_core::{DetailRequest, Intent, Route};
use tracing::{info, warn};

use crate::app::{App, Screen};

/// Work the event loop has to start after an intent was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Followup {
    None,
    Quit,
    LoadDetail(DetailRequest),
}

pub(crate) fn dispatch(intent: Intent, app: &mut App) -> Followup {
    match intent {
        Intent::Navigate(route) => navigate(route, app),
        Intent::ComposeEmail(draft) => {
            match draft.uri() {
                Some(uri) => {
                    info!(%uri, "compose email");
                    app.status_message = Some(format!("Open mail composer: {uri}"));
                }
                None => {
                    warn!(recipients = ?draft.recipients, "cannot build mailto uri");
                    app.status_message = Some("Cannot compose e-mail for this point".to_owned());
                }
            }
            Followup::None
        }
        Intent::ComposeMessage(draft) => {
            match draft.uri() {
                Some(uri) => {
                    info!(%uri, "compose message");
                    app.status_message = Some(format!("Open WhatsApp: {uri}"));
                }
                None => {
                    warn!(phone = %draft.phone, "cannot build whatsapp uri");
                    app.status_message = Some("Cannot open WhatsApp for this point".to_owned());
                }
            }
            Followup::None
        }
    }
}

fn navigate(route: Route, app: &mut App) -> Followup {
    info!(screen = route.screen_name(), "navigate");
    app.status_message = None;
    match route {
        Route::Detail { id } => {
            app.screen = Screen::Detail;
            Followup::LoadDetail(app.detail.load(id))
        }
        Route::Points => {
            app.detail.leave();
            app.screen = Screen::Points;
            Followup::None
        }
        // Home lives outside this app; leaving the points screen ends the session.
        Route::Home => {
            app.detail.leave();
            app.discovery.deactivate();
            Followup::Quit
        }
    }
}
