//! Descriptions of side effects that view models hand to external collaborators.

use reqwest::Url;

use crate::model::PointId;

/// Screens a navigation intent can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Landing screen where city and state are chosen.
    Home,
    /// Discovery list and map.
    Points,
    /// Detail of a single point.
    Detail {
        /// Point to show.
        id: PointId,
    },
}

impl Route {
    /// Screen name understood by the navigation collaborator.
    #[must_use]
    pub fn screen_name(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Points => "Points",
            Route::Detail { .. } => "Detail",
        }
    }
}

/// E-mail the mail collaborator should pre-fill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailDraft {
    /// Subject line.
    pub subject: String,
    /// Recipient addresses.
    pub recipients: Vec<String>,
}

impl EmailDraft {
    /// `mailto:` form of the draft.
    #[must_use]
    pub fn uri(&self) -> Option<Url> {
        let target = format!("mailto:{}", self.recipients.join(","));
        Url::parse_with_params(&target, &[("subject", self.subject.as_str())]).ok()
    }
}

/// Message the messaging collaborator should try to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDraft {
    /// Recipient phone number.
    pub phone: String,
    /// Pre-filled message text.
    pub text: String,
}

impl MessageDraft {
    /// `whatsapp://send` form of the draft.
    #[must_use]
    pub fn uri(&self) -> Option<Url> {
        Url::parse_with_params(
            "whatsapp://send",
            &[("phone", self.phone.as_str()), ("text", self.text.as_str())],
        )
        .ok()
    }
}

/// Side effect requested by a view model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Move to another screen.
    Navigate(Route),
    /// Open the mail composer.
    ComposeEmail(EmailDraft),
    /// Open a messaging conversation.
    ComposeMessage(MessageDraft),
}
