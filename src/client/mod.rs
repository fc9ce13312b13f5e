//! # Checklist Client
//!
//! Client-side counterpart of the web API: a typed HTTP client, a session
//! that mirrors one checklist locally, and field editors that persist edits
//! through the [auto-save coordinator](crate::autosave).
//!
//! Failures never propagate into UI code as panics. They are logged and
//! reported as [`Notice`]s on a channel the caller owns.

pub mod api;
pub mod editors;
pub mod http;
pub mod session;

pub use api::ChecklistApi;
pub use editors::{ItemEditor, TitleEditor};
pub use http::{ChecklistApiClient, ChecklistApiConfig};
pub use session::{ChecklistSession, Progress};

use tokio::sync::mpsc;

/// Non-blocking user notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

pub type NoticeSender = mpsc::UnboundedSender<Notice>;

pub(crate) fn notify(notices: &NoticeSender, notice: Notice) {
    // Nobody listening is fine
    let _ = notices.send(notice);
}
