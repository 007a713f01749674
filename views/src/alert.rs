//! Dismissible inline alerts.

/// Alert colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    /// Something failed.
    Error,
    /// Something worked.
    Success,
    /// Neutral notice.
    Info,
}

/// One alert as shown above a form or list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// Identifies this alert for dismissal.
    pub id: u64,
    /// Text to show.
    pub message: String,
    /// Colour.
    pub kind: AlertKind,
}

/// The single alert slot of a page. A new alert replaces the old one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertSlot {
    issued: u64,
    current: Option<Alert>,
}

impl AlertSlot {
    /// Show `message`, replacing whatever was there. Returns the new id.
    pub fn raise(&mut self, kind: AlertKind, message: impl Into<String>) -> u64 {
        self.issued += 1;
        self.current = Some(Alert {
            id: self.issued,
            message: message.into(),
            kind,
        });
        self.issued
    }

    /// Remove the alert if `id` is still the one shown.
    pub fn dismiss(&mut self, id: u64) {
        if self.current.as_ref().is_some_and(|alert| alert.id == id) {
            self.current = None;
        }
    }

    /// Remove whatever is shown.
    pub fn clear(&mut self) {
        self.current = None;
    }

    /// The alert being shown.
    #[must_use]
    pub const fn current(&self) -> Option<&Alert> {
        self.current.as_ref()
    }

    /// Text of the alert being shown.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.current.as_ref().map(|alert| alert.message.as_str())
    }
}
