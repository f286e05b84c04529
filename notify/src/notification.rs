//! Notification model and the notifier seam.

use std::time::Duration;

/// Visual emphasis of a notification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Variant {
    #[default]
    Default,
    /// Errors and denials.
    Destructive,
}

/// How long a notification stays up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Persistence {
    /// The renderer's default lifetime.
    #[default]
    Auto,
    For(Duration),
    /// Stays until explicitly dismissed.
    Indefinite,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: Variant,
    pub persistence: Persistence,
}

impl Notification {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: Variant::Default,
            persistence: Persistence::Auto,
        }
    }

    pub fn destructive(mut self) -> Self {
        self.variant = Variant::Destructive;
        self
    }

    pub fn indefinite(mut self) -> Self {
        self.persistence = Persistence::Indefinite;
        self
    }

    /// Keep the notification up for `duration` instead of the default.
    pub fn lasting(mut self, duration: Duration) -> Self {
        self.persistence = Persistence::For(duration);
        self
    }

    pub fn is_destructive(&self) -> bool {
        self.variant == Variant::Destructive
    }
}

/// Identifies a shown notification so it can be dismissed later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NotificationHandle(pub u64);

/// Renders notifications to the operator.
pub trait Notifier: Send + Sync {
    /// Show a notification.
    fn notify(&self, notification: Notification) -> NotificationHandle;

    /// Retract a notification. Unknown or already-dismissed handles are ignored.
    fn dismiss(&self, handle: NotificationHandle);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let n = Notification::new("Transaction Successful", "Ticket expired successfully!");
        assert_eq!(n.variant, Variant::Default);
        assert_eq!(n.persistence, Persistence::Auto);
        assert!(!n.is_destructive());
    }

    #[test]
    fn builder_modifiers() {
        let n = Notification::new("Error", "Invalid Token ID").destructive();
        assert!(n.is_destructive());
        let p = Notification::new("Transaction in progress", "...").indefinite();
        assert_eq!(p.persistence, Persistence::Indefinite);
    }

    #[test]
    fn lasting_sets_duration() {
        let n = Notification::new("Error", "Invalid Token ID")
            .destructive()
            .lasting(Duration::from_secs(5));
        assert_eq!(n.persistence, Persistence::For(Duration::from_secs(5)));
        assert!(n.is_destructive());
    }
}
