//! Operator-facing notifications.
//!
//! Every user-visible outcome of the gate is a short title + description.
//! The [`Notifier`] trait is the seam to whatever renders them.

pub mod notification;
pub mod terminal;

pub use notification::{Notification, NotificationHandle, Notifier, Persistence, Variant};
pub use terminal::TerminalNotifier;
