//! Nullable notifier: records notifications instead of showing them.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use tixgate_notify::{Notification, NotificationHandle, Notifier};

/// A notifier that records what would have been shown.
pub struct NullNotifier {
    shown: Mutex<Vec<(NotificationHandle, Notification)>>,
    dismissed: Mutex<Vec<NotificationHandle>>,
    next: AtomicU64,
}

impl NullNotifier {
    pub fn new() -> Self {
        Self {
            shown: Mutex::new(Vec::new()),
            dismissed: Mutex::new(Vec::new()),
            next: AtomicU64::new(1),
        }
    }

    /// Everything shown, in order.
    pub fn notifications(&self) -> Vec<Notification> {
        self.shown
            .lock()
            .unwrap()
            .iter()
            .map(|(_, n)| n.clone())
            .collect()
    }

    pub fn titles(&self) -> Vec<String> {
        self.notifications().into_iter().map(|n| n.title).collect()
    }

    pub fn descriptions(&self) -> Vec<String> {
        self.notifications()
            .into_iter()
            .map(|n| n.description)
            .collect()
    }

    /// How many notifications carried `title`.
    pub fn count_titled(&self, title: &str) -> usize {
        self.notifications()
            .iter()
            .filter(|n| n.title == title)
            .count()
    }

    /// Notifications shown and not yet dismissed.
    pub fn active(&self) -> Vec<Notification> {
        let dismissed = self.dismissed.lock().unwrap().clone();
        self.shown
            .lock()
            .unwrap()
            .iter()
            .filter(|(h, _)| !dismissed.contains(h))
            .map(|(_, n)| n.clone())
            .collect()
    }

    pub fn dismissed_count(&self) -> usize {
        self.dismissed.lock().unwrap().len()
    }

    /// Clear all state.
    pub fn reset(&self) {
        self.shown.lock().unwrap().clear();
        self.dismissed.lock().unwrap().clear();
    }
}

impl Default for NullNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for NullNotifier {
    fn notify(&self, notification: Notification) -> NotificationHandle {
        let handle = NotificationHandle(self.next.fetch_add(1, Ordering::Relaxed));
        self.shown.lock().unwrap().push((handle, notification));
        handle
    }

    fn dismiss(&self, handle: NotificationHandle) {
        let mut dismissed = self.dismissed.lock().unwrap();
        if !dismissed.contains(&handle) {
            dismissed.push(handle);
        }
    }
}
