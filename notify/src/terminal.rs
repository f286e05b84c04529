//! Line-oriented notifier for terminal sessions.

use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::notification::{Notification, NotificationHandle, Notifier, Persistence, Variant};

/// Writes one line per notification.
///
/// Indefinite notifications get a closing line when dismissed, since a
/// terminal cannot retract what it already printed.
pub struct TerminalNotifier<W: Write + Send> {
    out: Mutex<W>,
    next: AtomicU64,
    open: Mutex<Vec<(NotificationHandle, String)>>,
}

impl TerminalNotifier<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> TerminalNotifier<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            next: AtomicU64::new(1),
            open: Mutex::new(Vec::new()),
        }
    }

    /// Consume the notifier and return its writer.
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Close every indefinite notification still open, printing `note` for
    /// each, and return how many there were.
    ///
    /// For shutdown paths where the work behind a progress notification was
    /// dropped rather than finished.
    pub fn abandon_open(&self, note: &str) -> usize {
        let open = std::mem::take(
            &mut *self.open.lock().unwrap_or_else(|poisoned| poisoned.into_inner()),
        );
        for (_, title) in &open {
            self.write_line(&format!("[gone] {title}: {note}"));
        }
        open.len()
    }

    fn write_line(&self, line: &str) {
        let mut out = self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(e) = writeln!(out, "{line}").and_then(|_| out.flush()) {
            tracing::warn!("failed to write notification: {e}");
        }
    }
}

fn marker(notification: &Notification) -> &'static str {
    match (notification.variant, notification.persistence) {
        (Variant::Destructive, _) => "[error]",
        (_, Persistence::Indefinite) => "[....]",
        _ => "[ ok ]",
    }
}

impl<W: Write + Send> Notifier for TerminalNotifier<W> {
    fn notify(&self, notification: Notification) -> NotificationHandle {
        let handle = NotificationHandle(self.next.fetch_add(1, Ordering::Relaxed));
        self.write_line(&format!(
            "{} {}: {}",
            marker(&notification),
            notification.title,
            notification.description
        ));
        if notification.persistence == Persistence::Indefinite {
            self.open
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .push((handle, notification.title));
        }
        handle
    }

    fn dismiss(&self, handle: NotificationHandle) {
        let title = {
            let mut open = self.open.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            let Some(pos) = open.iter().position(|(h, _)| *h == handle) else {
                return;
            };
            open.remove(pos).1
        };
        self.write_line(&format!("[done] {title}"));
    }
}
