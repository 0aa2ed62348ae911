//! Single-slot, auto-dismissing notification.
//!
//! The notifier never reads a clock on its own during expiry: the host calls
//! [`ToastNotifier::tick`] with the current instant, and the notifier reports
//! the transition back to idle exactly once.

use std::fmt;
use std::time::{Duration, Instant};

/// How long a toast stays visible without interaction.
pub const DISMISS_AFTER: Duration = Duration::from_millis(3500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Warning,
    Error,
}

impl ToastKind {
    pub fn label(self) -> &'static str {
        match self {
            ToastKind::Info => "info",
            ToastKind::Success => "success",
            ToastKind::Warning => "warning",
            ToastKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
}

impl fmt::Display for Toast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind.label(), self.message)
    }
}

#[derive(Debug, Clone)]
struct Visible {
    toast: Toast,
    expires_at: Instant,
}

#[derive(Debug, Clone, Default)]
pub struct ToastNotifier {
    visible: Option<Visible>,
}

impl ToastNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `message`, replacing whatever is visible and restarting the timer.
    pub fn show(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.show_at(message, kind, Instant::now());
    }

    pub fn show_at(&mut self, message: impl Into<String>, kind: ToastKind, now: Instant) {
        self.visible = Some(Visible {
            toast: Toast {
                message: message.into(),
                kind,
            },
            expires_at: now + DISMISS_AFTER,
        });
    }

    pub fn current(&self) -> Option<&Toast> {
        self.visible.as_ref().map(|v| &v.toast)
    }

    pub fn expires_at(&self) -> Option<Instant> {
        self.visible.as_ref().map(|v| v.expires_at)
    }

    /// Manual close. Returns whether a toast was visible.
    pub fn dismiss(&mut self) -> bool {
        self.visible.take().is_some()
    }

    /// Expire the toast if its deadline has passed. Returns `true` only on
    /// the call that performs the dismissal.
    pub fn tick(&mut self, now: Instant) -> bool {
        match &self.visible {
            Some(v) if now >= v.expires_at => {
                self.visible = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle() {
        let notifier = ToastNotifier::new();
        assert!(notifier.current().is_none());
        assert!(notifier.expires_at().is_none());
    }

    #[test]
    fn expires_exactly_once_after_timeout() {
        let start = Instant::now();
        let mut notifier = ToastNotifier::new();
        notifier.show_at("Saved", ToastKind::Success, start);

        assert!(!notifier.tick(start + Duration::from_millis(3499)));
        assert_eq!(notifier.current().map(|t| t.message.as_str()), Some("Saved"));

        assert!(notifier.tick(start + DISMISS_AFTER));
        assert!(notifier.current().is_none());
        assert!(!notifier.tick(start + Duration::from_secs(10)));
    }

    #[test]
    fn new_toast_replaces_and_restarts_timer() {
        let start = Instant::now();
        let mut notifier = ToastNotifier::new();
        notifier.show_at("first", ToastKind::Info, start);
        notifier.show_at("second", ToastKind::Error, start + Duration::from_secs(3));

        assert!(!notifier.tick(start + DISMISS_AFTER));
        let toast = notifier.current().unwrap();
        assert_eq!(toast.message, "second");
        assert_eq!(toast.kind, ToastKind::Error);
        assert!(notifier.tick(start + Duration::from_secs(3) + DISMISS_AFTER));
    }

    #[test]
    fn manual_dismiss_preempts_timer() {
        let start = Instant::now();
        let mut notifier = ToastNotifier::new();
        notifier.show_at("bye", ToastKind::Info, start);

        assert!(notifier.dismiss());
        assert!(!notifier.dismiss());
        assert!(!notifier.tick(start + DISMISS_AFTER));
    }

    #[test]
    fn display_includes_kind() {
        let toast = Toast {
            message: "Task created".to_string(),
            kind: ToastKind::Success,
        };
        assert_eq!(toast.to_string(), "[success] Task created");
    }
}
