use std::time::{Duration, Instant};

const TOAST_DURATION: Duration = Duration::from_secs(3);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
}

/// At most one toast is visible at a time. Showing a new toast replaces the
/// current one and restarts the auto-dismiss deadline. Time is injected so
/// callers (and tests) control the clock.
#[derive(Debug, Default)]
pub struct ToastSlot {
    current: Option<(Toast, Instant)>,
}

impl ToastSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(
        &mut self,
        message: impl Into<String>,
        kind: ToastKind,
        now: Instant,
    ) {
        self.current = Some((
            Toast {
                message: message.into(),
                kind,
            },
            now + TOAST_DURATION,
        ));
    }

    /// The visible toast, if any. Expired toasts are dropped on access.
    pub fn current(&mut self, now: Instant) -> Option<&Toast> {
        if let Some((_, deadline)) = self.current {
            if now >= deadline {
                self.current = None;
            }
        }
        self.current.as_ref().map(|(toast, _)| toast)
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn toast_expires_after_duration() {
        let t0 = Instant::now();
        let mut slot = ToastSlot::new();
        slot.show("saved", ToastKind::Success, t0);
        assert!(slot.current(t0 + Duration::from_secs(2)).is_some());
        assert!(slot.current(t0 + Duration::from_secs(4)).is_none());
    }

    #[test]
    fn new_toast_replaces_current_and_restarts_deadline() {
        let t0 = Instant::now();
        let mut slot = ToastSlot::new();
        slot.show("first", ToastKind::Info, t0);
        slot.show("second", ToastKind::Error, t0 + Duration::from_secs(2));
        let toast = slot.current(t0 + Duration::from_secs(4)).unwrap();
        assert_eq!(toast.message, "second");
        assert_eq!(toast.kind, ToastKind::Error);
    }

    #[test]
    fn explicit_dismiss() {
        let t0 = Instant::now();
        let mut slot = ToastSlot::new();
        slot.show("gone", ToastKind::Info, t0);
        slot.dismiss();
        assert!(slot.current(t0).is_none());
    }
}
