use std::sync::atomic::{AtomicBool, Ordering};

/// Lifecycle flags shared by the session, the engine and stop requesters.
///
/// One instance is shared per host page (usually behind an `Arc`). At most
/// one session may hold it active at a time.
#[derive(Debug, Default)]
pub struct RunState {
    active: AtomicBool,
    executing: AtomicBool,
    stop_requested: AtomicBool,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A session is open on this page
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// A run is executing items
    pub fn is_executing(&self) -> bool {
        self.executing.load(Ordering::SeqCst)
    }

    pub fn stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::SeqCst)
    }

    /// Ask the current scan or run to stop at its next wait.
    ///
    /// Only has an effect while a session is active or a run is executing.
    /// Returns whether this call raised the flag.
    pub fn request_stop(&self) -> bool {
        if !self.is_active() && !self.is_executing() {
            log::debug!("Stop requested while idle, clearing stale flag");
            self.stop_requested.store(false, Ordering::SeqCst);
            return false;
        }
        let raised = !self.stop_requested.swap(true, Ordering::SeqCst);
        if raised {
            log::info!("Stop requested");
        }
        raised
    }

    /// Mark the page as owned by a session. Fails if one already is.
    pub(crate) fn try_activate(&self) -> bool {
        let acquired = self
            .active
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok();
        if acquired {
            self.stop_requested.store(false, Ordering::SeqCst);
        }
        acquired
    }

    /// Enter the executing phase. Fails if a run is already executing.
    pub(crate) fn begin_execution(&self) -> bool {
        self.executing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub(crate) fn end_execution(&self) {
        self.executing.store(false, Ordering::SeqCst);
    }

    pub(crate) fn clear_stop(&self) {
        self.stop_requested.store(false, Ordering::SeqCst);
    }

    /// Back to initial values; used on dismissal
    pub(crate) fn reset(&self) {
        self.executing.store(false, Ordering::SeqCst);
        self.stop_requested.store(false, Ordering::SeqCst);
        self.active.store(false, Ordering::SeqCst);
    }
}
