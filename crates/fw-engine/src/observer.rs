//! Blocking-state change notifications for the presentation layer.

use std::sync::mpsc::Sender;

use fw_core::WayId;

/// One road changing state.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BlockingChange {
    pub way: WayId,
    pub blocked: bool,
}

/// Callback invoked by the [`Engine`](crate::Engine) after a road's blocked
/// state actually changes.  Idempotent calls that change nothing are not
/// reported.
///
/// Takes `&self` because the engine is shared (the flood monitor toggles
/// from its own thread), so implementations must be `Send + Sync` and use
/// interior mutability if they keep state.
///
/// # Example: redraw on change
///
/// ```rust,ignore
/// struct Redraw(Mutex<Vec<WayId>>);
///
/// impl BlockingObserver for Redraw {
///     fn on_blocking_changed(&self, change: BlockingChange) {
///         self.0.lock().unwrap().push(change.way);
///     }
/// }
/// ```
pub trait BlockingObserver: Send + Sync {
    fn on_blocking_changed(&self, change: BlockingChange);
}

/// Logs every change at `info` level.
pub struct LogObserver;

impl BlockingObserver for LogObserver {
    fn on_blocking_changed(&self, change: BlockingChange) {
        let state = if change.blocked { "blocked" } else { "unblocked" };
        log::info!("{} {state}", change.way);
    }
}

/// Forwards changes into a channel; a closed receiver is ignored.
impl BlockingObserver for Sender<BlockingChange> {
    fn on_blocking_changed(&self, change: BlockingChange) {
        let _ = self.send(change);
    }
}
