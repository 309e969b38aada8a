//! Shared State Control
//!
//! [`StateControl`] itself is single-threaded. Firmware where several tasks
//! look at the same tracker (a button task moving through the menu, a display
//! task drawing it) keeps it in a [`SharedStateControl`], usually as a static:
//!
//! ```rust
//! use state_control::{OptionsView, SharedStateControl};
//!
//! static VIEW_STATE: SharedStateControl = SharedStateControl::new();
//!
//! async fn on_menu_button() {
//!     VIEW_STATE
//!         .update(|view| view.set_option(OptionsView::Menu, true, true))
//!         .await;
//! }
//! ```
//!
//! The tracker is protected by a mutex. Every [`update`](SharedStateControl::update)
//! signals the resulting current index so a consumer task can wait for changes
//! instead of polling.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;

use crate::options::StateIndex;
use crate::state_control::StateControl;

/// Mutex-guarded tracker plus a change signal
///
/// Starts uninitialised so it can live in a `static`; call
/// [`init`](Self::init) or [`init_for`](Self::init_for) once at startup.
pub struct SharedStateControl {
    /// The tracker, `None` until initialised
    states: Mutex<CriticalSectionRawMutex, Option<StateControl>>,
    /// Current index after the latest update
    changed: Signal<CriticalSectionRawMutex, Option<u8>>,
}

impl SharedStateControl {
    pub const fn new() -> Self {
        Self {
            states: Mutex::new(None),
            changed: Signal::new(),
        }
    }

    /// Installs a fresh tracker with `capacity` flags, replacing any previous one
    pub async fn init(&self, capacity: usize) {
        let states = StateControl::new(capacity);
        debug!("Shared state control initialized with {} states", states.capacity());
        *self.states.lock().await = Some(states);
    }

    /// Installs a fresh tracker sized for `T`
    pub async fn init_for<T: StateIndex>(&self) {
        self.init(usize::from(T::COUNT)).await;
    }

    /// Runs `f` on the tracker and signals the resulting current index
    ///
    /// Returns `None` without calling `f` if the tracker is not initialised.
    pub async fn update<R>(&self, f: impl FnOnce(&mut StateControl) -> R) -> Option<R> {
        let mut guard = self.states.lock().await;
        let Some(states) = guard.as_mut() else {
            warn!("Shared state control used before init");
            return None;
        };
        let result = f(states);
        self.changed.signal(states.current_index());
        Some(result)
    }

    /// Runs `f` on the tracker without signalling
    pub async fn read<R>(&self, f: impl FnOnce(&StateControl) -> R) -> Option<R> {
        let guard = self.states.lock().await;
        guard.as_ref().map(f)
    }

    /// Waits for the next update and returns its current index
    pub async fn wait_changed(&self) -> Option<u8> {
        self.changed.wait().await
    }

    /// Takes a pending change without waiting
    pub fn try_changed(&self) -> Option<Option<u8>> {
        self.changed.try_take()
    }
}

impl Default for SharedStateControl {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{OptionsGsm, OptionsView};
    use embassy_futures::block_on;

    #[test]
    fn test_update_before_init() {
        let shared = SharedStateControl::new();
        block_on(async {
            assert_eq!(shared.update(|states| states.set_default()).await, None);
            assert_eq!(shared.read(|states| states.capacity()).await, None);
        });
        assert_eq!(shared.try_changed(), None);
    }

    #[test]
    fn test_update_signals_current_index() {
        static VIEW_STATE: SharedStateControl = SharedStateControl::new();
        block_on(async {
            VIEW_STATE.init_for::<OptionsView>().await;
            assert_eq!(VIEW_STATE.read(|view| view.capacity()).await, Some(8));

            let count = VIEW_STATE
                .update(|view| {
                    view.set_option(OptionsView::Funct, true, true);
                    view.count_true()
                })
                .await;
            assert_eq!(count, Some(1));
            assert_eq!(VIEW_STATE.wait_changed().await, Some(6));

            VIEW_STATE.update(|view| view.reset_all()).await;
            assert_eq!(VIEW_STATE.wait_changed().await, None);
        });
    }

    #[test]
    fn test_signal_keeps_latest_only() {
        let shared = SharedStateControl::default();
        block_on(async {
            shared.init_for::<OptionsGsm>().await;
            shared.update(|gsm| gsm.set_option(OptionsGsm::GsmOn, true, true)).await;
            shared
                .update(|gsm| gsm.set_option(OptionsGsm::IncomingCall, true, true))
                .await;
        });
        assert_eq!(shared.try_changed(), Some(Some(1)));
        assert_eq!(shared.try_changed(), None);
    }

    #[test]
    fn test_init_replaces_tracker() {
        let shared = SharedStateControl::new();
        block_on(async {
            shared.init(4).await;
            shared.update(|states| states.set_all(true)).await;
            shared.init(2).await;
            let snapshot = shared.read(|states| (states.capacity(), states.count_true())).await;
            assert_eq!(snapshot, Some((2, 0)));
        });
    }
}
