//! Background button monitoring.
//!
//! See [`ButtonWatch`].

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

#[cfg(not(feature = "host"))]
use super::Button;

// ============================================================================
// ButtonWatch - Latched press notifications
// ============================================================================

/// Press notifications from a task that watches the button.
///
/// A press stays latched until a waiter takes it, so dropping a pending
/// [`wait_for_press`](Self::wait_for_press) (for example when a ticker wins a `select`) loses
/// nothing. Presses that arrive before anyone looks collapse into one.
///
/// ```rust
/// use marquee_kit::button::ButtonWatch;
///
/// static BUTTON_WATCH: ButtonWatch = ButtonWatch::new();
///
/// BUTTON_WATCH.notify_press();
/// assert!(BUTTON_WATCH.take_press());
/// assert!(!BUTTON_WATCH.take_press());
/// ```
pub struct ButtonWatch {
    signal: Signal<CriticalSectionRawMutex, ()>,
}

impl ButtonWatch {
    /// No press latched.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            signal: Signal::new(),
        }
    }

    /// Latch a press for the next waiter.
    pub fn notify_press(&self) {
        self.signal.signal(());
    }

    /// Waits for a latched press and consumes it.
    pub async fn wait_for_press(&self) {
        self.signal.wait().await;
    }

    /// Consume a latched press without waiting.
    pub fn take_press(&self) -> bool {
        self.signal.try_take().is_some()
    }
}

impl Default for ButtonWatch {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Background task implementation
// ============================================================================

/// Debounces `button` forever, latching every press into `watch`.
///
/// Call from an `#[embassy_executor::task]` that owns the button.
#[cfg(not(feature = "host"))]
pub async fn button_watch_task(mut button: Button<'static>, watch: &'static ButtonWatch) -> ! {
    loop {
        button.wait_for_press().await;
        watch.notify_press();
    }
}
