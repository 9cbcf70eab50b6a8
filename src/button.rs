//! A device abstraction for the mode button, with debouncing.
//!
//! `Button` waits for one debounced edge at a time (firmware builds only). Racing it against a
//! ticker in `select` restarts the wait on every tick, so the firmware runs it in its own task
//! through `button_watch_task` and waits on a [`ButtonWatch`] instead.

mod button_watch;

#[cfg(not(feature = "host"))]
pub use button_watch::button_watch_task;
pub use button_watch::ButtonWatch;

#[cfg(not(feature = "host"))]
use embassy_rp::Peri;
#[cfg(not(feature = "host"))]
use embassy_rp::gpio::{Input, Pull};
#[cfg(not(feature = "host"))]
use embassy_time::{Duration, Timer};

#[cfg(not(feature = "host"))]
use crate::config::BUTTON_DEBOUNCE_DELAY;

/// How often the pin is sampled while waiting for a level.
#[cfg(not(feature = "host"))]
const POLL_INTERVAL: Duration = Duration::from_millis(1);

// ============================================================================
// PressedTo - How the button is wired
// ============================================================================

/// Describes how the button is physically wired.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressedTo {
    /// Button connects pin to voltage (3.3V) when pressed.
    /// Uses internal pull-down resistor. Pin reads HIGH when pressed.
    ///
    /// Note: The original Pico 2 (RP2350) has a known silicon bug with pull-down resistors
    /// that can cause pins to stay HIGH after button release. Use Ground instead.
    Voltage,

    /// Button connects pin to ground (GND) when pressed.
    /// Uses internal pull-up resistor. Pin reads LOW when pressed.
    Ground,
}

// ============================================================================
// Edge - Which transition to wait for
// ============================================================================

/// A debounced change of button state.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// Released to pressed.
    Press,
    /// Pressed to released.
    Release,
}

// ============================================================================
// Button Virtual Device
// ============================================================================

/// A debounced push button that advances the demo mode.
///
/// # Hardware Requirements
///
/// The button can be wired in two ways:
/// - [`PressedTo::Voltage`]: Button connects pin to 3.3V when pressed (uses pull-down)
/// - [`PressedTo::Ground`]: Button connects pin to GND when pressed (uses pull-up)
///
/// # Example
///
/// ```rust,no_run
/// # #![no_std]
/// # #![no_main]
/// use marquee_kit::button::{Button, PressedTo};
/// # #[panic_handler]
/// # fn panic(_info: &core::panic::PanicInfo) -> ! { loop {} }
///
/// async fn example(p: embassy_rp::Peripherals) {
///     let mut button = Button::new(p.PIN_13, PressedTo::Ground);
///     loop {
///         button.wait_for_press().await;
///         // advance the demo mode
///     }
/// }
/// ```
#[cfg(not(feature = "host"))]
pub struct Button<'a> {
    input: Input<'a>,
    pressed_to: PressedTo,
    debounce: Duration,
}

#[cfg(not(feature = "host"))]
impl<'a> Button<'a> {
    /// Creates a new `Button` from a pin, with the default debounce delay.
    ///
    /// The pin is configured based on the connection type:
    /// - [`PressedTo::Voltage`]: Uses internal pull-down (button to 3.3V)
    /// - [`PressedTo::Ground`]: Uses internal pull-up (button to GND)
    #[must_use]
    pub fn new<P: embassy_rp::gpio::Pin>(pin: Peri<'a, P>, pressed_to: PressedTo) -> Self {
        let pull = match pressed_to {
            PressedTo::Voltage => Pull::Down,
            PressedTo::Ground => Pull::Up,
        };
        Self {
            input: Input::new(pin, pull),
            pressed_to,
            debounce: BUTTON_DEBOUNCE_DELAY,
        }
    }

    /// Use a different debounce delay.
    #[must_use]
    pub const fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Returns whether the button is currently pressed.
    #[must_use]
    pub fn is_pressed(&self) -> bool {
        match self.pressed_to {
            PressedTo::Voltage => self.input.is_high(),
            PressedTo::Ground => self.input.is_low(),
        }
    }

    #[inline]
    async fn wait_for_level(&mut self, pressed: bool) {
        while self.is_pressed() != pressed {
            Timer::after(POLL_INTERVAL).await;
        }
    }

    #[inline]
    async fn wait_for_stable(&mut self, pressed: bool) {
        loop {
            self.wait_for_level(pressed).await;
            Timer::after(self.debounce).await;
            if self.is_pressed() == pressed {
                break;
            }
            // otherwise it was bounce; keep waiting
        }
    }

    /// Waits for the next debounced `edge`. The button must first settle in the opposite state,
    /// so a button already held down does not count as a new press.
    pub async fn wait_for_edge(&mut self, edge: Edge) {
        let pressed = edge == Edge::Press;
        self.wait_for_stable(!pressed).await;
        self.wait_for_stable(pressed).await;
        debug!("button {}", edge);
    }

    /// Waits for the next press (button goes down, debounced).
    /// Does not wait for release.
    ///
    /// See [`Button`] for usage example
    pub async fn wait_for_press(&mut self) {
        self.wait_for_edge(Edge::Press).await;
    }

    /// Waits until the button is released (debounced).
    pub async fn wait_for_release(&mut self) {
        self.wait_for_stable(false).await;
    }
}
