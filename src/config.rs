//! Compile-time configuration for a marquee.
//!
//! Defaults match a two-module FC16 board showing a stock quote. Build a custom configuration
//! with the `const fn` setters so it can live in a `const`:
//!
//! ```rust
//! use embassy_time::Duration;
//! use marquee_kit::config::MarqueeConfig;
//! use marquee_kit::matrix::HardwareType;
//!
//! const CONFIG: MarqueeConfig = MarqueeConfig::new()
//!     .with_hardware(HardwareType::Generic)
//!     .with_scroll_delay(Duration::from_millis(50))
//!     .with_boot_message("READY");
//!
//! assert_eq!(CONFIG.boot_message, "READY");
//! ```

use embassy_time::Duration;

use crate::matrix::HardwareType;

/// Time between scroll steps.
pub const SCROLL_DELAY: Duration = Duration::from_millis(75);

/// Debounce delay for the mode button.
pub const BUTTON_DEBOUNCE_DELAY: Duration = Duration::from_millis(10);

/// Message shown after boot.
pub const BOOT_MESSAGE: &str = "HSBC 58.6";

/// Lowest MAX7219 brightness; the modules are bright enough indoors.
pub const INTENSITY_DEFAULT: u8 = 0;

/// Characters drawn by the character-set demo modes, one per module.
pub const CHAR_SET_DEFAULT: [u8; 2] = [b'A', b'B'];

/// Settings for one marquee display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MarqueeConfig {
    /// How the MAX7219 outputs are wired to the LED matrix.
    pub hardware: HardwareType,
    /// Period of the scroll ticker.
    pub scroll_delay: Duration,
    /// MAX7219 intensity register value (0..=15).
    pub intensity: u8,
    /// Initial contents of the current message.
    pub boot_message: &'static str,
    /// Debounce delay for the mode button.
    pub debounce: Duration,
    /// Characters for the character-set demo modes.
    pub char_set: [u8; 2],
}

impl MarqueeConfig {
    /// Configuration with the stock defaults.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            hardware: HardwareType::Fc16,
            scroll_delay: SCROLL_DELAY,
            intensity: INTENSITY_DEFAULT,
            boot_message: BOOT_MESSAGE,
            debounce: BUTTON_DEBOUNCE_DELAY,
            char_set: CHAR_SET_DEFAULT,
        }
    }

    /// Use a different module wiring.
    #[must_use]
    pub const fn with_hardware(mut self, hardware: HardwareType) -> Self {
        self.hardware = hardware;
        self
    }

    /// Use a different scroll period.
    #[must_use]
    pub const fn with_scroll_delay(mut self, scroll_delay: Duration) -> Self {
        self.scroll_delay = scroll_delay;
        self
    }

    /// Use a different brightness. Checked when the display is initialised.
    #[must_use]
    pub const fn with_intensity(mut self, intensity: u8) -> Self {
        self.intensity = intensity;
        self
    }

    /// Use a different boot message. Messages longer than the buffer are truncated on load.
    #[must_use]
    pub const fn with_boot_message(mut self, boot_message: &'static str) -> Self {
        self.boot_message = boot_message;
        self
    }

    /// Use a different button debounce delay.
    #[must_use]
    pub const fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Use different characters for the character-set demos.
    #[must_use]
    pub const fn with_char_set(mut self, char_set: [u8; 2]) -> Self {
        self.char_set = char_set;
        self
    }
}

impl Default for MarqueeConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_board() {
        let config = MarqueeConfig::default();
        assert_eq!(config.hardware, HardwareType::Fc16);
        assert_eq!(config.scroll_delay, Duration::from_millis(75));
        assert_eq!(config.intensity, 0);
        assert_eq!(config.boot_message, "HSBC 58.6");
    }

    #[test]
    fn setters_chain_in_const_context() {
        const CONFIG: MarqueeConfig = MarqueeConfig::new()
            .with_intensity(7)
            .with_char_set([b'1', b'2'])
            .with_debounce(Duration::from_millis(25));
        assert_eq!(CONFIG.intensity, 7);
        assert_eq!(CONFIG.char_set, [b'1', b'2']);
        assert_eq!(CONFIG.debounce, Duration::from_millis(25));
    }
}
