//! Demo modes cycled by a button press.
//!
//! [`DemoRunner`] owns the display and the message store. The firmware calls
//! [`DemoRunner::tick`] from the scroll ticker and [`DemoRunner::on_button`] when the button is
//! pressed; a [`TickStatus::Idle`] result means the ticker can stop until the next press.
//!
//! ```rust
//! use marquee_kit::demo::{DemoMode, DemoRunner, TickStatus};
//! use marquee_kit::font::MatrixFont;
//! use marquee_kit::matrix::ColumnBuffer;
//! use marquee_kit::message::MessageStore;
//!
//! # fn main() -> marquee_kit::Result<()> {
//! let mut runner = DemoRunner::new(
//!     ColumnBuffer::<2>::new(),
//!     MatrixFont::Font5x7,
//!     MessageStore::with_current("HSBC 58.6"),
//! );
//! assert_eq!(runner.start(DemoMode::ScrollLeft)?, TickStatus::Running);
//! while runner.tick()? == TickStatus::Running {}
//! assert_eq!(runner.on_button()?, TickStatus::Running);
//! assert_eq!(runner.mode(), DemoMode::ScrollUpThenPrint);
//! # Ok(())
//! # }
//! ```

use crate::Result;
use crate::config::CHAR_SET_DEFAULT;
use crate::font::GlyphSource;
use crate::matrix::{MatrixDisplay, NoShift, ROWS, Transform};
use crate::message::{MessageStore, Staged};
use crate::print::{print_text, set_char};
use crate::scroll::{ScrollDriver, ScrollStatus};

/// The demo modes, in button order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DemoMode {
    /// Print the current message once.
    #[default]
    StaticPrint,
    /// Scroll the current message through once.
    ScrollLeft,
    /// Print, scroll it off the top a row at a time, then print again.
    ScrollUpThenPrint,
    /// One character of the character set per module.
    StaticCharSet,
    /// The character set, rotating left forever.
    SetAndRotate,
}

impl DemoMode {
    /// Every mode, in button order.
    pub const ALL: [Self; 5] = [
        Self::StaticPrint,
        Self::ScrollLeft,
        Self::ScrollUpThenPrint,
        Self::StaticCharSet,
        Self::SetAndRotate,
    ];

    /// The mode after this one, wrapping to the first.
    #[must_use]
    pub const fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Position in [`DemoMode::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Mode at `index`, taken modulo the number of modes.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }
}

/// Whether the periodic ticker is still needed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickStatus {
    /// Keep ticking.
    Running,
    /// Nothing left to animate until the next mode change.
    Idle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Scrolling,
    ShiftingUp { remaining: usize },
    Rotating,
}

/// Runs one [`DemoMode`] at a time on a display.
pub struct DemoRunner<D, G> {
    display: D,
    store: MessageStore,
    scroll: ScrollDriver<G>,
    mode: DemoMode,
    phase: Phase,
    char_set: [u8; 2],
}

impl<D: MatrixDisplay, G: GlyphSource> DemoRunner<D, G> {
    /// Runner in [`DemoMode::StaticPrint`]; nothing is drawn until [`start`](Self::start).
    #[must_use]
    pub const fn new(display: D, glyphs: G, store: MessageStore) -> Self {
        Self {
            display,
            store,
            scroll: ScrollDriver::new(glyphs),
            mode: DemoMode::StaticPrint,
            phase: Phase::Idle,
            char_set: CHAR_SET_DEFAULT,
        }
    }

    /// Use different characters for the character-set modes.
    #[must_use]
    pub const fn with_char_set(mut self, char_set: [u8; 2]) -> Self {
        self.char_set = char_set;
        self
    }

    /// Clear the display and begin `mode`.
    ///
    /// Static modes are drawn immediately. A message staged earlier is picked up by the print
    /// modes here and by the scroll mode at its next wraparound.
    ///
    /// # Errors
    ///
    /// A display error.
    pub fn start(&mut self, mode: DemoMode) -> Result<TickStatus> {
        info!("demo mode {}", mode);
        self.mode = mode;
        self.display.clear()?;
        self.scroll.restart(&mut self.store);
        self.phase = match mode {
            DemoMode::StaticPrint => {
                self.store.swap_in_pending();
                self.print_current()?;
                Phase::Idle
            }
            DemoMode::ScrollLeft => Phase::Scrolling,
            DemoMode::ScrollUpThenPrint => {
                self.store.swap_in_pending();
                self.print_current()?;
                Phase::ShiftingUp { remaining: ROWS }
            }
            DemoMode::StaticCharSet => {
                self.draw_char_set()?;
                Phase::Idle
            }
            DemoMode::SetAndRotate => {
                self.draw_char_set()?;
                Phase::Rotating
            }
        };
        Ok(self.status())
    }

    /// Advance to the next mode.
    ///
    /// # Errors
    ///
    /// A display error.
    pub fn on_button(&mut self) -> Result<TickStatus> {
        self.start(self.mode.next())
    }

    /// Advance the current mode by one ticker period.
    ///
    /// # Errors
    ///
    /// A display error.
    pub fn tick(&mut self) -> Result<TickStatus> {
        match self.phase {
            Phase::Idle => {}
            Phase::Scrolling => {
                if self.scroll.tick(&mut self.display, &mut self.store)? == ScrollStatus::Complete
                {
                    self.phase = Phase::Idle;
                }
            }
            Phase::ShiftingUp { remaining: 0 } => {
                self.print_current()?;
                self.phase = Phase::Idle;
            }
            Phase::ShiftingUp { remaining } => {
                self.display.transform(Transform::ShiftUp, &mut NoShift)?;
                self.phase = Phase::ShiftingUp {
                    remaining: remaining - 1,
                };
            }
            Phase::Rotating => {
                self.display.transform(Transform::RotateLeft, &mut NoShift)?;
            }
        }
        Ok(self.status())
    }

    /// Queue `text` to replace the current message. See [`MessageStore::stage_message`].
    pub fn stage_message(&mut self, text: impl AsRef<[u8]>) -> Staged {
        self.store.stage_message(text)
    }

    /// The mode currently running.
    #[must_use]
    pub const fn mode(&self) -> DemoMode {
        self.mode
    }

    /// The display being driven.
    #[must_use]
    pub const fn display(&self) -> &D {
        &self.display
    }

    /// Mutable access to the display, for example to change its brightness.
    pub const fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// The message store.
    #[must_use]
    pub const fn store(&self) -> &MessageStore {
        &self.store
    }

    /// Mutable access to the message store.
    pub const fn store_mut(&mut self) -> &mut MessageStore {
        &mut self.store
    }

    const fn status(&self) -> TickStatus {
        match self.phase {
            Phase::Idle => TickStatus::Idle,
            Phase::Scrolling | Phase::ShiftingUp { .. } | Phase::Rotating => TickStatus::Running,
        }
    }

    fn print_current(&mut self) -> Result<()> {
        let module_end = self.display.module_count().saturating_sub(1);
        print_text(
            &mut self.display,
            self.scroll.glyphs(),
            0,
            module_end,
            self.store.current(),
        )
    }

    // Reading order: the first character lands in the leftmost module.
    fn draw_char_set(&mut self) -> Result<()> {
        let module_count = self.display.module_count();
        for (position, &character) in self.char_set.iter().enumerate().take(module_count) {
            set_char(
                &mut self.display,
                self.scroll.glyphs(),
                module_count - 1 - position,
                character,
            )?;
        }
        Ok(())
    }
}
