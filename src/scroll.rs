//! Continuous right-to-left scrolling.
//!
//! See [`ScrollDriver`].

use crate::font::GlyphSource;
use crate::matrix::{MatrixDisplay, ShiftCallbacks, Transform};
use crate::message::MessageStore;
use crate::render::RenderCursor;
use crate::Result;

/// Result of one scroll tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScrollStatus {
    /// More columns to come.
    Running,
    /// The message has been scrolled through once; the display was left alone.
    Complete,
}

/// Scrolls the store's current message one column per [`tick`](Self::tick).
///
/// ```rust
/// use marquee_kit::font::MatrixFont;
/// use marquee_kit::matrix::ColumnBuffer;
/// use marquee_kit::message::MessageStore;
/// use marquee_kit::scroll::{ScrollDriver, ScrollStatus};
///
/// # fn main() -> marquee_kit::Result<()> {
/// let mut display = ColumnBuffer::<2>::new();
/// let mut store = MessageStore::with_current("GO");
/// let mut scroll = ScrollDriver::new(MatrixFont::Font5x7);
/// while scroll.tick(&mut display, &mut store)? == ScrollStatus::Running {}
/// assert!(store.is_message_complete());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct ScrollDriver<G> {
    cursor: RenderCursor,
    glyphs: G,
}

impl<G: GlyphSource> ScrollDriver<G> {
    /// Driver positioned at the start of the message.
    #[must_use]
    pub const fn new(glyphs: G) -> Self {
        Self {
            cursor: RenderCursor::new(),
            glyphs,
        }
    }

    /// Start again from the first character and clear the completion flag.
    pub fn restart(&mut self, store: &mut MessageStore) {
        self.cursor = RenderCursor::new();
        store.restart();
    }

    /// Shift the display one column left, feeding in the next column of the message.
    ///
    /// # Errors
    ///
    /// A bus error from the display.
    pub fn tick<D: MatrixDisplay>(
        &mut self,
        display: &mut D,
        store: &mut MessageStore,
    ) -> Result<ScrollStatus> {
        if store.is_message_complete() {
            return Ok(ScrollStatus::Complete);
        }
        let mut feed = ScrollFeed {
            cursor: &mut self.cursor,
            store,
            glyphs: &self.glyphs,
        };
        display.transform(Transform::ShiftLeft, &mut feed)?;
        Ok(ScrollStatus::Running)
    }

    /// Produce the next column without touching a display.
    pub fn next_column(&mut self, store: &mut MessageStore) -> u8 {
        self.cursor.next_scroll_column(store, &self.glyphs)
    }

    /// The render cursor, for inspecting progress.
    #[must_use]
    pub const fn cursor(&self) -> &RenderCursor {
        &self.cursor
    }

    /// The glyph source used for rendering.
    #[must_use]
    pub const fn glyphs(&self) -> &G {
        &self.glyphs
    }
}

struct ScrollFeed<'a, G> {
    cursor: &'a mut RenderCursor,
    store: &'a mut MessageStore,
    glyphs: &'a G,
}

impl<G: GlyphSource> ShiftCallbacks for ScrollFeed<'_, G> {
    fn shift_in(&mut self, _transform: Transform) -> u8 {
        self.cursor.next_scroll_column(self.store, self.glyphs)
    }
}
