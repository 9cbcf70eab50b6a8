//! Column-at-a-time text renderer shared by the print and scroll drivers.
//!
//! A [`RenderCursor`] is asked for one column at a time. Each character produces its glyph
//! columns followed by [`CHAR_SPACING`] blank columns:
//!
//! ```text
//! LoadChar ──► EmitCharColumns ──► EmitSpacingColumns ──► LoadChar ...
//! ```
//!
//! Loading a character and emitting its first column happen in the same call, so every call
//! produces exactly one column.
//!
//! ```rust
//! use marquee_kit::font::MatrixFont;
//! use marquee_kit::message::MessageStore;
//! use marquee_kit::render::{RenderCursor, scroll_length};
//!
//! let font = MatrixFont::Font5x7;
//! let mut store = MessageStore::with_current("OK");
//! let mut cursor = RenderCursor::new();
//! let ticks = scroll_length(store.current(), &font);
//! for _ in 0..ticks {
//!     assert!(!store.is_message_complete());
//!     let _column = cursor.next_scroll_column(&mut store, &font);
//! }
//! assert!(store.is_message_complete());
//! ```

use crate::font::{GLYPH_COLUMNS_MAX, GlyphColumns, GlyphSource};
use crate::message::MessageStore;

/// Blank columns emitted after every character.
pub const CHAR_SPACING: usize = 1;

/// Where the cursor is within the current character.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RenderState {
    /// The next call looks up a new character (or, when printing, starts the blank padding).
    #[default]
    LoadChar,
    /// Emitting glyph (or padding) columns.
    EmitCharColumns,
    /// Emitting the blank gap after a character.
    EmitSpacingColumns,
}

/// Renderer state that persists between column requests.
///
/// Create a fresh cursor whenever a display mode starts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderCursor {
    index: usize,
    state: RenderState,
    glyph: GlyphColumns,
    emitted: usize,
    show_len: usize,
    last_char: bool,
}

impl RenderCursor {
    /// Cursor positioned before the first character.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            index: 0,
            state: RenderState::LoadChar,
            glyph: [0; GLYPH_COLUMNS_MAX],
            emitted: 0,
            show_len: 0,
            last_char: false,
        }
    }

    /// Index of the next character to load.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Current state of the column state machine.
    #[must_use]
    pub const fn state(&self) -> RenderState {
        self.state
    }

    /// Whether the character being emitted is the last one of the message (scroll mode).
    #[must_use]
    pub const fn is_last_char(&self) -> bool {
        self.last_char
    }

    /// Next column when printing `message` statically, right to left.
    ///
    /// `remaining` counts the columns still to fill, including this one. Once the message runs
    /// out, all of them become blank padding.
    pub fn next_print_column<G: GlyphSource>(
        &mut self,
        message: &[u8],
        glyphs: &G,
        remaining: usize,
    ) -> u8 {
        let (column, _) = match self.state {
            RenderState::LoadChar => {
                if let Some(&character) = message.get(self.index) {
                    self.index += 1;
                    self.load_glyph(character, glyphs);
                } else {
                    self.glyph = [0; GLYPH_COLUMNS_MAX];
                    self.show_len = remaining;
                    self.emitted = 0;
                    self.state = RenderState::EmitCharColumns;
                }
                self.emit_char_column()
            }
            RenderState::EmitCharColumns => self.emit_char_column(),
            RenderState::EmitSpacingColumns => self.emit_spacing_column(),
        };
        column
    }

    /// Next column of a continuous scroll of the store's current message.
    ///
    /// Wraparound happens when the last character is loaded: the cursor returns to the start
    /// and a pending message, if any, replaces the current one. The spacing run after that last
    /// character marks the message complete. Once complete, only blank columns are returned.
    pub fn next_scroll_column<G: GlyphSource>(
        &mut self,
        store: &mut MessageStore,
        glyphs: &G,
    ) -> u8 {
        if store.is_message_complete() {
            return 0;
        }
        let (column, spacing_done) = match self.state {
            RenderState::LoadChar => {
                self.load_scroll_char(store, glyphs);
                self.emit_char_column()
            }
            RenderState::EmitCharColumns => self.emit_char_column(),
            RenderState::EmitSpacingColumns => self.emit_spacing_column(),
        };
        if spacing_done && self.last_char {
            self.last_char = false;
            store.mark_complete();
            debug!("message complete");
        }
        column
    }

    fn load_scroll_char<G: GlyphSource>(&mut self, store: &mut MessageStore, glyphs: &G) {
        if let Some(&character) = store.current().get(self.index) {
            self.index += 1;
            self.load_glyph(character, glyphs);
        } else {
            self.glyph = [0; GLYPH_COLUMNS_MAX];
            self.show_len = 0;
            self.emitted = 0;
            self.state = RenderState::EmitCharColumns;
        }

        if self.index >= store.current().len() {
            self.last_char = true;
            self.index = 0;
            if store.swap_in_pending() {
                trace!("wraparound with new message");
            }
        }
    }

    fn load_glyph<G: GlyphSource>(&mut self, character: u8, glyphs: &G) {
        let width = glyphs.glyph(character, &mut self.glyph);
        if width > GLYPH_COLUMNS_MAX {
            warn!(
                "glyph {} is {} columns wide, clamped to {}",
                character,
                width,
                GLYPH_COLUMNS_MAX
            );
        }
        self.show_len = width.min(GLYPH_COLUMNS_MAX);
        self.emitted = 0;
        self.state = RenderState::EmitCharColumns;
    }

    // Returns the column and whether a spacing run just finished.
    fn emit_char_column(&mut self) -> (u8, bool) {
        if self.emitted >= self.show_len {
            self.start_spacing();
            return self.emit_spacing_column();
        }
        let column = self.glyph.get(self.emitted).copied().unwrap_or(0);
        self.emitted += 1;
        if self.emitted >= self.show_len {
            self.start_spacing();
        }
        (column, false)
    }

    fn emit_spacing_column(&mut self) -> (u8, bool) {
        self.emitted += 1;
        let done = self.emitted >= self.show_len;
        if done {
            self.state = RenderState::LoadChar;
        }
        (0, done)
    }

    const fn start_spacing(&mut self) {
        self.show_len = CHAR_SPACING;
        self.emitted = 0;
        self.state = RenderState::EmitSpacingColumns;
    }
}

/// Number of scroll ticks needed to emit one full pass of `message`.
///
/// An empty message still takes one spacing tick.
#[must_use]
pub fn scroll_length<G: GlyphSource>(message: &[u8], glyphs: &G) -> usize {
    if message.is_empty() {
        return CHAR_SPACING;
    }
    let mut columns = [0; GLYPH_COLUMNS_MAX];
    message
        .iter()
        .map(|&character| glyphs.glyph(character, &mut columns).min(GLYPH_COLUMNS_MAX) + CHAR_SPACING)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every character is a solid block as wide as its digit value ('0'..='9'), others are 2.
    struct DigitWidths;

    impl GlyphSource for DigitWidths {
        fn glyph(&self, character: u8, columns: &mut GlyphColumns) -> usize {
            let width = if character.is_ascii_digit() {
                usize::from(character - b'0')
            } else {
                2
            };
            for (index, column) in columns.iter_mut().enumerate() {
                *column = if index < width { 0xFF } else { 0 };
            }
            width
        }
    }

    #[test]
    fn load_and_first_column_share_a_call() {
        let mut cursor = RenderCursor::new();
        let mut store = MessageStore::with_current("3");
        assert_eq!(cursor.next_scroll_column(&mut store, &DigitWidths), 0xFF);
        assert_eq!(cursor.state(), RenderState::EmitCharColumns);
    }

    #[test]
    fn glyph_then_single_spacing_column() {
        let mut cursor = RenderCursor::new();
        let mut store = MessageStore::with_current("2A");
        let columns: [u8; 6] =
            core::array::from_fn(|_| cursor.next_scroll_column(&mut store, &DigitWidths));
        assert_eq!(columns, [0xFF, 0xFF, 0, 0xFF, 0xFF, 0]);
        assert!(store.is_message_complete());
    }

    #[test]
    fn zero_width_glyph_goes_straight_to_spacing() {
        let mut cursor = RenderCursor::new();
        let mut store = MessageStore::with_current("01");
        assert_eq!(cursor.next_scroll_column(&mut store, &DigitWidths), 0);
        assert_eq!(cursor.state(), RenderState::LoadChar);
        assert_eq!(cursor.next_scroll_column(&mut store, &DigitWidths), 0xFF);
        assert_eq!(cursor.next_scroll_column(&mut store, &DigitWidths), 0);
        assert!(store.is_message_complete());
    }

    #[test]
    fn oversized_glyph_is_clamped() {
        let mut cursor = RenderCursor::new();
        let mut store = MessageStore::with_current("9");
        let lit = (0..scroll_length(b"9", &DigitWidths))
            .filter(|_| cursor.next_scroll_column(&mut store, &DigitWidths) != 0)
            .count();
        assert_eq!(lit, GLYPH_COLUMNS_MAX);
        assert!(store.is_message_complete());
    }

    #[test]
    fn empty_message_completes_after_one_tick() {
        let mut cursor = RenderCursor::new();
        let mut store = MessageStore::new();
        assert_eq!(cursor.next_scroll_column(&mut store, &DigitWidths), 0);
        assert!(store.is_message_complete());
    }

    #[test]
    fn print_pads_with_blank_columns() {
        let mut cursor = RenderCursor::new();
        let columns: [u8; 8] = core::array::from_fn(|offset| {
            cursor.next_print_column(b"2", &DigitWidths, 8 - offset)
        });
        assert_eq!(columns, [0xFF, 0xFF, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn last_char_flag_tracks_wraparound() {
        let mut cursor = RenderCursor::new();
        let mut store = MessageStore::with_current("11");
        let _ = cursor.next_scroll_column(&mut store, &DigitWidths);
        assert!(!cursor.is_last_char());
        assert_eq!(cursor.index(), 1);
        let _ = cursor.next_scroll_column(&mut store, &DigitWidths);
        let _ = cursor.next_scroll_column(&mut store, &DigitWidths);
        assert!(cursor.is_last_char());
        assert_eq!(cursor.index(), 0);
    }
}
