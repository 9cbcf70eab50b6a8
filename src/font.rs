//! Glyph lookup: turns a character code into column bitmaps.
//!
//! The render engine only depends on [`GlyphSource`]. [`MatrixFont`] is the built-in source: it
//! draws one character of an [`embedded-graphics`](https://docs.rs/embedded-graphics) monospace
//! font onto an 8×8 canvas and trims the blank columns on both sides, which gives the
//! proportional look people expect from a scrolling marquee.

use core::convert::Infallible;

use embedded_graphics::{
    mono_font::{
        DecorationDimensions, MonoFont, MonoTextStyle,
        ascii::{FONT_4X6, FONT_5X7, FONT_5X8},
        mapping::StrGlyphMapping,
    },
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Baseline, Text},
};

/// Most columns a single glyph may use.
pub const GLYPH_COLUMNS_MAX: usize = 8;

/// Column bitmaps for one glyph. Bit 0 of each byte is the top row.
pub type GlyphColumns = [u8; GLYPH_COLUMNS_MAX];

/// Character-to-columns lookup used by the render engine.
pub trait GlyphSource {
    /// Fill `columns` with the glyph for `character` and return how many columns it uses.
    ///
    /// Widths above [`GLYPH_COLUMNS_MAX`] are clamped by the caller.
    fn glyph(&self, character: u8, columns: &mut GlyphColumns) -> usize;
}

impl<T: GlyphSource + ?Sized> GlyphSource for &T {
    fn glyph(&self, character: u8, columns: &mut GlyphColumns) -> usize {
        (**self).glyph(character, columns)
    }
}

// Packed bitmap for the internal 3x4 font (ASCII 0x20-0x7E).
const FONT_3X4_DATA: [u8; 144] = [
    0x0a, 0xd5, 0x10, 0x4a, 0xa0, 0x01, 0x0a, 0xfe, 0x68, 0x85, 0x70, 0x02, 0x08, 0x74, 0x90, 0x86,
    0xa5, 0xc4, 0x08, 0x5e, 0x68, 0x48, 0x08, 0x10, 0xeb, 0x7b, 0xe7, 0xfd, 0x22, 0x27, 0xb8, 0x9b,
    0x39, 0xb4, 0x05, 0xd1, 0xa9, 0x3e, 0xea, 0x5d, 0x28, 0x0a, 0xff, 0xf3, 0xfc, 0xe4, 0x45, 0xd2,
    0xff, 0x7d, 0xff, 0xbc, 0xd9, 0xff, 0xb7, 0xcb, 0xb4, 0xe8, 0xe9, 0xfd, 0xfe, 0xcb, 0x25, 0xaa,
    0xd9, 0x7d, 0x97, 0x7d, 0xe7, 0xbf, 0xdf, 0x6f, 0xdf, 0x7f, 0x6d, 0xb7, 0xe0, 0xd0, 0xf7, 0xe5,
    0x6d, 0x48, 0xc0, 0x68, 0xdf, 0x35, 0x6f, 0x49, 0x40, 0x40, 0x86, 0xf5, 0xd7, 0xab, 0xe0, 0xc7,
    0x5f, 0x7d, 0xff, 0xbc, 0xd9, 0xff, 0x37, 0xcb, 0xb4, 0xe8, 0xe9, 0xfd, 0x1e, 0xcb, 0x25, 0xaa,
    0xd9, 0x7d, 0x17, 0x7d, 0xe7, 0xbf, 0xdf, 0x6f, 0xdf, 0x7f, 0x6d, 0xb7, 0xb1, 0x80, 0xf7, 0xe5,
    0x6d, 0x48, 0xa0, 0xa8, 0xdf, 0x35, 0x6f, 0x49, 0x20, 0x90, 0x86, 0xf5, 0xd7, 0xab, 0xb1, 0x80,
];
const FONT_3X4_IMAGE_WIDTH: u32 = 48;
const FONT_3X4_GLYPH_MAPPING: StrGlyphMapping<'static> = StrGlyphMapping::new("\0 \u{7e}", 0);

/// Monospace 3x4 font for very small panels.
#[must_use]
pub fn font_3x4() -> MonoFont<'static> {
    MonoFont {
        image: embedded_graphics::image::ImageRaw::new(&FONT_3X4_DATA, FONT_3X4_IMAGE_WIDTH),
        glyph_mapping: &FONT_3X4_GLYPH_MAPPING,
        character_size: Size::new(3, 4),
        character_spacing: 0,
        baseline: 3,
        underline: DecorationDimensions::new(3, 1),
        strikethrough: DecorationDimensions::new(2, 1),
    }
}

/// Built-in fonts that fit the 8-row matrix.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MatrixFont {
    /// 3×4 pixels.
    Font3x4,
    /// 4×6 pixels.
    Font4x6,
    /// 5×7 pixels, the classic marquee font.
    #[default]
    Font5x7,
    /// 5×8 pixels, with descenders.
    Font5x8,
}

impl MatrixFont {
    /// Return the `MonoFont` for this variant.
    #[must_use]
    pub fn to_font(self) -> MonoFont<'static> {
        match self {
            Self::Font3x4 => font_3x4(),
            Self::Font4x6 => FONT_4X6,
            Self::Font5x7 => FONT_5X7,
            Self::Font5x8 => FONT_5X8,
        }
    }

    /// Width given to characters that draw nothing, such as space.
    #[must_use]
    pub const fn space_columns(self) -> usize {
        match self {
            Self::Font3x4 => 1,
            Self::Font4x6 | Self::Font5x7 | Self::Font5x8 => 2,
        }
    }
}

impl GlyphSource for MatrixFont {
    fn glyph(&self, character: u8, columns: &mut GlyphColumns) -> usize {
        let font = self.to_font();
        let printable = if character == b' ' || character.is_ascii_graphic() {
            char::from(character)
        } else {
            '?'
        };
        let mut utf8 = [0u8; 4];
        let text = printable.encode_utf8(&mut utf8);

        let mut canvas = GlyphCanvas::default();
        let style = MonoTextStyle::new(&font, BinaryColor::On);
        let Ok(_) = Text::with_baseline(text, Point::zero(), style, Baseline::Top).draw(&mut canvas);

        canvas.trim_into(columns, self.space_columns())
    }
}

/// 8×8 scratch target a single character is drawn onto.
#[derive(Default)]
struct GlyphCanvas {
    columns: GlyphColumns,
}

impl GlyphCanvas {
    /// Copy the non-blank span of columns into `columns`, left-aligned.
    fn trim_into(&self, columns: &mut GlyphColumns, blank_width: usize) -> usize {
        *columns = [0; GLYPH_COLUMNS_MAX];
        let first = self.columns.iter().position(|&column| column != 0);
        let last = self.columns.iter().rposition(|&column| column != 0);
        let (Some(first), Some(last)) = (first, last) else {
            return blank_width.min(GLYPH_COLUMNS_MAX);
        };
        let span = self.columns.get(first..=last).unwrap_or_default();
        for (destination, &source) in columns.iter_mut().zip(span) {
            *destination = source;
        }
        span.len()
    }
}

impl OriginDimensions for GlyphCanvas {
    fn size(&self) -> Size {
        Size::new(GLYPH_COLUMNS_MAX as u32, 8)
    }
}

impl DrawTarget for GlyphCanvas {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> core::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            let (Ok(x_index), Ok(y_index)) = (usize::try_from(coord.x), u32::try_from(coord.y))
            else {
                continue;
            };
            if color.is_off() || y_index >= 8 {
                continue;
            }
            if let Some(column) = self.columns.get_mut(x_index) {
                *column |= 1 << y_index;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(font: MatrixFont, character: u8) -> (usize, GlyphColumns) {
        let mut columns = [0xFF; GLYPH_COLUMNS_MAX];
        let width = font.glyph(character, &mut columns);
        (width, columns)
    }

    #[test]
    fn space_uses_fixed_blank_width() {
        let (width, columns) = lookup(MatrixFont::Font5x7, b' ');
        assert_eq!(width, 2);
        assert_eq!(columns, [0; GLYPH_COLUMNS_MAX]);
    }

    #[test]
    fn glyphs_are_trimmed_and_left_aligned() {
        for character in b'!'..=b'~' {
            let (width, columns) = lookup(MatrixFont::Font5x7, character);
            assert!((1..=5).contains(&width), "width {width} for {character}");
            assert_ne!(columns[0], 0, "leading blank column for {character}");
            assert_ne!(columns[width - 1], 0, "trailing blank column for {character}");
            assert!(columns[width..].iter().all(|&column| column == 0));
        }
    }

    #[test]
    fn narrow_punctuation_is_narrower_than_letters() {
        let (dot, _) = lookup(MatrixFont::Font5x7, b'.');
        let (h, _) = lookup(MatrixFont::Font5x7, b'H');
        assert!(dot < h);
    }

    #[test]
    fn rows_stay_inside_the_font_height() {
        for character in b'!'..=b'~' {
            let (_, columns) = lookup(MatrixFont::Font5x7, character);
            assert!(columns.iter().all(|&column| column & 0x80 == 0));
        }
    }

    #[test]
    fn unprintable_bytes_render_as_question_mark() {
        assert_eq!(
            lookup(MatrixFont::Font5x7, 0x07),
            lookup(MatrixFont::Font5x7, b'?')
        );
        assert_eq!(
            lookup(MatrixFont::Font4x6, 0xE9),
            lookup(MatrixFont::Font4x6, b'?')
        );
    }

    #[test]
    fn every_font_fits_the_matrix() {
        for font in [
            MatrixFont::Font3x4,
            MatrixFont::Font4x6,
            MatrixFont::Font5x7,
            MatrixFont::Font5x8,
        ] {
            let (width, _) = lookup(font, b'M');
            assert!(width <= GLYPH_COLUMNS_MAX);
            assert!(width > 0);
        }
    }
}
