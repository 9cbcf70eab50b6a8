//! Static text placement.
//!
//! See [`print_text`] and [`set_char`].

use crate::font::{GLYPH_COLUMNS_MAX, GlyphSource};
use crate::matrix::{COLUMNS_PER_MODULE, MatrixDisplay, UpdateSuspended};
use crate::render::RenderCursor;
use crate::{Error, Result};

/// Print `message` across modules `module_start..=module_end`, starting at the left edge.
///
/// Every column of the range is written exactly once, from the highest index down to the
/// lowest; text that does not fit is cut off and unused columns are blanked. Hardware updates
/// are held off during the loop and one refresh is sent at the end.
///
/// # Errors
///
/// [`Error::ModuleRange`] if the range is empty or runs past the end of the chain, or a bus
/// error from the display.
///
/// # Example
///
/// ```rust
/// use marquee_kit::font::MatrixFont;
/// use marquee_kit::matrix::{ColumnBuffer, MatrixDisplay};
/// use marquee_kit::print::print_text;
///
/// # fn main() -> marquee_kit::Result<()> {
/// let mut display = ColumnBuffer::<2>::new();
/// print_text(&mut display, &MatrixFont::Font5x7, 0, 1, b"Hi")?;
/// // The first glyph starts at the left edge.
/// assert_ne!(display.column(15)?, 0);
/// assert_eq!(display.column(0)?, 0);
/// # Ok(())
/// # }
/// ```
pub fn print_text<D: MatrixDisplay, G: GlyphSource>(
    display: &mut D,
    glyphs: &G,
    module_start: usize,
    module_end: usize,
    message: &[u8],
) -> Result<()> {
    check_range(display, module_start, module_end)?;
    let left_edge = (module_end + 1) * COLUMNS_PER_MODULE - 1;
    let right_edge = module_start * COLUMNS_PER_MODULE;
    debug!(
        "print {} bytes to columns {}..={}",
        message.len(),
        right_edge,
        left_edge
    );

    let mut cursor = RenderCursor::new();
    {
        let mut display = UpdateSuspended::new(display);
        for column in (right_edge..=left_edge).rev() {
            let remaining = column - right_edge + 1;
            let bitmap = cursor.next_print_column(message, glyphs, remaining);
            display.set_column(column, bitmap)?;
        }
    }
    display.refresh()
}

/// Draw one character centred in `module`, blanking the rest of that module.
///
/// # Errors
///
/// [`Error::ModuleRange`] if the module is not in the chain, or a bus error from the display.
pub fn set_char<D: MatrixDisplay, G: GlyphSource>(
    display: &mut D,
    glyphs: &G,
    module: usize,
    character: u8,
) -> Result<()> {
    check_range(display, module, module)?;
    let mut columns = [0; GLYPH_COLUMNS_MAX];
    let width = glyphs.glyph(character, &mut columns).min(GLYPH_COLUMNS_MAX);
    let left_pad = (COLUMNS_PER_MODULE - width) / 2;
    let left_edge = module * COLUMNS_PER_MODULE + COLUMNS_PER_MODULE - 1;

    {
        let mut display = UpdateSuspended::new(display);
        for offset in 0..COLUMNS_PER_MODULE {
            let bitmap = offset
                .checked_sub(left_pad)
                .filter(|&glyph_column| glyph_column < width)
                .and_then(|glyph_column| columns.get(glyph_column).copied())
                .unwrap_or(0);
            display.set_column(left_edge - offset, bitmap)?;
        }
    }
    display.refresh()
}

fn check_range<D: MatrixDisplay>(display: &D, module_start: usize, module_end: usize) -> Result<()> {
    if module_start > module_end || module_end >= display.module_count() {
        warn!(
            "module range {}..={} rejected for {} modules",
            module_start,
            module_end,
            display.module_count()
        );
        return Err(Error::ModuleRange {
            start: module_start,
            end: module_end,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::GlyphColumns;
    use crate::matrix::ColumnBuffer;

    struct Bar;

    impl GlyphSource for Bar {
        fn glyph(&self, _character: u8, columns: &mut GlyphColumns) -> usize {
            *columns = [0xFF, 0x81, 0xFF, 0, 0, 0, 0, 0];
            3
        }
    }

    #[test]
    fn set_char_centres_glyph() -> Result<()> {
        let mut display = ColumnBuffer::<2>::new();
        set_char(&mut display, &Bar, 1, b'x')?;
        let module: [u8; 8] = core::array::from_fn(|index| display.column(15 - index).unwrap_or(0));
        assert_eq!(module, [0, 0, 0xFF, 0x81, 0xFF, 0, 0, 0]);
        assert!(display.module(0).is_some_and(|columns| columns.iter().all(|&c| c == 0)));
        Ok(())
    }

    #[test]
    fn rejects_bad_ranges() {
        let mut display = ColumnBuffer::<2>::new();
        assert!(matches!(
            print_text(&mut display, &Bar, 1, 0, b"x"),
            Err(Error::ModuleRange { start: 1, end: 0 })
        ));
        assert!(matches!(
            print_text(&mut display, &Bar, 0, 2, b"x"),
            Err(Error::ModuleRange { start: 0, end: 2 })
        ));
        assert!(matches!(
            set_char(&mut display, &Bar, 5, b'x'),
            Err(Error::ModuleRange { .. })
        ));
    }

    #[test]
    fn update_setting_is_restored() -> Result<()> {
        let mut display = ColumnBuffer::<1>::new();
        print_text(&mut display, &Bar, 0, 0, b"xy")?;
        assert!(display.is_update_enabled());
        Ok(())
    }
}
