//! A device abstraction for chained MAX7219/7221 8×8 LED matrix modules.
//!
//! Columns are numbered the way the modules are chained: column 0 is the rightmost column of
//! module 0 and indices grow to the left. Each column is a byte whose bit 0 is the top row.
//!
//! [`MatrixDisplay`] is what the print and scroll drivers talk to. [`ColumnBuffer`] implements it
//! in memory (used on the host and inside the hardware driver). [`Max7219Matrix`] implements it
//! over an `embedded-hal` [`SpiDevice`].
//!
//! # Example
//!
//! ```rust
//! use marquee_kit::matrix::{ColumnBuffer, MatrixDisplay, NoShift, Transform};
//!
//! # fn main() -> marquee_kit::Result<()> {
//! let mut display = ColumnBuffer::<2>::new();
//! display.set_column(0, 0b0000_0001)?;
//! display.transform(Transform::ShiftLeft, &mut NoShift)?;
//! assert_eq!(display.column(1)?, 0b0000_0001);
//! assert_eq!(display.column(0)?, 0);
//! # Ok(())
//! # }
//! ```

use core::ops::{Deref, DerefMut};

use embedded_hal::spi::{Error as _, SpiDevice};

use crate::{Error, Result};

/// Columns driven by one MAX7219.
pub const COLUMNS_PER_MODULE: usize = 8;

/// Rows of every module.
pub const ROWS: usize = 8;

/// Longest supported chain.
pub const MAX_MODULES: usize = 16;

/// Whole-display transformations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transform {
    /// Move every column one place left. The leftmost column is passed to
    /// [`ShiftCallbacks::shift_out`] and [`ShiftCallbacks::shift_in`] supplies the new rightmost one.
    ShiftLeft,
    /// Move every row up one place; the bottom row becomes blank.
    ShiftUp,
    /// Like [`Transform::ShiftLeft`], but the leftmost column wraps round to the right edge.
    RotateLeft,
}

/// Supplies and receives the columns that cross the display edge during a shift.
pub trait ShiftCallbacks {
    /// Column that enters at the right edge.
    fn shift_in(&mut self, transform: Transform) -> u8;

    /// Column that left at the left edge. Discarded by default.
    fn shift_out(&mut self, transform: Transform, column: u8) {
        trace!("shifted out {} {=u8:#x}", transform, column);
    }
}

/// Shift callbacks that feed blank columns.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoShift;

impl ShiftCallbacks for NoShift {
    fn shift_in(&mut self, _transform: Transform) -> u8 {
        0
    }
}

/// Column-addressed LED matrix.
pub trait MatrixDisplay {
    /// Total number of columns.
    fn column_count(&self) -> usize;

    /// Number of chained modules.
    fn module_count(&self) -> usize {
        self.column_count() / COLUMNS_PER_MODULE
    }

    /// Set one column.
    ///
    /// # Errors
    ///
    /// [`Error::ColumnOutOfBounds`] for an index past the left edge, or a bus error if the
    /// change is pushed to hardware immediately.
    fn set_column(&mut self, index: usize, bitmap: u8) -> Result<()>;

    /// Read one column back.
    ///
    /// # Errors
    ///
    /// [`Error::ColumnOutOfBounds`] for an index past the left edge.
    fn column(&self, index: usize) -> Result<u8>;

    /// Turn automatic hardware updates on or off.
    ///
    /// Turning them back on does not push anything; call [`refresh`](Self::refresh).
    fn set_update(&mut self, enabled: bool);

    /// Whether changes are pushed to hardware as they happen.
    fn is_update_enabled(&self) -> bool;

    /// Push the whole display to hardware.
    ///
    /// # Errors
    ///
    /// A bus error.
    fn refresh(&mut self) -> Result<()>;

    /// Blank every column.
    ///
    /// # Errors
    ///
    /// A bus error.
    fn clear(&mut self) -> Result<()>;

    /// Apply a transformation to the whole display.
    ///
    /// # Errors
    ///
    /// A bus error.
    fn transform<C: ShiftCallbacks>(&mut self, transform: Transform, callbacks: &mut C)
    -> Result<()>;
}

/// Suspends automatic updates while it lives and restores the previous setting when dropped.
///
/// ```rust
/// use marquee_kit::matrix::{ColumnBuffer, MatrixDisplay, UpdateSuspended};
///
/// let mut display = ColumnBuffer::<1>::new();
/// {
///     let suspended = UpdateSuspended::new(&mut display);
///     assert!(!suspended.is_update_enabled());
/// }
/// assert!(display.is_update_enabled());
/// ```
pub struct UpdateSuspended<'a, D: MatrixDisplay> {
    display: &'a mut D,
    restore: bool,
}

impl<'a, D: MatrixDisplay> UpdateSuspended<'a, D> {
    /// Turn updates off on `display` until the guard is dropped.
    pub fn new(display: &'a mut D) -> Self {
        let restore = display.is_update_enabled();
        display.set_update(false);
        Self { display, restore }
    }
}

impl<D: MatrixDisplay> Deref for UpdateSuspended<'_, D> {
    type Target = D;

    fn deref(&self) -> &Self::Target {
        &*self.display
    }
}

impl<D: MatrixDisplay> DerefMut for UpdateSuspended<'_, D> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.display
    }
}

impl<D: MatrixDisplay> Drop for UpdateSuspended<'_, D> {
    fn drop(&mut self) {
        self.display.set_update(self.restore);
    }
}

// ============================================================================
// ColumnBuffer - in-memory display
// ============================================================================

/// In-memory column framebuffer for a chain of `MODULES` modules.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnBuffer<const MODULES: usize> {
    modules: [[u8; COLUMNS_PER_MODULE]; MODULES],
    update: bool,
}

impl<const MODULES: usize> ColumnBuffer<MODULES> {
    /// Blank buffer with updates enabled.
    #[must_use]
    pub const fn new() -> Self {
        const { assert!(MODULES > 0 && MODULES <= MAX_MODULES, "MODULES must be 1..=16") };
        Self {
            modules: [[0; COLUMNS_PER_MODULE]; MODULES],
            update: true,
        }
    }

    /// The columns of one module, rightmost first.
    #[must_use]
    pub fn module(&self, module: usize) -> Option<&[u8; COLUMNS_PER_MODULE]> {
        self.modules.get(module)
    }

    /// Every column, starting with column 0 (the right edge).
    pub fn columns(&self) -> impl Iterator<Item = u8> + '_ {
        self.modules.iter().flatten().copied()
    }

    /// Whether every LED is off.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.columns().all(|column| column == 0)
    }

    fn slot(&mut self, index: usize) -> Result<&mut u8> {
        self.modules
            .get_mut(index / COLUMNS_PER_MODULE)
            .and_then(|module| module.get_mut(index % COLUMNS_PER_MODULE))
            .ok_or(Error::ColumnOutOfBounds(index))
    }

    /// Move each column one place towards the left edge, blanking column 0.
    /// Returns the column that fell off.
    fn shift_columns_left(&mut self) -> u8 {
        let mut carry = 0;
        for column in self.modules.iter_mut().flatten() {
            carry = core::mem::replace(column, carry);
        }
        carry
    }
}

impl<const MODULES: usize> Default for ColumnBuffer<MODULES> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const MODULES: usize> MatrixDisplay for ColumnBuffer<MODULES> {
    fn column_count(&self) -> usize {
        MODULES * COLUMNS_PER_MODULE
    }

    fn set_column(&mut self, index: usize, bitmap: u8) -> Result<()> {
        *self.slot(index)? = bitmap;
        Ok(())
    }

    fn column(&self, index: usize) -> Result<u8> {
        self.modules
            .get(index / COLUMNS_PER_MODULE)
            .and_then(|module| module.get(index % COLUMNS_PER_MODULE))
            .copied()
            .ok_or(Error::ColumnOutOfBounds(index))
    }

    fn set_update(&mut self, enabled: bool) {
        self.update = enabled;
    }

    fn is_update_enabled(&self) -> bool {
        self.update
    }

    fn refresh(&mut self) -> Result<()> {
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.modules = [[0; COLUMNS_PER_MODULE]; MODULES];
        Ok(())
    }

    fn transform<C: ShiftCallbacks>(
        &mut self,
        transform: Transform,
        callbacks: &mut C,
    ) -> Result<()> {
        match transform {
            Transform::ShiftLeft => {
                let leaving = self.shift_columns_left();
                callbacks.shift_out(transform, leaving);
                *self.slot(0)? = callbacks.shift_in(transform);
            }
            Transform::RotateLeft => {
                let leaving = self.shift_columns_left();
                *self.slot(0)? = leaving;
            }
            Transform::ShiftUp => {
                for column in self.modules.iter_mut().flatten() {
                    *column >>= 1;
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// Max7219Matrix - SPI hardware
// ============================================================================

/// How the MAX7219 outputs are wired to the LEDs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HardwareType {
    /// FC-16 style modules: each digit register drives one row, bit 0 is the rightmost column.
    #[default]
    Fc16,
    /// Each digit register drives one column, bit 0 is the top row.
    Generic,
}

/// MAX7219 register addresses. An all-zero packet is a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
enum Register {
    Digit0 = 0x01,
    DecodeMode = 0x09,
    Intensity = 0x0A,
    ScanLimit = 0x0B,
    Shutdown = 0x0C,
    DisplayTest = 0x0F,
}

/// A chain of `MODULES` MAX7219 devices on one SPI chip select.
///
/// Keeps a [`ColumnBuffer`] and pushes it over SPI, one 16-bit packet per module per write.
/// The first packet clocked out ends up in the module furthest from the controller, which is
/// module `MODULES - 1`.
///
/// ```rust,no_run
/// # use embedded_hal::spi::SpiDevice;
/// use marquee_kit::matrix::{HardwareType, Max7219Matrix, MatrixDisplay};
///
/// fn show_bar<SPI: SpiDevice>(spi: SPI) -> marquee_kit::Result<()> {
///     let mut display = Max7219Matrix::<_, 2>::new(spi, HardwareType::Fc16);
///     display.init(0)?;
///     display.set_column(0, 0xFF)?;
///     Ok(())
/// }
/// ```
pub struct Max7219Matrix<SPI, const MODULES: usize> {
    spi: SPI,
    buffer: ColumnBuffer<MODULES>,
    hardware: HardwareType,
}

impl<SPI: SpiDevice, const MODULES: usize> Max7219Matrix<SPI, MODULES> {
    /// Wrap `spi`. Nothing is sent until [`init`](Self::init).
    #[must_use]
    pub const fn new(spi: SPI, hardware: HardwareType) -> Self {
        Self {
            spi,
            buffer: ColumnBuffer::new(),
            hardware,
        }
    }

    /// Bring every module out of shutdown with a blank display.
    ///
    /// # Errors
    ///
    /// [`Error::IntensityOutOfRange`] or a bus error.
    pub fn init(&mut self, intensity: u8) -> Result<()> {
        self.set_shutdown(true)?;
        self.write_all(Register::DisplayTest, 0)?;
        self.write_all(Register::DecodeMode, 0)?;
        self.write_all(Register::ScanLimit, (ROWS - 1) as u8)?;
        self.set_intensity(intensity)?;
        self.buffer.clear()?;
        self.flush()?;
        self.set_shutdown(false)?;
        info!("MAX7219 chain of {} modules ready", MODULES);
        Ok(())
    }

    /// Set the brightness of every module (0..=15).
    ///
    /// # Errors
    ///
    /// [`Error::IntensityOutOfRange`] or a bus error.
    pub fn set_intensity(&mut self, intensity: u8) -> Result<()> {
        if intensity > 0x0F {
            return Err(Error::IntensityOutOfRange(intensity));
        }
        self.write_all(Register::Intensity, intensity)
    }

    /// Enter (`true`) or leave (`false`) low-power shutdown. The display contents are kept.
    ///
    /// # Errors
    ///
    /// A bus error.
    pub fn set_shutdown(&mut self, shutdown: bool) -> Result<()> {
        self.write_all(Register::Shutdown, u8::from(!shutdown))
    }

    /// The framebuffer as last written.
    #[must_use]
    pub const fn buffer(&self) -> &ColumnBuffer<MODULES> {
        &self.buffer
    }

    /// Module wiring this driver was created with.
    #[must_use]
    pub const fn hardware(&self) -> HardwareType {
        self.hardware
    }

    /// Give back the SPI device.
    #[must_use]
    pub fn release(self) -> SPI {
        self.spi
    }

    /// Push every module.
    fn flush(&mut self) -> Result<()> {
        for digit in 0..ROWS {
            let mut frame = [0u8; 2 * MAX_MODULES];
            for module in 0..MODULES {
                let data = self.digit_data(module, digit);
                Self::place(&mut frame, module, Register::Digit0 as u8 + digit as u8, data);
            }
            self.write_frame(&frame)?;
        }
        Ok(())
    }

    /// Push one module; the rest of the chain receives no-ops.
    fn flush_module(&mut self, module: usize) -> Result<()> {
        for digit in 0..ROWS {
            let mut frame = [0u8; 2 * MAX_MODULES];
            let data = self.digit_data(module, digit);
            Self::place(&mut frame, module, Register::Digit0 as u8 + digit as u8, data);
            self.write_frame(&frame)?;
        }
        Ok(())
    }

    fn write_all(&mut self, register: Register, data: u8) -> Result<()> {
        let mut frame = [0u8; 2 * MAX_MODULES];
        for module in 0..MODULES {
            Self::place(&mut frame, module, register as u8, data);
        }
        self.write_frame(&frame)
    }

    /// Value of digit register `digit` for `module` under the current wiring.
    fn digit_data(&self, module: usize, digit: usize) -> u8 {
        let Some(columns) = self.buffer.module(module) else {
            return 0;
        };
        match self.hardware {
            HardwareType::Generic => columns.get(digit).copied().unwrap_or(0),
            HardwareType::Fc16 => columns
                .iter()
                .enumerate()
                .fold(0, |row, (bit, column)| row | (((column >> digit) & 1) << bit)),
        }
    }

    // Packets go out furthest module first.
    fn place(frame: &mut [u8; 2 * MAX_MODULES], module: usize, register: u8, data: u8) {
        let offset = 2 * (MODULES - 1 - module);
        if let Some(packet) = frame.get_mut(offset..offset + 2) {
            packet.copy_from_slice(&[register, data]);
        }
    }

    fn write_frame(&mut self, frame: &[u8; 2 * MAX_MODULES]) -> Result<()> {
        let bytes = frame.get(..2 * MODULES).unwrap_or(frame);
        self.spi.write(bytes).map_err(|err| Error::Spi(err.kind()))
    }
}

impl<SPI: SpiDevice, const MODULES: usize> MatrixDisplay for Max7219Matrix<SPI, MODULES> {
    fn column_count(&self) -> usize {
        self.buffer.column_count()
    }

    fn set_column(&mut self, index: usize, bitmap: u8) -> Result<()> {
        self.buffer.set_column(index, bitmap)?;
        if self.buffer.is_update_enabled() {
            self.flush_module(index / COLUMNS_PER_MODULE)?;
        }
        Ok(())
    }

    fn column(&self, index: usize) -> Result<u8> {
        self.buffer.column(index)
    }

    fn set_update(&mut self, enabled: bool) {
        self.buffer.set_update(enabled);
    }

    fn is_update_enabled(&self) -> bool {
        self.buffer.is_update_enabled()
    }

    fn refresh(&mut self) -> Result<()> {
        self.flush()
    }

    fn clear(&mut self) -> Result<()> {
        self.buffer.clear()?;
        if self.buffer.is_update_enabled() {
            self.flush()?;
        }
        Ok(())
    }

    fn transform<C: ShiftCallbacks>(
        &mut self,
        transform: Transform,
        callbacks: &mut C,
    ) -> Result<()> {
        self.buffer.transform(transform, callbacks)?;
        if self.buffer.is_update_enabled() {
            self.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counting {
        next: u8,
        ins: usize,
        outs: heapless::Vec<u8, 8>,
    }

    impl ShiftCallbacks for Counting {
        fn shift_in(&mut self, _transform: Transform) -> u8 {
            self.ins += 1;
            self.next
        }

        fn shift_out(&mut self, _transform: Transform, column: u8) {
            let _ = self.outs.push(column);
        }
    }

    #[test]
    fn shift_left_calls_each_callback_once() -> Result<()> {
        let mut display = ColumnBuffer::<1>::new();
        display.set_column(7, 0xAA)?;
        display.set_column(0, 0x01)?;
        let mut callbacks = Counting {
            next: 0x55,
            ins: 0,
            outs: heapless::Vec::new(),
        };
        display.transform(Transform::ShiftLeft, &mut callbacks)?;
        assert_eq!(callbacks.ins, 1);
        assert_eq!(callbacks.outs.as_slice(), &[0xAA]);
        assert_eq!(display.column(0)?, 0x55);
        assert_eq!(display.column(1)?, 0x01);
        Ok(())
    }

    #[test]
    fn shift_crosses_module_boundary() -> Result<()> {
        let mut display = ColumnBuffer::<2>::new();
        display.set_column(7, 0x3C)?;
        display.transform(Transform::ShiftLeft, &mut NoShift)?;
        assert_eq!(display.column(8)?, 0x3C);
        assert_eq!(display.module(1).map(|module| module[0]), Some(0x3C));
        Ok(())
    }

    #[test]
    fn rotate_wraps_without_callbacks() -> Result<()> {
        let mut display = ColumnBuffer::<2>::new();
        display.set_column(15, 0x81)?;
        let mut callbacks = Counting {
            next: 0xFF,
            ins: 0,
            outs: heapless::Vec::new(),
        };
        display.transform(Transform::RotateLeft, &mut callbacks)?;
        assert_eq!(display.column(0)?, 0x81);
        assert_eq!(display.column(15)?, 0);
        assert_eq!(callbacks.ins, 0);
        assert!(callbacks.outs.is_empty());
        Ok(())
    }

    #[test]
    fn shift_up_drops_top_row() -> Result<()> {
        let mut display = ColumnBuffer::<1>::new();
        display.set_column(3, 0b1000_0011)?;
        display.transform(Transform::ShiftUp, &mut NoShift)?;
        assert_eq!(display.column(3)?, 0b0100_0001);
        for _ in 0..ROWS {
            display.transform(Transform::ShiftUp, &mut NoShift)?;
        }
        assert!(display.is_blank());
        Ok(())
    }

    #[test]
    fn out_of_bounds_column_is_an_error() {
        let mut display = ColumnBuffer::<2>::new();
        assert!(matches!(
            display.set_column(16, 1),
            Err(Error::ColumnOutOfBounds(16))
        ));
        assert!(matches!(display.column(99), Err(Error::ColumnOutOfBounds(99))));
    }

    #[test]
    fn guard_restores_previous_setting() {
        let mut display = ColumnBuffer::<1>::new();
        display.set_update(false);
        {
            let _suspended = UpdateSuspended::new(&mut display);
        }
        assert!(!display.is_update_enabled());
    }
}
