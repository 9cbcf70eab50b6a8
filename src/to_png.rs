#![cfg(feature = "host")]
//! PNG and animated PNG previews of a [`ColumnBuffer`], for documentation and tests.
//!
//! LEDs are drawn as soft red dots; unlit LEDs keep a faint glow so the grid stays visible.

use crate::matrix::{ColumnBuffer, MatrixDisplay, ROWS};
use png::{BitDepth, ColorType, Encoder, ScaledFloat};
use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

const PREVIEW_INVERSE_GAMMA: f32 = 2.2;

/// Brightness of an unlit LED, as an sRGB-ish channel value.
const UNLIT_LEVEL: u8 = 40;

/// Render a display into a PNG file sized to the requested maximum dimension.
///
/// # Errors
///
/// A zero `target_max_dimension`, or an I/O or encoding error.
pub fn write_matrix_png<const MODULES: usize>(
    display: &ColumnBuffer<MODULES>,
    output_path: impl AsRef<Path>,
    target_max_dimension: u32,
) -> Result<(), Box<dyn Error>> {
    let output_path = output_path.as_ref();
    let (panel_width, panel_height) = panel_size(display);
    let cell_size = select_cell_size(panel_width, panel_height, target_max_dimension)?;
    let (width, height, pixels) = panel_pixels(display, cell_size)?;

    create_parent_dir(output_path)?;
    let file = File::create(output_path)?;
    let mut encoder = Encoder::new(BufWriter::new(file), width, height);
    encoder.set_color(ColorType::Rgb);
    encoder.set_depth(BitDepth::Sixteen);
    encoder.set_source_gamma(ScaledFloat::new(1.0));
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&pixels)?;
    Ok(())
}

/// Render a sequence of display snapshots into a looping APNG file.
///
/// # Errors
///
/// An empty `frames`, a zero or oversized delay, or an I/O or encoding error.
pub fn write_matrix_apng<const MODULES: usize>(
    frames: &[ColumnBuffer<MODULES>],
    output_path: impl AsRef<Path>,
    target_max_dimension: u32,
    frame_delay_ms: u32,
) -> Result<(), Box<dyn Error>> {
    let Some(first) = frames.first() else {
        return Err("frames must not be empty".into());
    };
    if frame_delay_ms == 0 {
        return Err("frame_delay_ms must be positive".into());
    }
    let output_path = output_path.as_ref();
    let (panel_width, panel_height) = panel_size(first);
    let cell_size = select_cell_size(panel_width, panel_height, target_max_dimension)?;
    let frame_count = u32::try_from(frames.len())?;
    let delay_num = u16::try_from(frame_delay_ms)?;
    let delay_den = 1000u16;

    let (width, height, _) = panel_pixels(first, cell_size)?;
    create_parent_dir(output_path)?;
    let file = File::create(output_path)?;
    let mut encoder = Encoder::new(BufWriter::new(file), width, height);
    encoder.set_color(ColorType::Rgb);
    encoder.set_depth(BitDepth::Sixteen);
    encoder.set_source_gamma(ScaledFloat::new(1.0));
    encoder.set_animated(frame_count, 0)?;
    let mut writer = encoder.write_header()?;
    for frame in frames {
        let (_, _, pixels) = panel_pixels(frame, cell_size)?;
        writer.set_frame_delay(delay_num, delay_den)?;
        writer.write_image_data(&pixels)?;
    }
    writer.finish()?;
    Ok(())
}

fn panel_size<const MODULES: usize>(display: &ColumnBuffer<MODULES>) -> (u32, u32) {
    (display.column_count() as u32, ROWS as u32)
}

fn create_parent_dir(output_path: &Path) -> std::io::Result<()> {
    match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

fn select_cell_size(
    panel_width: u32,
    panel_height: u32,
    target_max_dimension: u32,
) -> Result<u32, Box<dyn Error>> {
    if target_max_dimension == 0 {
        return Err("target_max_dimension must be positive".into());
    }
    let mut cell_size = target_max_dimension;
    while cell_size > 4 {
        let led_radius = led_radius(cell_size);
        let max_dimension =
            (panel_width * cell_size + led_radius * 2).max(panel_height * cell_size + led_radius * 2);
        if max_dimension <= target_max_dimension {
            break;
        }
        cell_size -= 1;
    }
    Ok(cell_size.max(4))
}

const fn led_radius(cell_size: u32) -> u32 {
    let led_margin = if cell_size / 8 > 1 { cell_size / 8 } else { 1 };
    (cell_size - led_margin * 2) / 2
}

/// Pixels of the whole panel as 16-bit big-endian RGB. Column 0 is drawn at the right edge.
fn panel_pixels<const MODULES: usize>(
    display: &ColumnBuffer<MODULES>,
    cell_size: u32,
) -> Result<(u32, u32, Vec<u8>), Box<dyn Error>> {
    let led_radius = led_radius(cell_size);
    let fade_width = (led_radius / 3).max(1);
    let border = led_radius;
    let column_count = display.column_count();
    let width = (column_count as u32) * cell_size + border * 2;
    let height = (ROWS as u32) * cell_size + border * 2;
    let mut bytes = vec![0u8; usize::try_from(width * height * 3 * 2)?];
    let center = (cell_size - 1) as i32 / 2;
    let led_radius_f = led_radius as f32;
    let inner_radius_f = led_radius.saturating_sub(fade_width) as f32;
    let radius_sq = (led_radius as i32) * (led_radius as i32);

    for (index, column) in display.columns().enumerate() {
        let x_cell = column_count - 1 - index;
        for row in 0..ROWS {
            let lit = (column >> row) & 1 == 1;
            let level = inverse_gamma_to_linear(if lit { u8::MAX } else { UNLIT_LEVEL });
            let cell_origin_x = (x_cell as u32) * cell_size;
            let cell_origin_y = (row as u32) * cell_size;

            for local_y in 0..cell_size {
                let delta_y = local_y as i32 - center;
                for local_x in 0..cell_size {
                    let delta_x = local_x as i32 - center;
                    let distance_sq = delta_x * delta_x + delta_y * delta_y;
                    if distance_sq > radius_sq {
                        continue;
                    }
                    let distance = (distance_sq as f32).sqrt();
                    let intensity = if distance <= inner_radius_f {
                        1.0
                    } else {
                        let fade_span = led_radius_f - inner_radius_f;
                        (1.0 - (distance - inner_radius_f) / fade_span).max(0.0)
                    };
                    let x = border + cell_origin_x + local_x;
                    let y = border + cell_origin_y + local_y;
                    let pixel_index = ((y * width + x) * 3 * 2) as usize;
                    let red = linear_to_u16(level * intensity);
                    if let Some(pixel) = bytes.get_mut(pixel_index..pixel_index + 2) {
                        pixel.copy_from_slice(&red.to_be_bytes());
                    }
                }
            }
        }
    }

    Ok((width, height, bytes))
}

fn inverse_gamma_to_linear(channel: u8) -> f32 {
    let normalized = f32::from(channel) / 255.0;
    normalized.powf(PREVIEW_INVERSE_GAMMA)
}

fn linear_to_u16(value: f32) -> u16 {
    let clamped = value.clamp(0.0, 1.0);
    (clamped * 65535.0).round() as u16
}
