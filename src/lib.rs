//! Scrolling and static status text for chained MAX7219/7221 LED dot-matrix modules.
//!
//! The heart of the crate is [`render::RenderCursor`], a small column-at-a-time state machine that
//! turns a message into the bitmaps a MAX72xx chain shifts in. Around it sit a message store with
//! a pending slot, print and scroll drivers, a MAX7219 SPI driver, and a demo-mode cycler.
//!
//! # Glossary
//!
//! - **Module:** one chained 8×8 LED matrix driven by one MAX7219.
//! - **Column:** one vertical byte-wide slice of the matrix, bit 0 is the top row.
//! - **Glyph:** the column bitmaps of one character in the active font.
//! - **Wraparound:** the point where a scroll finishes the last character and restarts at the
//!   first one. It is the only point where a pending message replaces the current one.
#![cfg_attr(not(feature = "host"), no_std)]
#![cfg_attr(not(feature = "host"), no_main)]
#![allow(async_fn_in_trait, reason = "single-threaded embedded")]

// Compile-time checks: exactly one board must be selected (unless testing with host feature)
#[cfg(all(not(any(feature = "pico1", feature = "pico2")), not(feature = "host")))]
compile_error!("Must enable exactly one board feature: 'pico1' or 'pico2'");

#[cfg(all(feature = "pico1", feature = "pico2"))]
compile_error!("Cannot enable both 'pico1' and 'pico2' features simultaneously");

#[cfg(all(feature = "host", feature = "arm"))]
compile_error!("'host' and 'arm' are exclusive; build firmware with --no-default-features");

#[macro_use]
mod fmt;

pub mod button;
pub mod config;
pub mod demo;
mod error;
pub mod font;
pub mod inbox;
pub mod matrix;
pub mod message;
pub mod print;
pub mod render;
pub mod scroll;
#[cfg(feature = "host")]
pub mod to_png;

// Re-export error types and result (used throughout)
pub use crate::error::{Error, Result};
