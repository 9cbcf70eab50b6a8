#![cfg(feature = "host")]

use marquee_kit::demo::{DemoMode, DemoRunner, TickStatus};
use marquee_kit::font::{GlyphSource, MatrixFont};
use marquee_kit::matrix::{ColumnBuffer, MatrixDisplay, ROWS};
use marquee_kit::message::MessageStore;
use marquee_kit::print::print_text;
use marquee_kit::render::scroll_length;
use std::error::Error;

type Runner = DemoRunner<ColumnBuffer<2>, MatrixFont>;

fn runner(message: &str) -> Runner {
    DemoRunner::new(
        ColumnBuffer::new(),
        MatrixFont::Font5x7,
        MessageStore::with_current(message),
    )
}

fn printed(message: &[u8]) -> Result<ColumnBuffer<2>, Box<dyn Error>> {
    let mut display = ColumnBuffer::new();
    print_text(&mut display, &MatrixFont::Font5x7, 0, 1, message)?;
    Ok(display)
}

#[test]
fn button_cycles_through_all_modes() -> Result<(), Box<dyn Error>> {
    let mut runner = runner("HI");
    runner.start(DemoMode::StaticPrint)?;
    let mut seen = vec![runner.mode()];
    for _ in 0..DemoMode::ALL.len() {
        runner.on_button()?;
        seen.push(runner.mode());
    }
    assert_eq!(
        seen,
        vec![
            DemoMode::StaticPrint,
            DemoMode::ScrollLeft,
            DemoMode::ScrollUpThenPrint,
            DemoMode::StaticCharSet,
            DemoMode::SetAndRotate,
            DemoMode::StaticPrint,
        ]
    );
    Ok(())
}

#[test]
fn mode_indices_wrap() {
    assert_eq!(DemoMode::from_index(5), DemoMode::StaticPrint);
    assert_eq!(DemoMode::from_index(7), DemoMode::ScrollUpThenPrint);
    for mode in DemoMode::ALL {
        assert_eq!(DemoMode::from_index(mode.index()), mode);
    }
}

#[test]
fn static_print_draws_once_and_goes_idle() -> Result<(), Box<dyn Error>> {
    let mut runner = runner("HI");
    assert_eq!(runner.start(DemoMode::StaticPrint)?, TickStatus::Idle);
    assert_eq!(runner.display(), &printed(b"HI")?);
    assert_eq!(runner.tick()?, TickStatus::Idle);
    assert_eq!(runner.display(), &printed(b"HI")?);
    Ok(())
}

#[test]
fn scroll_left_runs_until_message_complete() -> Result<(), Box<dyn Error>> {
    let mut runner = runner("HSBC 58.6");
    assert_eq!(runner.start(DemoMode::ScrollLeft)?, TickStatus::Running);
    assert!(runner.display().is_blank());

    let ticks = scroll_length(b"HSBC 58.6", &MatrixFont::Font5x7);
    for _ in 0..ticks {
        assert_eq!(runner.tick()?, TickStatus::Running);
    }
    assert!(runner.store().is_message_complete());
    assert_eq!(runner.tick()?, TickStatus::Idle);
    Ok(())
}

#[test]
fn restarting_scroll_clears_completion() -> Result<(), Box<dyn Error>> {
    let mut runner = runner("OK");
    runner.start(DemoMode::ScrollLeft)?;
    while runner.tick()? == TickStatus::Running {}
    assert!(runner.store().is_message_complete());
    runner.start(DemoMode::ScrollLeft)?;
    assert!(!runner.store().is_message_complete());
    assert!(runner.display().is_blank());
    Ok(())
}

#[test]
fn switching_modes_mid_scroll_starts_from_first_glyph() -> Result<(), Box<dyn Error>> {
    let message = b"HSBC 58.6";
    let font = MatrixFont::Font5x7;
    let mut runner = runner("HSBC 58.6");
    runner.start(DemoMode::ScrollLeft)?;
    // Stop partway through the second glyph.
    for _ in 0..7 {
        assert_eq!(runner.tick()?, TickStatus::Running);
    }

    runner.start(DemoMode::ScrollLeft)?;
    let mut first = [0; 8];
    assert!(font.glyph(b'H', &mut first) > 0);
    assert_eq!(runner.tick()?, TickStatus::Running);
    assert_eq!(runner.display().column(0)?, first[0]);

    let mut ticks = 1;
    while runner.tick()? == TickStatus::Running {
        ticks += 1;
    }
    assert_eq!(ticks, scroll_length(message, &font));
    Ok(())
}

#[test]
fn scroll_up_then_print_clears_then_redraws() -> Result<(), Box<dyn Error>> {
    let mut runner = runner("HI");
    assert_eq!(runner.start(DemoMode::ScrollUpThenPrint)?, TickStatus::Running);
    assert_eq!(runner.display(), &printed(b"HI")?);

    for _ in 0..ROWS {
        assert_eq!(runner.tick()?, TickStatus::Running);
    }
    assert!(runner.display().is_blank());

    assert_eq!(runner.tick()?, TickStatus::Idle);
    assert_eq!(runner.display(), &printed(b"HI")?);
    Ok(())
}

#[test]
fn char_set_puts_one_character_per_module() -> Result<(), Box<dyn Error>> {
    let mut runner = runner("HI").with_char_set([b'A', b'B']);
    assert_eq!(runner.start(DemoMode::StaticCharSet)?, TickStatus::Idle);

    let font = MatrixFont::Font5x7;
    let mut a = [0; 8];
    let a_width = font.glyph(b'A', &mut a);
    let mut b = [0; 8];
    let b_width = font.glyph(b'B', &mut b);
    let display = runner.display();
    let left: Vec<u8> = (8..16).rev().map(|index| display.column(index).unwrap_or(0)).collect();
    let right: Vec<u8> = (0..8).rev().map(|index| display.column(index).unwrap_or(0)).collect();
    let lit = |columns: &[u8]| columns.iter().filter(|&&column| column != 0).count();
    assert_eq!(lit(&left), lit(&a[..a_width]));
    assert_eq!(lit(&right), lit(&b[..b_width]));
    assert!(left.windows(a_width).any(|window| window == &a[..a_width]));
    assert!(right.windows(b_width).any(|window| window == &b[..b_width]));
    Ok(())
}

#[test]
fn set_and_rotate_wraps_forever() -> Result<(), Box<dyn Error>> {
    let mut runner = runner("HI");
    assert_eq!(runner.start(DemoMode::SetAndRotate)?, TickStatus::Running);
    let initial = runner.display().clone();
    let lit = initial.columns().filter(|&c| c != 0).count();

    for _ in 1..16 {
        assert_eq!(runner.tick()?, TickStatus::Running);
        assert_eq!(runner.display().columns().filter(|&c| c != 0).count(), lit);
        assert_ne!(runner.display(), &initial);
    }
    assert_eq!(runner.tick()?, TickStatus::Running);
    assert_eq!(runner.display(), &initial);
    Ok(())
}

#[test]
fn staged_message_waits_for_scroll_wraparound() -> Result<(), Box<dyn Error>> {
    let mut runner = runner("AB");
    runner.start(DemoMode::ScrollLeft)?;
    runner.tick()?;
    let _ = runner.stage_message("NEW");
    assert_eq!(runner.store().current(), b"AB");
    while runner.tick()? == TickStatus::Running {}
    assert_eq!(runner.store().current(), b"NEW");
    assert!(!runner.store().is_pending_available());
    Ok(())
}

#[test]
fn static_print_picks_up_staged_message() -> Result<(), Box<dyn Error>> {
    let mut runner = runner("OLD");
    let _ = runner.stage_message("NEW");
    runner.start(DemoMode::StaticPrint)?;
    assert_eq!(runner.store().current(), b"NEW");
    assert_eq!(runner.display(), &printed(b"NEW")?);
    Ok(())
}
