#![no_std]
#![no_main]
#![cfg(not(feature = "host"))]

use core::convert::Infallible;
use core::fmt::Write as _;

use embassy_executor::Spawner;
use embassy_futures::select::{Either, select};
use embassy_rp::gpio::{Level, Output};
use embassy_rp::spi::{self, Spi};
use embassy_time::{Duration, Ticker};
use embedded_hal_bus::spi::ExclusiveDevice;
use marquee_kit::{
    Error, Result,
    button::{Button, ButtonWatch, PressedTo, button_watch_task},
    config::MarqueeConfig,
    demo::{DemoMode, DemoRunner, TickStatus},
    font::MatrixFont,
    inbox::MessageInbox,
    matrix::Max7219Matrix,
    message::MessageStore,
};
use {defmt_rtt as _, panic_probe as _};

#[cfg(feature = "pico2")]
#[allow(unsafe_code, reason = "the boot ROM looks for the image definition in this section")]
#[unsafe(link_section = ".start_block")]
#[used]
pub static IMAGE_DEF: embassy_rp::block::ImageDef = embassy_rp::block::ImageDef::secure_exe();

/// Two FC-16 modules side by side.
const MODULES: usize = 2;

const CONFIG: MarqueeConfig = MarqueeConfig::new();

/// MAX7219 tops out at 10 MHz; stay well below it on breadboard wiring.
const SPI_FREQUENCY_HZ: u32 = 1_000_000;

static INBOX: MessageInbox = MessageInbox::new();
static BUTTON_WATCH: ButtonWatch = ButtonWatch::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) -> ! {
    let err = inner_main(spawner).await.unwrap_err();
    panic!("{err}");
}

async fn inner_main(spawner: Spawner) -> Result<Infallible> {
    let p = embassy_rp::init(Default::default());

    // SPI0: clock on GP18, data on GP19, chip select on GP17.
    let mut spi_config = spi::Config::default();
    spi_config.frequency = SPI_FREQUENCY_HZ;
    let spi_bus = Spi::new_blocking_txonly(p.SPI0, p.PIN_18, p.PIN_19, spi_config);
    let chip_select = Output::new(p.PIN_17, Level::High);
    let Ok(spi_device) = ExclusiveDevice::new_no_delay(spi_bus, chip_select);

    let mut display = Max7219Matrix::<_, MODULES>::new(spi_device, CONFIG.hardware);
    display.init(CONFIG.intensity)?;

    let mut runner = DemoRunner::new(
        display,
        MatrixFont::Font5x7,
        MessageStore::with_current(CONFIG.boot_message),
    )
    .with_char_set(CONFIG.char_set);

    // Wire the button between GP13 and GND.
    let button = Button::new(p.PIN_13, PressedTo::Ground).with_debounce(CONFIG.debounce);

    spawner
        .spawn(button_task(button))
        .map_err(Error::TaskSpawn)?;
    spawner
        .spawn(quote_task(&INBOX))
        .map_err(Error::TaskSpawn)?;

    let mut ticker = Ticker::every(CONFIG.scroll_delay);
    let mut status = runner.start(DemoMode::ScrollLeft)?;
    let presses = &BUTTON_WATCH;
    loop {
        status = match status {
            TickStatus::Running => match select(presses.wait_for_press(), ticker.next()).await {
                Either::First(()) => {
                    ticker.reset();
                    runner.on_button()?
                }
                Either::Second(()) => {
                    if let Some(staged) = INBOX.deliver(runner.store_mut()) {
                        defmt::info!("new message queued: {}", staged);
                    }
                    runner.tick()?
                }
            },
            // Nothing to animate: sleep until the button or a new message arrives.
            TickStatus::Idle => match select(presses.wait_for_press(), INBOX.wait()).await {
                Either::First(()) => {
                    ticker.reset();
                    runner.on_button()?
                }
                Either::Second(text) => {
                    let staged = runner.stage_message(text);
                    defmt::info!("new message queued: {}", staged);
                    TickStatus::Idle
                }
            },
        };
    }
}

/// Watches the button so presses land even while the main loop is between ticks.
#[embassy_executor::task]
async fn button_task(button: Button<'static>) -> ! {
    button_watch_task(button, &BUTTON_WATCH).await
}

/// Stands in for a price feed: posts a slowly changing quote.
#[embassy_executor::task]
async fn quote_task(inbox: &'static MessageInbox) -> ! {
    const QUOTE_PERIOD: Duration = Duration::from_secs(20);
    let mut tenths: u32 = 586;
    let mut ticker = Ticker::every(QUOTE_PERIOD);
    loop {
        ticker.next().await;
        tenths = if tenths >= 599 { 580 } else { tenths + 1 };
        let mut quote: heapless::String<16> = heapless::String::new();
        if write!(quote, "HSBC {}.{}", tenths / 10, tenths % 10).is_ok() {
            inbox.post(&quote);
        }
    }
}
