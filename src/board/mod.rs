//! ESP32-C3 board support
//!
//! Maps the reference wiring (two buttons, two LEDs, UART console) to
//! named subsystems so the rest of softloop never sees a GPIO number.
//! See [`pins`] for the pin map.

pub mod pins;
pub mod tick;

pub use pins::CHANNELS;

use esp_hal::{
    Blocking,
    gpio::{Event, Input, InputConfig, Io, Level, Output, OutputConfig, Pull},
    peripherals::Peripherals,
    timer::{PeriodicTimer, timg::TimerGroup},
    uart::{self, RxError, Uart, UartRx},
};

use crate::drivers::console::ByteSource;
use crate::drivers::input::{Edge, InputChannel};
use crate::drivers::led::LedBank;

// Type Aliases
pub type Leds = LedBank<Output<'static>, CHANNELS>;
pub type TickTimer = PeriodicTimer<'static, Blocking>;
pub type ConsoleRx = UartRx<'static, Blocking>;

/// Button pins with their debounced channel configuration, owned by the
/// GPIO interrupt handler once installed.
pub struct ButtonIrq {
    pins: [Input<'static>; CHANNELS],
    channels: [InputChannel; CHANNELS],
}

impl ButtonIrq {
    pub fn new(pins: [Input<'static>; CHANNELS], channels: [InputChannel; CHANNELS]) -> Self {
        Self { pins, channels }
    }

    /// Arm the edge interrupt of every pin as its channel asks. Call
    /// once the handler can reach `self` (see `Shared::install_with`).
    pub fn listen(&mut self) {
        for (pin, ch) in self.pins.iter_mut().zip(self.channels.iter()) {
            pin.listen(listen_event(ch.edge()));
        }
    }

    // called from the GPIO interrupt with the current tick count
    pub fn service(&mut self, now: u32) {
        for (pin, ch) in self.pins.iter_mut().zip(self.channels.iter_mut()) {
            if pin.is_interrupt_set() {
                pin.clear_interrupt();
                ch.on_edge(now);
            }
        }
    }
}

fn listen_event(edge: Edge) -> Event {
    match edge {
        Edge::Rising => Event::RisingEdge,
        Edge::Falling => Event::FallingEdge,
        Edge::Any => Event::AnyEdge,
    }
}

impl ByteSource for ConsoleRx {
    type Error = RxError;

    fn read(&mut self) -> nb::Result<u8, RxError> {
        if !self.read_ready() {
            return Err(nb::Error::WouldBlock);
        }
        let mut byte = [0u8; 1];
        match UartRx::read(self, &mut byte) {
            Ok(0) => Err(nb::Error::WouldBlock),
            Ok(_) => Ok(byte[0]),
            Err(e) => Err(nb::Error::Other(e)),
        }
    }
}

/// Complete board hardware, ready for the poll loop.
pub struct Board {
    pub leds: Leds,
    pub buttons: [Input<'static>; CHANNELS],
    pub console: ConsoleRx,
    pub io: Io<'static>,
    pub tick_timer: TickTimer,
}

impl Board {
    pub fn init(p: Peripherals) -> Self {
        let leds = LedBank::new(
            [
                Output::new(p.GPIO4, Level::Low, OutputConfig::default()),
                Output::new(p.GPIO5, Level::Low, OutputConfig::default()),
            ],
            pins::LED_POLARITY,
        );

        let buttons = [
            Input::new(p.GPIO9, InputConfig::default().with_pull(Pull::Up)),
            Input::new(p.GPIO3, InputConfig::default().with_pull(Pull::Up)),
        ];

        let (console, _tx) = Uart::new(p.UART0, uart::Config::default())
            .expect("uart0 config")
            .with_rx(p.GPIO20)
            .with_tx(p.GPIO21)
            .split();

        let io = Io::new(p.IO_MUX);

        let timg0 = TimerGroup::new(p.TIMG0);
        let tick_timer = PeriodicTimer::new(timg0.timer0);

        log::info!(
            "board: LEDs GPIO{}/{}, buttons GPIO{}/{}, console rx GPIO{}",
            pins::LED0,
            pins::LED1,
            pins::BTN0,
            pins::BTN1,
            pins::UART_RX
        );

        Board {
            leds,
            buttons,
            console,
            io,
            tick_timer,
        }
    }
}
