// softloop entry point: getting-started blink
//
// Boot sequence: logger -> board -> tick timer -> button IRQ -> loop
// Main loop: tick timers -> poll console -> toggle active LEDs -> 250ms
//
// Each button gates its LED. An edge in the GPIO ISR flips the
// channel's activation flag and clears the LED right there when the
// channel goes inactive; the loop only toggles channels still active.
// Typing '1' or '2' on the UART console does the same as a button.

#![no_std]
#![no_main]

use esp_backtrace as _;
use esp_hal::clock::CpuClock;
use esp_hal::delay::Delay;
use log::info;

use softloop::board::pins::{BTN_DEBOUNCE_HZ, BTN_EDGE, CHANNELS};
use softloop::board::tick::{self, TICKS};
use softloop::board::{Board, ButtonIrq, ConsoleRx, Leds};
use softloop::drivers::console::Console;
use softloop::drivers::input::{InputChannel, InputConfig};
use softloop::kernel::{Activation, ActivationTable, Clock, LoopConfig, PollLoop, Scheduler, Shared};

esp_bootloader_esp_idf::esp_app_desc!();

const BLINK_MS: u32 = 250; // 4 Hz
const HEARTBEAT_MS: u32 = 5000;

type AppConsole = Console<'static, ConsoleRx, &'static Shared<Leds>, CHANNELS>;

static ACTIVATION: ActivationTable<CHANNELS> = ActivationTable::new(Activation::Active);
static LEDS: Shared<Leds> = Shared::new();
static BUTTONS: Shared<ButtonIrq> = Shared::new();

#[esp_hal::handler]
fn gpio_handler() {
    let now = TICKS.now_ms();
    BUTTONS.with(|buttons| buttons.service(now));
}

// debounced edge, still in interrupt context
fn on_button(channel: usize) {
    ACTIVATION.on_edge(channel, &mut &LEDS);
}

fn heartbeat(console: &mut AppConsole) {
    info!(
        "uptime {} ms, leds [{}], console cmds {}",
        TICKS.now_ms(),
        console.activation(),
        console.commands()
    );
}

#[esp_hal::main]
fn main() -> ! {
    esp_println::logger::init_logger_from_env();
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    info!("-- Getting Started Example --");
    info!("-- softloop {} on ESP32-C3 --", env!("CARGO_PKG_VERSION"));

    let Board {
        leds,
        buttons,
        console,
        mut io,
        tick_timer,
    } = Board::init(peripherals);
    LEDS.install(leds);
    tick::start(tick_timer);

    info!("Configure buttons with debouncing.");
    let input_cfg = InputConfig::new(BTN_EDGE, BTN_DEBOUNCE_HZ);
    let channels: [InputChannel; CHANNELS] = core::array::from_fn(|ch| {
        InputChannel::bind(ch, input_cfg, &ACTIVATION, on_button).expect("button config")
    });
    io.set_interrupt_handler(gpio_handler);
    BUTTONS.install_with(ButtonIrq::new(buttons, channels), ButtonIrq::listen);
    info!("Use push buttons or type '1'/'2' on the console.");

    let mut sched: Scheduler<AppConsole, 1> = Scheduler::starting_at(TICKS.now_ms());
    sched
        .register(HEARTBEAT_MS, heartbeat)
        .expect("heartbeat task");

    PollLoop::new(
        &TICKS,
        sched,
        Console::new(console, &LEDS, &ACTIVATION),
        &LEDS,
        Delay::new(),
        &ACTIVATION,
        LoopConfig::blink(BLINK_MS),
    )
    .run()
}
