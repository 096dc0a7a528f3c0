// softloop network service loop
//
// Boot sequence: logger -> tick timer -> MAC + interface summary ->
// protocol timer table -> loop
// Main loop: tick timers -> poll stack, no delay
//
// The reference board has no Ethernet MAC, so IdleStack stands in for
// the stack; build with ESP_LOG=debug to watch its hooks run.

#![no_std]
#![no_main]

use esp_backtrace as _;
use esp_hal::clock::CpuClock;
use esp_hal::delay::Delay;
use esp_hal::timer::{PeriodicTimer, timg::TimerGroup};
use log::info;

use softloop::board::tick::{self, TICKS};
use softloop::net::{IdleStack, NetConfig, NoEeprom, PROTOCOL_TIMER_SLOTS, configure, service_loop};

esp_bootloader_esp_idf::esp_app_desc!();

#[esp_hal::main]
fn main() -> ! {
    esp_println::logger::init_logger_from_env();
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    info!("-- Network Service Loop --");
    info!("-- softloop {} on ESP32-C3 --", env!("CARGO_PKG_VERSION"));

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    tick::start(PeriodicTimer::new(timg0.timer0));

    let net = configure(Some(&mut NoEeprom), NetConfig::demo());

    service_loop::<_, _, _, PROTOCOL_TIMER_SLOTS>(&TICKS, IdleStack::default(), Delay::new(), &net)
        .expect("protocol timer table")
        .run()
}
