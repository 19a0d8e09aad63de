#![no_main]
#![no_std]

pub mod config;
pub mod logger;
pub mod logic;
pub mod peripherals;

use defmt_rtt as _; // global logger

use nrf52840_hal as _; // memory layout

use panic_probe as _;

// same panicking *behavior* as `panic-probe` but doesn't print a panic message
// this prevents the panic message being printed *twice* when `defmt::panic` is invoked
#[defmt::panic_handler]
fn panic() -> ! {
    cortex_m::asm::udf()
}
