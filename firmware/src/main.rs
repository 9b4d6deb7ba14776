#![no_std]
#![no_main]

extern crate alloc;

use config::FLASH_SIZE;
use embassy_rp::{flash::Async, watchdog::Watchdog};
use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex, mutex::Mutex, once_lock::OnceLock,
};
use embedded_alloc::LlffHeap as Heap;

#[global_allocator]
static HEAP: Heap = Heap::empty();
const HEAP_SIZE: usize = 16384; // 16kB, log lines only

use defmt::{error, info};
use embassy_executor::Spawner;
use embassy_time::Duration;
use {defmt_rtt as _, panic_probe as _};

mod config;
mod config_resources;
mod flash_layout;
mod log_store;
mod tasks;

use crate::config_resources::{
    AssignedResources, ConsoleResources, FlashResources, TrialResources, WatchdogResources,
};

pub type FlashType<'a> =
    embassy_rp::flash::Flash<'a, embassy_rp::peripherals::FLASH, Async, FLASH_SIZE>;
pub type MFlashType<'a> = Mutex<CriticalSectionRawMutex, FlashType<'a>>;
pub static OM_FLASH: OnceLock<MFlashType<'static>> = OnceLock::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    // Initialize the allocator BEFORE you use it
    {
        use core::mem::MaybeUninit;
        static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
        unsafe { HEAP.init(&raw mut HEAP_MEM as usize, HEAP_SIZE) }
    }

    let p = embassy_rp::init(Default::default());
    let r = split_resources!(p);

    info!("Starting up tempo {}...", config::FW_VERSION_STR);

    let mut watchdog = Watchdog::new(r.watchdog.watchdog);
    watchdog.start(Duration::from_millis(config::WATCHDOG_TIMEOUT_MS));

    let flash = FlashType::new(r.flash.flash, r.flash.dma_ch);
    let flash: MFlashType = Mutex::<CriticalSectionRawMutex, _>::new(flash);

    if OM_FLASH.init(flash).is_err() {
        error!("Failed to initialize flash");
        return;
    }

    info!(
        "Trial log partition: {=u32:#x}..{=u32:#x} ({} bytes)",
        flash_layout::get_log_range().start,
        flash_layout::get_log_range().end,
        flash_layout::get_log_size()
    );

    // Spawn the async tasks
    spawner
        .spawn(tasks::watchdog_feeder::watchdog_feeder_task(watchdog))
        .unwrap();

    spawner
        .spawn(tasks::console::console_task(r.console))
        .unwrap();

    spawner
        .spawn(tasks::trial_runner::trial_runner_task(r.trial))
        .unwrap();
}
