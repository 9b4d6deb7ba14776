use defmt::trace;
use embassy_executor::task;
use embassy_rp::watchdog::Watchdog;
use embassy_time::{Duration, Timer};

use crate::config::WATCHDOG_FEED_INTERVAL_MS;

#[task]
pub async fn watchdog_feeder_task(mut watchdog: Watchdog) {
    // The trial runner can wait on the operator indefinitely, so the
    // watchdog is fed from here rather than from the trial loop.
    loop {
        Timer::after(Duration::from_millis(WATCHDOG_FEED_INTERVAL_MS)).await;
        watchdog.feed();
        trace!("Watchdog fed");
    }
}
